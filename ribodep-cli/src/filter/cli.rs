use clap::{Command, arg, value_parser};

pub const FILTER_CMD: &str = "filter";
pub const DEFAULT_OUT: &str = "guides.fa";
pub const DEFAULT_OFFTARGET_OUT: &str = "off_target.fa";

/// Inputs shared by every command that runs the candidate filter.
pub fn with_candidate_args(cmd: Command) -> Command {
    cmd.arg(
        arg!(--genome <GENOME>)
            .required(true)
            .help("Genome FASTA"),
    )
    .arg(
        arg!(--regions <REGIONS>)
            .required(true)
            .help("Intended regions: chrom start end strand . name, with a header line"),
    )
    .arg(
        arg!(--gtf <GTF>)
            .required(true)
            .help("Genome annotation; hits outside it are never off-targets"),
    )
    .arg(
        arg!(--guides <GUIDES>)
            .required(true)
            .help("Candidate guides (FASTA)"),
    )
    .arg(
        arg!(--hits <HITS>)
            .required(true)
            .help("Aligner hits: id strand chrom position"),
    )
    .arg(
        arg!(--pam <PAM>)
            .required(false)
            .default_value("NGG")
            .help("PAM pattern (IUPAC)"),
    )
    .arg(
        arg!(--length <LENGTH>)
            .required(false)
            .default_value("20")
            .value_parser(value_parser!(u32))
            .help("Spacer length"),
    )
}

pub fn create_filter_cli() -> Command {
    let cmd = Command::new(FILTER_CMD)
        .about("Drop guides with off-target hits and collapse guides whose hits crowd together.")
        .arg_required_else_help(true);

    with_candidate_args(cmd)
        .arg(
            arg!(--proximity <PROXIMITY>)
                .required(false)
                .default_value("50")
                .value_parser(value_parser!(u32))
                .help("Hits closer than this many bases conflict"),
        )
        .arg(
            arg!(--offtargets <OFFTARGETS>)
                .required(false)
                .default_value(DEFAULT_OFFTARGET_OUT)
                .help("Output FASTA of guides removed for off-target hits"),
        )
        .arg(
            arg!(--output <OUTPUT>)
                .required(false)
                .default_value(DEFAULT_OUT)
                .help("Output FASTA of surviving guides"),
        )
}
