use clap::{Arg, Command, arg, value_parser};

pub const MINE_CMD: &str = "mine";
pub const DEFAULT_OUT: &str = "input.fa";

pub fn create_mine_cli() -> Command {
    Command::new(MINE_CMD)
        .about("Mine candidate sgRNAs next to PAM sites in the intended rRNA regions.")
        .arg_required_else_help(true)
        .arg(
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
            arg!(--pam <PAM>)
                .required(false)
                .default_value("NGG")
                .help("PAM pattern (IUPAC)"),
        )
        .arg(
            arg!(--length <LENGTH>)
                .required(false)
                .default_value("20")
                .value_parser(value_parser!(usize))
                .help("Spacer length"),
        )
        .arg(
            Arg::new("min-gc")
                .long("min-gc")
                .required(false)
                .default_value("30")
                .value_parser(value_parser!(f64))
                .help("Minimum GC percentage"),
        )
        .arg(
            Arg::new("max-gc")
                .long("max-gc")
                .required(false)
                .default_value("80")
                .value_parser(value_parser!(f64))
                .help("Maximum GC percentage"),
        )
        .arg(
            arg!(--seed <SEED>)
                .required(false)
                .value_parser(value_parser!(u64))
                .help("Seed for guide ids"),
        )
        .arg(
            arg!(--output <OUTPUT>)
                .required(false)
                .default_value(DEFAULT_OUT)
                .help("Output FASTA of candidate guides"),
        )
}
