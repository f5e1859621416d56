use clap::{Command, arg, value_parser};

use ribodep_sim::consts::DEFAULT_SNP_OUTPUT;

pub const SNPFILTER_CMD: &str = "snpfilter";

pub fn create_snpfilter_cli() -> Command {
    Command::new(SNPFILTER_CMD)
        .about("Keep common, unambiguous SNPs that fall inside rRNA intervals.")
        .arg_required_else_help(true)
        .arg(
            arg!(--bed <BED>)
                .required(true)
                .help("rRNA intervals (BED)"),
        )
        .arg(
            arg!(--snps <SNPS>)
                .required(true)
                .help("SNP table: chrom pos ref alt freq"),
        )
        .arg(
            arg!(--cutoff <CUTOFF>)
                .required(false)
                .default_value("0.1")
                .value_parser(value_parser!(f64))
                .help("Drop SNPs with frequency below the cutoff or above 1 - cutoff"),
        )
        .arg(
            arg!(--output <OUTPUT>)
                .required(false)
                .default_value(DEFAULT_SNP_OUTPUT)
                .help("Output path"),
        )
}
