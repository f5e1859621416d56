use clap::{Command, arg};

use crate::filter::cli::{DEFAULT_OFFTARGET_OUT, with_candidate_args};

pub const OFFTARGET_CMD: &str = "offtarget";

pub fn create_offtarget_cli() -> Command {
    let cmd = Command::new(OFFTARGET_CMD)
        .about("Report guides with at least one genuine off-target hit.")
        .arg_required_else_help(true);

    with_candidate_args(cmd).arg(
        arg!(--output <OUTPUT>)
            .required(false)
            .default_value(DEFAULT_OFFTARGET_OUT)
            .help("Output FASTA of off-target guides"),
    )
}
