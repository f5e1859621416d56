use clap::{Command, arg, value_parser};

pub const DEPRATE_CMD: &str = "deprate";

pub fn create_deprate_cli() -> Command {
    Command::new(DEPRATE_CMD)
        .about("Compute per-bin rRNA depletion rates from a control and a depleted BAM file.")
        .arg_required_else_help(true)
        .arg(
            arg!(--config <CONFIG>)
                .required(true)
                .help("Path to the TOML scan configuration"),
        )
        .arg(
            arg!(-p --threads <THREADS>)
                .required(false)
                .default_value("1")
                .value_parser(value_parser!(usize))
                .help("Number of worker threads"),
        )
}
