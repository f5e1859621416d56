use clap::{Command, arg, value_parser};

pub const MOCK_CMD: &str = "mock";

pub fn create_mock_cli() -> Command {
    Command::new(MOCK_CMD)
        .about("Simulate reads from random windows over rRNA loci, optionally carrying SNPs.")
        .arg_required_else_help(true)
        .arg(
            arg!(--config <CONFIG>)
                .required(true)
                .help("Path to the TOML simulation configuration"),
        )
        .arg(
            arg!(--seed <SEED>)
                .required(false)
                .value_parser(value_parser!(u64))
                .help("Seed for the random generator (overrides the config)"),
        )
}
