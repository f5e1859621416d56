mod deprate;
mod filter;
mod mine;
mod mock;
mod offtarget;
mod snpfilter;

use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use log::LevelFilter;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "ribodep";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Measure rRNA depletion from RNA-seq alignments and design sgRNAs against rRNA.")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Increase logging verbosity (-v info, -vv debug)"),
        )
        .subcommand(deprate::cli::create_deprate_cli())
        .subcommand(mock::cli::create_mock_cli())
        .subcommand(snpfilter::cli::create_snpfilter_cli())
        .subcommand(mine::cli::create_mine_cli())
        .subcommand(filter::cli::create_filter_cli())
        .subcommand(offtarget::cli::create_offtarget_cli())
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    init_logging(matches.get_count("verbose"));

    match matches.subcommand() {
        //
        // DEPLETION RATE
        //
        Some((deprate::cli::DEPRATE_CMD, matches)) => {
            deprate::handlers::run_deprate(matches)?;
        }

        //
        // MOCK READS
        //
        Some((mock::cli::MOCK_CMD, matches)) => {
            mock::handlers::run_mock(matches)?;
        }

        //
        // SNP FILTER
        //
        Some((snpfilter::cli::SNPFILTER_CMD, matches)) => {
            snpfilter::handlers::run_snpfilter(matches)?;
        }

        //
        // GUIDE DESIGN
        //
        Some((mine::cli::MINE_CMD, matches)) => {
            mine::handlers::run_mine(matches)?;
        }
        Some((filter::cli::FILTER_CMD, matches)) => {
            filter::handlers::run_filter(matches)?;
        }
        Some((offtarget::cli::OFFTARGET_CMD, matches)) => {
            offtarget::handlers::run_offtarget(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
