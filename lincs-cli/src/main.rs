mod classify;
mod config;
mod merge;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use log::LevelFilter;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "lincs";

    pub const MERGED_BED: &str = "merged.bed";
    pub const MERGED_NAMES: &str = "merged_names.tsv";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Merge multi-exon genomic annotations from several sources and classify chromosomes base by base.")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log every merge decision"),
        )
        .subcommand(merge::cli::create_merge_cli())
        .subcommand(classify::cli::create_classify_cli())
}

/// `RUST_LOG` takes precedence over the level picked here.
fn init_logging(verbose: bool) -> Result<()> {
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder
        .try_init()
        .context("Failed to initialise the logger")
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();
    init_logging(matches.get_flag("verbose"))?;

    match matches.subcommand() {
        //
        // MERGE
        //
        Some((merge::cli::MERGE_CMD, matches)) => {
            merge::handlers::run_merge(matches)?;
        }

        //
        // CLASSIFY
        //
        Some((classify::cli::CLASSIFY_CMD, matches)) => {
            classify::handlers::run_classify(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    fn test_parser_is_valid() {
        build_parser().debug_assert();
    }

    #[rstest]
    fn test_second_logger_init_is_reported() {
        init_logging(true).unwrap();
        assert!(init_logging(false).is_err());
    }

    #[rstest]
    fn test_classify_margin_override() {
        let matches = build_parser()
            .try_get_matches_from(["lincs", "classify", "--config", "p.toml", "-m", "250", "-v", "--force"])
            .unwrap();
        assert!(matches.get_flag("verbose"));
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, classify::cli::CLASSIFY_CMD);
        assert_eq!(sub.get_one::<i64>("margin"), Some(&250));
        assert!(sub.get_flag("force"));
    }
}
