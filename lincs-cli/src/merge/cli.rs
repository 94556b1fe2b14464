use clap::{Command, arg};

pub const MERGE_CMD: &str = "merge";

pub fn create_merge_cli() -> Command {
    Command::new(MERGE_CMD)
        .about("Merge transcripts from several annotation sources into one deduplicated BED12 file")
        .arg_required_else_help(true)
        .arg(arg!(-c --config <config> "Pipeline config (TOML) listing the datasets to merge").required(true))
}
