use clap::{Command, arg, value_parser};

pub const CLASSIFY_CMD: &str = "classify";

pub fn create_classify_cli() -> Command {
    Command::new(CLASSIFY_CMD)
        .about("Classify every base of each chromosome as coding, non-coding, both, other or intergenic")
        .arg_required_else_help(true)
        .arg(arg!(-c --config <config> "Pipeline config (TOML) with a [classify] section").required(true))
        .arg(
            arg!(-m --margin <margin> "Bases added on each side of coding and non-coding features (overrides the config)")
                .value_parser(value_parser!(i64)),
        )
        .arg(arg!(-f --force "Repaint arrays even when their files already exist in the output directory"))
}
