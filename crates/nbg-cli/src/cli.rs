//! Command-line definition

use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;

fn target_arg() -> Arg {
    Arg::new("target")
        .required(true)
        .value_name("TARGET")
        .help("Notebook file, or the UUID of a cached notebook")
}

/// The `nbg` command
#[must_use]
pub fn command() -> Command {
    Command::new("nbg")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect, validate and clean notebooks cached by nbgallery")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Gallery config file (TOML)"),
        )
        .arg(
            Arg::new("cache-dir")
                .long("cache-dir")
                .global(true)
                .value_name("DIR")
                .value_parser(value_parser!(PathBuf))
                .help("Notebook cache directory; overrides the config file"),
        )
        .arg(
            Arg::new("type")
                .long("type")
                .short('t')
                .global(true)
                .value_name("TAG")
                .help("Notebook type; inferred from the file extension when omitted"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("Log resolution steps to stderr (repeat for more)"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log as JSON lines"),
        )
        .subcommand(
            Command::new("sources")
                .about("Print cell sources, separated by blank lines")
                .arg(target_arg())
                .arg(
                    Arg::new("code")
                        .long("code")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("docs")
                        .help("Only code cells"),
                )
                .arg(
                    Arg::new("docs")
                        .long("docs")
                        .action(ArgAction::SetTrue)
                        .help("Only documentation cells"),
                )
                .arg(
                    Arg::new("tag")
                        .long("tag")
                        .value_name("TAG")
                        .help("Only cells carrying this metadata tag"),
                ),
        )
        .subcommand(
            Command::new("info")
                .about("Print notebook type, language and cell counts")
                .arg(target_arg())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Check a notebook against its format's schema")
                .arg(target_arg()),
        )
        .subcommand(
            Command::new("clean")
                .about("Strip outputs and volatile metadata")
                .arg(target_arg())
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_name("FILE")
                        .value_parser(value_parser!(PathBuf))
                        .help("Write here instead of stdout"),
                ),
        )
        .subcommand(
            Command::new("path")
                .about("Print the cache path of a notebook")
                .arg(Arg::new("uuid").required(true).value_name("UUID")),
        )
}
