use crate::CLAP_STYLING;
use clap::{ArgAction, arg};

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("citeloop")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("citeloop")
        .styles(CLAP_STYLING)
        .about(
            "Walks the citations of a web page and flags it as untrustworthy if any \
            descendant reference cites the page itself.",
        )
        .arg(
            arg!(<TARGET_URL>)
                .help("The page to audit (http:// is assumed when no scheme is given)"),
        )
        .arg(
            arg!(<MAX_GEN>)
                .help(
                    "How many generations of references to open, 1 to 4. With 1 only the \
                    target page is opened; with 2 its references are opened too, and so on.",
                )
                .allow_negative_numbers(true),
        )
        .arg(arg!(-q --"quiet" "Suppress banner and progress output").required(false))
        .arg(
            arg!(-v --"verbose" "Increase log verbosity (-v info, -vv debug)")
                .required(false)
                .action(ArgAction::Count),
        )
        .arg(
            arg!(-f --"format" <FORMAT>)
                .required(false)
                .help("Report format: text, json")
                .value_parser(["text", "json"])
                .default_value("text"),
        )
        .arg(
            arg!(-o --"output" <PATH>)
                .required(false)
                .help("Save report to file (default: display to screen)"),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .help("Request timeout in seconds")
                .value_parser(clap::value_parser!(u64))
                .default_value("10"),
        )
}
