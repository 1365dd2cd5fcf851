use crate::CLAP_STYLING;
use clap::{arg, command};
use url::Url;

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("enricher")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("enricher")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Only log errors and suppress the progress spinner and summary")
                .required(false)
                .global(true)
                .conflicts_with("verbose"),
        )
        .arg(
            arg!(-v --"verbose" "Log debug output")
                .required(false)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            command!("enrich")
                .about(
                    "Fill an output record from web pages, a crawled site, a CSV file and a PDF. \
                Failed fields fall back to empty values, except the PDF which aborts.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(false)
                        .help("URL to scrape. Repeat for a list; a single URL stores plain text")
                        .value_parser(clap::value_parser!(Url))
                        .action(clap::ArgAction::Append)
                        .conflicts_with("urls-file"),
                )
                .arg(
                    arg!(-U --"urls-file" <PATH>)
                        .required(false)
                        .help("Path to a newline-delimited file of URLs to scrape as a list")
                        .conflicts_with("url"),
                )
                .arg(
                    arg!(-s --"sub-pages" <BASE_URL>)
                        .required(false)
                        .help("Base URL to crawl for same-site sub-pages")
                        .value_parser(clap::value_parser!(Url)),
                )
                .arg(
                    arg!(--"max-depth" <DEPTH>)
                        .required(false)
                        .help("Link depth to crawl below the base URL")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("2"),
                )
                .arg(
                    arg!(-t --"threads" <NUM_WORKERS>)
                        .required(false)
                        .help("The number of async crawl workers")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("1"),
                )
                .arg(
                    arg!(--"csv" <PATH>)
                        .required(false)
                        .help("CSV file to load into \"CSV Data\""),
                )
                .arg(
                    arg!(--"csv-key" <KEY>)
                        .required(false)
                        .help("Key that receives an empty list when the CSV cannot be read")
                        .default_value("CSV Data"),
                )
                .arg(
                    arg!(--"pdf" <PATH>)
                        .required(false)
                        .help("PDF file whose text is extracted"),
                )
                .arg(
                    arg!(--"pdf-key" <KEY>)
                        .required(false)
                        .help("Key that receives the PDF text")
                        .default_value("PDF Text"),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("10"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Write the JSON result to a file (default: stdout)"),
                ),
        )
}
