use clap::ArgMatches;
use tracing::Level;

/// Log level picked by the global `--quiet` / `--verbose` flags.
pub fn level_from_matches(matches: &ArgMatches) -> Level {
    if matches.get_flag("quiet") {
        Level::ERROR
    } else if matches.get_flag("verbose") {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

/// Install the process-wide subscriber: timestamp, level and message on stderr.
///
/// Call once from the entry point. Later calls are ignored.
pub fn init_tracing(level: Level) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
