use enricher::commands::command_argument_builder;
use enricher::handlers::handle_enrich;
use enricher::logging::{init_tracing, level_from_matches};

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    init_tracing(level_from_matches(&chosen_command));

    let result = match chosen_command.subcommand() {
        Some(("enrich", primary_command)) => handle_enrich(primary_command, quiet).await,
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = result {
        eprintln!("✗ {:#}", e);
        std::process::exit(1);
    }
}
