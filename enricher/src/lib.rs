pub mod commands;
pub mod handlers;
pub mod logging;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    EnrichPlan, StepReport, expand_path, load_urls_from_file, parse_url_line, plan_from_matches,
    run_enrichment,
};

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
