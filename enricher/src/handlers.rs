use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use enricher_core::{
    CsvReader, ExternalData, Outcome, PdfExtractor, UrlInput, find_sub_pages, read_csv, read_pdf,
    scrape_url_content,
};
use enricher_scanner::{ContentFetcher, Crawler, ScanConfig};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;
use url::Url;

/// Everything one `enrich` run should do, resolved from the command line.
#[derive(Debug, Clone, Default)]
pub struct EnrichPlan {
    pub urls: Option<UrlInput>,
    pub sub_pages: Option<String>,
    pub csv: Option<(PathBuf, String)>,
    pub pdf: Option<(PathBuf, String)>,
    pub output: Option<PathBuf>,
    pub timeout_secs: u64,
    pub max_depth: usize,
    pub threads: usize,
}

/// Result of one step, in run order, for the summary.
#[derive(Debug, Clone)]
pub struct StepReport {
    pub step: &'static str,
    pub outcome: Outcome,
}

/// Load and parse URLs from a file
pub fn load_urls_from_file(path: &Path) -> Result<Vec<String>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read URLs file {}: {}", path.display(), e))?;

    let urls: Vec<String> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| parse_url_line(line.trim()))
        .collect();

    if urls.is_empty() {
        return Err(format!("No valid URLs found in {}", path.display()));
    }

    Ok(urls)
}

/// Parse a single line as a URL, trying to add http:// if needed
pub fn parse_url_line(line: &str) -> Option<String> {
    if let Ok(url) = Url::parse(line)
        && url.has_host()
    {
        return Some(line.to_string());
    }

    let with_scheme = format!("http://{}", line);
    if Url::parse(&with_scheme).is_ok() {
        return Some(with_scheme);
    }

    warn!("Skipping invalid URL '{}'", line);
    None
}

/// Expand a leading `~` in a user-supplied path.
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

/// Resolve the `enrich` subcommand's arguments into a plan.
pub fn plan_from_matches(args: &ArgMatches) -> Result<EnrichPlan, String> {
    let urls = if let Some(file) = args.get_one::<String>("urls-file") {
        Some(UrlInput::Many(load_urls_from_file(&expand_path(file))?))
    } else {
        args.get_many::<Url>("url").map(|values| {
            let mut urls: Vec<String> = values.map(|u| u.as_str().to_string()).collect();
            if urls.len() == 1 {
                UrlInput::Single(urls.remove(0))
            } else {
                UrlInput::Many(urls)
            }
        })
    };

    let sub_pages = args.get_one::<Url>("sub-pages").map(|u| u.as_str().to_string());

    let csv = args.get_one::<String>("csv").map(|path| {
        let key = args
            .get_one::<String>("csv-key")
            .cloned()
            .unwrap_or_else(|| enricher_core::CSV_DATA_KEY.to_string());
        (expand_path(path), key)
    });

    let pdf = args.get_one::<String>("pdf").map(|path| {
        let key = args
            .get_one::<String>("pdf-key")
            .cloned()
            .unwrap_or_else(|| "PDF Text".to_string());
        (expand_path(path), key)
    });

    if urls.is_none() && sub_pages.is_none() && csv.is_none() && pdf.is_none() {
        return Err(
            "Nothing to do: pass at least one of --url, --urls-file, --sub-pages, --csv or --pdf"
                .to_string(),
        );
    }

    Ok(EnrichPlan {
        urls,
        sub_pages,
        csv,
        pdf,
        output: args.get_one::<String>("output").map(|p| expand_path(p)),
        timeout_secs: args.get_one::<u64>("timeout").copied().unwrap_or(10),
        max_depth: args.get_one::<usize>("max-depth").copied().unwrap_or(2),
        threads: args.get_one::<usize>("threads").copied().unwrap_or(1),
    })
}

/// Run the planned steps in order against one fresh mapping.
///
/// A PDF extraction failure aborts the run and is returned as the error.
pub async fn run_enrichment(
    plan: &EnrichPlan,
    progress: Option<&ProgressBar>,
) -> Result<(ExternalData, Vec<StepReport>)> {
    let config = ScanConfig::default().with_timeout(plan.timeout_secs);
    let mut output = ExternalData::new();
    let mut reports = Vec::new();

    let set_message = |msg: String| {
        if let Some(pb) = progress {
            pb.set_message(msg);
        }
    };

    if let Some(ref urls) = plan.urls {
        set_message(format!("Scraping {}", urls));
        let fetcher = ContentFetcher::new(&config)?;
        let outcome = scrape_url_content(&mut output, &fetcher, urls.clone()).await;
        reports.push(StepReport {
            step: "URL content",
            outcome,
        });
    }

    if let Some(ref base_url) = plan.sub_pages {
        set_message(format!("Crawling {}", base_url));
        let crawler = Crawler::new(&config)?
            .with_max_depth(plan.max_depth)
            .with_workers(plan.threads);
        let outcome = find_sub_pages(&mut output, &crawler, base_url).await;
        reports.push(StepReport {
            step: "Sub pages",
            outcome,
        });
    }

    if let Some((ref path, ref key)) = plan.csv {
        set_message(format!("Reading {}", path.display()));
        let outcome = read_csv(&mut output, &CsvReader::new(), path, key);
        reports.push(StepReport {
            step: "CSV",
            outcome,
        });
    }

    if let Some((ref path, ref key)) = plan.pdf {
        set_message(format!("Extracting {}", path.display()));
        let outcome = read_pdf(&mut output, &PdfExtractor::new(), path, key)?;
        reports.push(StepReport {
            step: "PDF",
            outcome,
        });
    }

    Ok((output, reports))
}

fn print_summary(reports: &[StepReport]) {
    eprintln!("{}", "═".repeat(60).bright_blue().bold());
    for report in reports {
        match &report.outcome {
            Outcome::Enriched => {
                eprintln!("{} {}", "✓".green().bold(), report.step.bright_white());
            }
            Outcome::PartiallyEnriched { failed } => {
                eprintln!(
                    "{} {} ({} failed, left empty)",
                    "⚠".yellow().bold(),
                    report.step.bright_white(),
                    failed.len().to_string().yellow()
                );
                for url in failed {
                    eprintln!("  {} {}", "•".yellow(), url);
                }
            }
            Outcome::Defaulted { reason } => {
                eprintln!(
                    "{} {} defaulted: {}",
                    "✗".red().bold(),
                    report.step.bright_white(),
                    reason
                );
            }
        }
    }
    eprintln!("{}", "═".repeat(60).bright_blue().bold());
}

fn write_output(output: &ExternalData, destination: Option<&PathBuf>) -> Result<()> {
    let json = output.to_json_pretty()?;
    match destination {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        None => println!("{}", json),
    }
    Ok(())
}

pub async fn handle_enrich(sub_matches: &ArgMatches, quiet: bool) -> Result<()> {
    let plan = plan_from_matches(sub_matches).map_err(anyhow::Error::msg)?;

    let spinner = if quiet {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    };

    let result = run_enrichment(&plan, spinner.as_ref()).await;

    if let Some(ref pb) = spinner {
        pb.finish_and_clear();
    }

    let (output, reports) = result?;

    if !quiet {
        print_summary(&reports);
    }

    write_output(&output, plan.output.as_ref())?;

    if let Some(ref path) = plan.output
        && !quiet
    {
        eprintln!(
            "{} Wrote {}",
            "✓".green().bold(),
            path.display().to_string().bright_white()
        );
    }

    Ok(())
}
