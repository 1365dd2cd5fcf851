use enricher::commands::command_argument_builder;
use enricher::handlers::*;
use enricher_core::{CSV_DATA_KEY, Outcome, SUB_PAGES_KEY, URL_CONTENT_KEY, UrlInput};
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn plan_for(args: &[&str]) -> Result<EnrichPlan, String> {
    let mut argv = vec!["enricher", "enrich"];
    argv.extend_from_slice(args);
    let matches = command_argument_builder()
        .try_get_matches_from(argv)
        .unwrap();
    let (_, enrich) = matches.subcommand().unwrap();
    plan_from_matches(enrich)
}

// ============================================================================
// URL File Tests
// ============================================================================

#[test]
fn test_parse_url_line_with_scheme() {
    let result = parse_url_line("https://example.com");
    assert_eq!(result, Some("https://example.com".to_string()));
}

#[test]
fn test_parse_url_line_without_scheme() {
    let result = parse_url_line("example.com");
    assert_eq!(result, Some("http://example.com".to_string()));
}

#[test]
fn test_parse_url_line_host_and_port() {
    let result = parse_url_line("localhost:8080");
    assert_eq!(result, Some("http://localhost:8080".to_string()));
}

#[test]
fn test_parse_url_line_invalid() {
    let result = parse_url_line("not a valid url!!!");
    assert_eq!(result, None);
}

#[test]
fn test_load_urls_from_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut temp_file = NamedTempFile::new()?;
    writeln!(temp_file, "https://example.com")?;
    writeln!(temp_file, "httpbin.org")?;
    writeln!(temp_file)?; // Empty line
    writeln!(temp_file, "https://api.example.com")?;

    let urls = load_urls_from_file(temp_file.path())?;

    assert_eq!(urls.len(), 3);
    assert_eq!(urls[0], "https://example.com");
    assert_eq!(urls[1], "http://httpbin.org");
    assert_eq!(urls[2], "https://api.example.com");

    Ok(())
}

#[test]
fn test_load_urls_from_file_empty() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file).unwrap();
    writeln!(temp_file, "   ").unwrap();

    let result = load_urls_from_file(temp_file.path());

    assert!(result.is_err());
    assert!(result.unwrap_err().contains("No valid URLs"));
}

#[test]
fn test_load_urls_from_missing_file() {
    let result = load_urls_from_file(&PathBuf::from("/nonexistent/urls.txt"));
    assert!(result.unwrap_err().contains("Failed to read URLs file"));
}

#[test]
fn test_expand_path_leaves_plain_paths_alone() {
    assert_eq!(expand_path("data/companies.csv"), PathBuf::from("data/companies.csv"));
}

// ============================================================================
// Plan Tests
// ============================================================================

#[test]
fn test_plan_single_url_is_scalar() {
    let plan = plan_for(&["-u", "https://example.com/about"]).unwrap();
    assert_eq!(
        plan.urls,
        Some(UrlInput::Single("https://example.com/about".to_string()))
    );
    assert_eq!(plan.timeout_secs, 10);
    assert_eq!(plan.max_depth, 2);
    assert_eq!(plan.threads, 1);
}

#[test]
fn test_plan_repeated_url_is_list() {
    let plan = plan_for(&["-u", "https://a.example/", "-u", "https://b.example/"]).unwrap();
    assert_eq!(
        plan.urls,
        Some(UrlInput::Many(vec![
            "https://a.example/".to_string(),
            "https://b.example/".to_string()
        ]))
    );
}

#[test]
fn test_plan_urls_file_is_always_list() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file, "https://only.example/").unwrap();

    let plan = plan_for(&["-U", temp_file.path().to_str().unwrap()]).unwrap();
    assert_eq!(
        plan.urls,
        Some(UrlInput::Many(vec!["https://only.example/".to_string()]))
    );
}

#[test]
fn test_plan_csv_and_pdf_keys() {
    let plan = plan_for(&["--csv", "in.csv", "--pdf", "in.pdf", "--pdf-key", "Brochure"]).unwrap();
    assert_eq!(
        plan.csv,
        Some((PathBuf::from("in.csv"), CSV_DATA_KEY.to_string()))
    );
    assert_eq!(
        plan.pdf,
        Some((PathBuf::from("in.pdf"), "Brochure".to_string()))
    );
}

#[test]
fn test_plan_requires_a_step() {
    let result = plan_for(&["--timeout", "3"]);
    assert!(result.unwrap_err().contains("Nothing to do"));
}

// ============================================================================
// Run Tests
// ============================================================================

#[tokio::test]
async fn test_run_enrichment_all_web_steps() {
    let mock_server = MockServer::start().await;
    let uri = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_bytes(format!(r#"<html><body><h1>Home</h1><a href="{uri}/team">Team</a></body></html>"#).into_bytes()),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/team"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_bytes(b"<html><body><p>Our team</p></body></html>".to_vec()),
        )
        .mount(&mock_server)
        .await;

    let plan = EnrichPlan {
        urls: Some(UrlInput::Many(vec![
            format!("{}/team", uri),
            format!("{}/missing", uri),
        ])),
        sub_pages: Some(uri.clone()),
        timeout_secs: 5,
        max_depth: 2,
        threads: 1,
        ..Default::default()
    };

    let (output, reports) = run_enrichment(&plan, None).await.unwrap();

    assert_eq!(
        output.text_list(URL_CONTENT_KEY),
        Some(&["Our team".to_string(), String::new()][..])
    );
    assert_eq!(
        output.text_list(SUB_PAGES_KEY),
        Some(&[format!("{}/", uri), format!("{}/team", uri)][..])
    );
    assert_eq!(reports.len(), 2);
    assert!(matches!(reports[0].outcome, Outcome::PartiallyEnriched { .. }));
    assert_eq!(reports[1].outcome, Outcome::Enriched);
}

#[tokio::test]
async fn test_run_enrichment_csv_failure_defaults() {
    let plan = EnrichPlan {
        csv: Some((PathBuf::from("/nonexistent/in.csv"), "fallback".to_string())),
        timeout_secs: 5,
        ..Default::default()
    };

    let (output, reports) = run_enrichment(&plan, None).await.unwrap();

    assert!(output.records("fallback").is_some_and(|r| r.is_empty()));
    assert!(!output.contains_key(CSV_DATA_KEY));
    assert!(reports[0].outcome.is_defaulted());
}

#[tokio::test]
async fn test_run_enrichment_pdf_failure_aborts() {
    let mut csv_file = NamedTempFile::new().unwrap();
    writeln!(csv_file, "a,b").unwrap();
    writeln!(csv_file, "1,2").unwrap();

    let plan = EnrichPlan {
        csv: Some((csv_file.path().to_path_buf(), "unused".to_string())),
        pdf: Some((PathBuf::from("/nonexistent/in.pdf"), "PDF Text".to_string())),
        timeout_secs: 5,
        ..Default::default()
    };

    let err = run_enrichment(&plan, None).await.unwrap_err();
    assert!(err.to_string().contains("/nonexistent/in.pdf"));
}
