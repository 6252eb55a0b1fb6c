use anyhow::{Context, Result};
use clap::Parser;
use pageperf::cli::{Cli, OutputFormat};
use pageperf::config::{AnalyzerConfig, Settings};
use pageperf::csv_output::CsvOutput;
use pageperf::json_output::JsonOutput;
use pageperf::report::AggregateReport;
use pageperf::stats::{analyze_file, analyze_reader};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Render the report in the requested format
fn render(report: &AggregateReport, settings: &Settings) -> Result<String> {
    let output = match settings.format {
        OutputFormat::Text => report.to_text(settings.show_empty_tiers),
        OutputFormat::Json => {
            let mut json = JsonOutput::from_report(report, settings.show_empty_tiers).to_json()?;
            json.push('\n');
            json
        }
        OutputFormat::Csv => CsvOutput::new(report, settings.show_empty_tiers).to_csv(),
    };
    Ok(output)
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let config = match &args.config {
        Some(path) => AnalyzerConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AnalyzerConfig::default(),
    };
    let settings = config.resolve(args.skip_malformed, args.show_empty_tiers, args.format);

    let report = if args.reads_stdin() {
        let stdin = std::io::stdin();
        analyze_reader(stdin.lock(), settings.policy).context("Failed to analyze stdin")?
    } else {
        analyze_file(&args.log_file, settings.policy)
            .with_context(|| format!("Failed to analyze {}", args.log_file.display()))?
    };

    if report.is_empty() {
        eprintln!("No requests found.");
    }

    print!("{}", render(&report, &settings)?);

    if report.skipped_lines > 0 {
        eprintln!("Skipped {} malformed line(s)", report.skipped_lines);
    }

    Ok(())
}
