use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pifpwned::{
    audit::{audit_export, AuditProgress, Auditor, NoProgress},
    checker::PwnedPasswordsApi,
    config::Config,
    model::{Item, LookupResult, ReportRow, UrlStyle},
    output::print_summary,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Exit codes for scripting
mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const ERROR: u8 = 1;
    pub const PWNED_FOUND: u8 = 2;
}

const USAGE_HINT: &str = "Please specify a file first.\nUse --file=path/to/file.1pif";

#[derive(Parser)]
#[command(name = "pifpwned")]
#[command(
    author,
    version,
    about = "Check 1Password exported files (*.1pif) against the Pwned Passwords API"
)]
struct Cli {
    /// Export directory containing data.1pif
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Export directory containing data.1pif (same as the positional argument)
    #[arg(long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Pause between lookups in milliseconds (at least 1500)
    #[arg(long)]
    delay_ms: Option<u64>,

    /// How item locations appear in the report
    #[arg(long, value_enum)]
    url_style: Option<UrlStyle>,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Exit with status 2 if any password was found pwned
    #[arg(long)]
    fail_on_pwned: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pifpwned={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<u8> {
    let Some(dir) = cli.file.or(cli.path) else {
        println!("{}", USAGE_HINT);
        return Ok(exit_codes::SUCCESS);
    };

    let mut config = Config::load().context("Failed to load config")?;
    if let Some(delay_ms) = cli.delay_ms {
        config.delay_ms = delay_ms;
    }
    if let Some(url_style) = cli.url_style {
        config.url_style = url_style;
    }

    let api = PwnedPasswordsApi::from_config(&config).context("Failed to build HTTP client")?;
    let auditor = Auditor::from_config(api, &config);

    let bar = (!cli.no_progress).then(BarProgress::new);
    let progress: &dyn AuditProgress = match &bar {
        Some(bar) => bar,
        None => &NoProgress,
    };

    let outcome = audit_export(&dir, &auditor, progress, shutdown_signal()).await;

    if let Some(bar) = &bar {
        bar.finish();
    }

    let report = outcome.with_context(|| format!("Failed to check {}", dir.display()))?;
    print_summary(&report);

    if cli.fail_on_pwned && report.result.pwned_count() > 0 {
        return Ok(exit_codes::PWNED_FOUND);
    }
    Ok(exit_codes::SUCCESS)
}

/// Resolves on Ctrl-C; never resolves if the handler can't be installed.
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    fn new() -> Self {
        let bar = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            bar.set_style(style.progress_chars("#>-"));
        }
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_message("Checking passwords");
        Self { bar }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl AuditProgress for BarProgress {
    fn on_start(&self, total: usize) {
        self.bar.set_length(total as u64);
    }

    fn on_item_start(&self, item: &Item) {
        self.bar.set_message(format!("Checking {}", item.title));
    }

    fn on_item_done(&self, _row: &ReportRow, _lookup: &LookupResult) {
        self.bar.inc(1);
    }

    fn on_item_skipped(&self, _item: &Item) {
        self.bar.inc(1);
    }
}
