//! Trust list certificate fetcher
//!
//! Usage: fetch-signing-certificates [--api-country Austria] [--cert-directory certs]
//!
//! Downloads the country's DCC trust list, checks its signature against the
//! pinned root under `<anchor-directory>/roots/` and writes one
//! `<key-id>.pem` per signing certificate.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use vacdec_certs::domain::report::FetchReport;
use vacdec_certs::{EngineError, FetchConfig, LimitsConfig};

const EXIT_FAILURE: u8 = 1;
const EXIT_PARTIAL_STORE: u8 = 3;

#[derive(Parser, Debug)]
#[command(name = "fetch-signing-certificates")]
#[command(about = "Fetch, verify and store DCC signing certificates")]
struct Args {
    /// Country whose trust list to fetch
    #[arg(long, value_name = "API-COUNTRY", default_value = "Austria")]
    api_country: String,

    /// Directory receiving the <key-id>.pem files
    #[arg(long, default_value = "certs")]
    cert_directory: PathBuf,

    /// Directory holding roots/<Country>-prod.pem
    #[arg(long, default_value = "certs")]
    anchor_directory: PathBuf,

    /// Fetch from this URL instead of the country endpoint
    #[arg(long, env = "VACDEC_ENDPOINT")]
    endpoint: Option<String>,

    /// Allow a plain http:// endpoint
    #[arg(long)]
    allow_insecure_http: bool,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "5")]
    timeout: u64,

    /// Also write the verified raw CBOR trust list to this file
    #[arg(long, value_name = "PATH")]
    dump_trust_list: Option<PathBuf>,

    /// Print the fetch report as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn to_config(&self) -> Result<FetchConfig, EngineError> {
        let mut cfg = FetchConfig::for_country(&self.api_country, &self.cert_directory)?;
        cfg.anchors_dir = self.anchor_directory.clone();
        cfg.endpoint_override = self.endpoint.clone();
        cfg.allow_insecure_http = self.allow_insecure_http.then_some(true);
        cfg.limits = LimitsConfig {
            http_timeout_secs: self.timeout,
            ..LimitsConfig::defaults()
        };
        cfg.dump_content = self.dump_trust_list.clone();
        Ok(cfg)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let cfg = match args.to_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(stage = e.stage(), "{e}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    let report = match vacdec_certs::fetch_certificates(&cfg) {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(stage = e.stage(), "{e}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    if let Err(e) = print_report(&report, args.json) {
        tracing::error!("{e:#}");
        return ExitCode::from(EXIT_FAILURE);
    }

    if report.store.is_complete() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_PARTIAL_STORE)
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}

fn print_report(report: &FetchReport, json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
        println!("{out}");
        return Ok(());
    }

    println!("country:        {}", report.country);
    println!("endpoint:       {}", report.endpoint);
    println!("server time:    {}", report.epoch);
    println!("list published: {}", report.list_timestamp);
    println!(
        "certificates:   {} written of {}",
        report.store.written_count(),
        report.store.discovered
    );
    for dup in &report.duplicates {
        println!("duplicate:      {dup}");
    }
    for failure in &report.store.failures {
        println!("failed:         {} ({})", failure.path.display(), failure.reason);
    }
    Ok(())
}
