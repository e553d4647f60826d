use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Tab-separated rows with a header line.
    Tsv,
    /// One JSON document with a summary and the rows.
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Tsv => "tsv",
            ExportFormat::Json => "json",
        }
    }
}

/// Check whether web targets answer, and how reliably.
#[derive(Debug, Parser)]
#[command(name = "probe_app", version)]
pub struct Cli {
    /// File with one host or URL per line. Reads stdin when omitted or `-`.
    pub targets: Option<PathBuf>,

    /// HTTP method, GET or POST. Anything else probes with GET.
    #[arg(short, long)]
    pub method: Option<String>,

    /// Requests sent to each candidate URL.
    #[arg(short, long)]
    pub attempts: Option<u32>,

    /// Per-request timeout.
    #[arg(short, long, value_name = "SECONDS")]
    pub timeout: Option<f64>,

    /// Targets probed at the same time.
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// Extra request header; repeat for more.
    #[arg(short = 'H', long = "header", value_name = "NAME: VALUE")]
    pub headers: Vec<String>,

    /// File of `Name: Value` lines appended to the request headers.
    #[arg(long, value_name = "FILE")]
    pub headers_file: Option<PathBuf>,

    /// Cookie header value, sent verbatim.
    #[arg(long)]
    pub cookie: Option<String>,

    /// User-Agent override.
    #[arg(long)]
    pub user_agent: Option<String>,

    /// RON settings file; command-line flags take precedence over it.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Where to write results. Defaults to `results_<unix time>.<format>`.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = ExportFormat::Tsv)]
    pub format: ExportFormat,

    /// Also write the log to this file.
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log every attempt.
    #[arg(short, long)]
    pub verbose: bool,
}
