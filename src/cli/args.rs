//! CLI argument definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cert-health")]
#[command(author = "Russ McKendrick")]
#[command(version)]
#[command(about = "Endpoint liveness and TLS certificate health checker", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Write a report to file (.json for JSON, anything else for text)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub output: Option<PathBuf>,

    /// Configuration file (default: config/default.toml when present)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect the certificate served by one or more hosts
    Inspect(InspectArgs),

    /// Inspect every target listed in a file
    Batch(BatchArgs),

    /// Check that URLs answer over HTTP
    Probe(ProbeArgs),

    /// Run the HTTP API server
    Serve(ServeArgs),

    /// Show version and TLS client availability
    SystemInfo,
}

#[derive(Args)]
pub struct InspectArgs {
    /// Hosts to inspect (host, host:port or URL)
    #[arg(required = true, value_name = "TARGET")]
    pub targets: Vec<String>,

    /// Port used when a target does not name one
    #[arg(long, default_value = "443")]
    pub port: u16,

    /// Handshake timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

#[derive(Args)]
pub struct BatchArgs {
    /// JSON array of targets, or one target per line
    #[arg(required = true)]
    pub file: PathBuf,

    /// Number of parallel handshakes
    #[arg(short, long)]
    pub parallel: Option<usize>,

    /// Handshake timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Overall batch budget in seconds (0 = none)
    #[arg(long)]
    pub batch_timeout: Option<u64>,

    /// Only show targets with issues
    #[arg(long)]
    pub issues_only: bool,
}

#[derive(Args)]
pub struct ProbeArgs {
    /// URLs to probe
    #[arg(required = true, value_name = "URL")]
    pub urls: Vec<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(short, long, value_name = "ADDR")]
    pub bind: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}
