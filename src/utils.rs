//! Utils

use std::path::PathBuf;

use clap::Parser;

/// Arguments for the checkout walkthrough example.
#[derive(Debug, Parser)]
pub struct DemoArgs {
    /// Directory for the durable storage slots. A temporary directory is
    /// used when omitted.
    #[clap(short, long)]
    pub storage_dir: Option<PathBuf>,

    /// Destination country for the shipping address. Unknown countries
    /// fall back to the India tax rule.
    #[clap(short, long, default_value = "India")]
    pub country: String,

    /// Simulated settlement delay in milliseconds.
    #[clap(short, long, default_value_t = 2000)]
    pub delay_ms: u64,
}
