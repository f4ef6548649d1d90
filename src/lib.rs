use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use reqwest::Url;
use serde::Deserialize;
use tracing::{info, warn};

pub mod batch;
pub mod geocode;
mod logging;
#[cfg(test)]
mod mock;
pub mod output;

use batch::{FailurePolicy, DEFAULT_LANDMARKS};
use geocode::{GeocodeClient, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};
use output::Format;

/// Look up the coordinates of landmarks with the LocationIQ geocoding API and
/// print a name to coordinate mapping.
///
/// Without any names or input file, the Great Wall of China, Petra, the
/// Colosseum, Chichen Itza and Machu Picchu are looked up.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Place names to look up, in order
    #[arg(value_name = "NAME")]
    names: Vec<String>,

    /// Read more place names from a CSV file
    ///
    /// The file needs a header row with a "name" column. Google Maps
    /// saved-place exports work as-is, their "Title" column is used.
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// LocationIQ API key
    #[arg(long, env = "LOCATIONIQ_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Geocoding search endpoint
    #[arg(long, env = "LOCATIONIQ_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: Url,

    /// Per-request timeout in seconds
    #[arg(
        long,
        value_name = "SECS",
        default_value_t = DEFAULT_TIMEOUT.as_secs()
    )]
    timeout_secs: u64,

    /// Skip places that fail to look up instead of aborting
    #[arg(long)]
    keep_going: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::default())]
    format: Format,

    /// Write the output to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

/// Run the command-line interface
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init()?;

    let mut names = cli.names;
    if let Some(input) = &cli.input {
        names.extend(read_names(input)?);
    } else if names.is_empty() {
        names = DEFAULT_LANDMARKS.iter().map(ToString::to_string).collect();
    }

    // check that we can write to the output file before spending time on
    // the lookups
    if let Some(output) = &cli.output {
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(output)
            .with_context(|| format!("cannot write to {}", output.display()))?;
    }

    let timeout = Duration::from_secs(cli.timeout_secs);
    let client = GeocodeClient::new(cli.endpoint, cli.api_key, timeout)?;
    let policy = if cli.keep_going {
        FailurePolicy::KeepGoing
    } else {
        FailurePolicy::FailFast
    };
    info!(
        count = names.len(),
        endpoint = %client.endpoint(),
        "🌍 Looking up places…",
    );
    let lookups = batch::lookup_all(&client, &names, policy).await?;

    let mut rendered = output::render(&lookups, cli.format)?;
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    match &cli.output {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => io::stdout()
            .lock()
            .write_all(rendered.as_bytes())
            .context("failed to write to stdout")?,
    }
    Ok(())
}

/// A row of the input CSV.
#[derive(Debug, Deserialize)]
struct Record {
    #[serde(alias = "Title")]
    name: String,
}

/// Read place names from a CSV file, skipping rows that don't parse or have
/// an empty name.
fn read_names(path: &Path) -> Result<Vec<String>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let mut names = vec![];
    for (i, result) in rdr.deserialize::<Record>().enumerate() {
        match result {
            Ok(record) if !record.name.trim().is_empty() => {
                names.push(record.name.trim().to_string());
            }
            Ok(_) => warn!(row = i + 1, "Skipping a row without a name"),
            Err(e) => {
                warn!(
                    row = i + 1,
                    "Failed to parse CSV record with error {e}. Continuing.",
                );
            }
        }
    }
    Ok(names)
}
