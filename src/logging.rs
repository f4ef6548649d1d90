use std::io::stderr;

use anyhow::Result;
use tracing_subscriber::{
    layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

/// Log to stderr, keeping stdout for the results. `RUST_LOG` overrides the
/// default `info` level.
pub fn init() -> Result<()> {
    let format_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let format_layer = tracing_subscriber::fmt::layer()
        .with_writer(stderr)
        .without_time()
        .with_filter(format_filter);
    tracing_subscriber::registry().with(format_layer).try_init()?;
    Ok(())
}
