//! Tagwire exchange binary.
//!
//! # Usage
//!
//! ```bash
//! # Ten-message exchange under a fresh random key
//! tagwire
//!
//! # Fixed key, corrupt message 5 in flight
//! tagwire --key 0000000000000000000000000000000000000000000000000000000000000000 --corrupt 5
//!
//! # Corrupt the tags of messages 2 and 7 instead
//! tagwire --corrupt 2 --corrupt 7 --corrupt-tag
//!
//! # Truncate the tag of message 3 (the receiver rejects it and stops)
//! tagwire --corrupt 3 --corrupt-tag --truncate
//! ```

use clap::Parser;
use tagwire_core::{PeerId, SharedKey, TagAlgorithm};
use tagwire_session::{
    Alteration, CorruptionPlan, FrameKind, SessionConfig, random_key, run_session,
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Integrity-protected message exchange between two peers
#[derive(Parser, Debug)]
#[command(name = "tagwire")]
#[command(about = "HMAC-tagged message exchange between two peers")]
#[command(version)]
struct Args {
    /// Shared key as 64 hex digits (random if omitted)
    #[arg(short, long)]
    key: Option<String>,

    /// Keyed-hash algorithm
    #[arg(long, default_value = "HmacSHA256")]
    algorithm: String,

    /// Sending peer name
    #[arg(long, default_value = "alice")]
    sender: String,

    /// Receiving peer name
    #[arg(long, default_value = "bob")]
    receiver: String,

    /// Corrupt message N (1-based) in flight; may be repeated
    #[arg(long = "corrupt", value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    corrupt: Vec<u32>,

    /// Corrupt the tag frame instead of the message frame
    #[arg(long)]
    corrupt_tag: bool,

    /// Drop the last byte of corrupted frames instead of flipping a bit
    #[arg(long)]
    truncate: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    // Fail on configuration before any message is processed
    let algorithm: TagAlgorithm = args.algorithm.parse()?;
    let key = match &args.key {
        Some(encoded) => SharedKey::from_hex(encoded)?,
        None => random_key()?,
    };
    tracing::info!("Key: {}", key.to_hex());

    let frame = if args.corrupt_tag { FrameKind::Tag } else { FrameKind::Message };
    let alteration = if args.truncate { Alteration::Truncate } else { Alteration::default() };
    let corruption = CorruptionPlan::messages(args.corrupt.iter().map(|n| (n - 1) as usize))
        .on(frame)
        .altering(alteration);

    let config = SessionConfig {
        sender: PeerId::new(args.sender),
        receiver: PeerId::new(args.receiver),
        algorithm,
        corruption,
        ..SessionConfig::default()
    };

    let report = run_session(config, key).await?;

    tracing::info!(
        intact = report.intact_count(),
        corrupted = ?report.corrupted_indices().iter().map(|i| i + 1).collect::<Vec<_>>(),
        "exchange complete"
    );

    Ok(())
}
