// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! osem-relay CLI
//!
//! Relays weather station records to OpenSenseMap.
//!
//! # Usage
//!
//! ```bash
//! # Relay JSON records (one object per line) read from stdin
//! osem-relay --config osem.toml < records.jsonl
//!
//! # Check a configuration file
//! osem-relay validate --config osem.toml
//!
//! # Write an example configuration
//! osem-relay gen-config --output osem.toml
//!
//! # Post one synthetic record
//! osem-relay test --box-id <id> --auth-key <key> --sensor outTemp=<sensor id>
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use osem_relay::{
    build_payload, OpenSenseMapClient, PostRecord, Record, Relay, RelayConfig, SensorSpec,
    TracingSink, WorkerStatsSnapshot,
};
use osem_units::UnitSystem;
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

/// OpenSenseMap relay for weather station records
#[derive(Parser, Debug)]
#[command(name = "osem-relay")]
#[command(about = "Upload weather station records to OpenSenseMap")]
#[command(version)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate example configuration file
    GenConfig {
        /// Output file path
        #[arg(short, long, default_value = "osem-relay.toml")]
        output: PathBuf,
    },

    /// Validate a configuration file
    Validate {
        /// Configuration file path
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Post one synthetic record and report the server reply
    Test {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Box id (overrides the configuration)
        #[arg(long)]
        box_id: Option<String>,

        /// Box access token (overrides the configuration)
        #[arg(long)]
        auth_key: Option<String>,

        /// Server URL (overrides the configuration)
        #[arg(long)]
        server_url: Option<String>,

        /// Sensor mapping as FIELD=SENSOR_ID (can repeat)
        #[arg(long, value_delimiter = ',')]
        sensor: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Some(cmd) = args.command {
        return match cmd {
            Commands::GenConfig { output } => cmd_gen_config(output),
            Commands::Validate { config } => cmd_validate(config),
            Commands::Test {
                config,
                box_id,
                auth_key,
                server_url,
                sensor,
            } => cmd_test(config, box_id, auth_key, server_url, sensor).await,
        };
    }

    let Some(config_path) = args.config else {
        bail!("Missing --config (or use gen-config to create one)");
    };
    cmd_run(config_path).await
}

async fn cmd_run(config_path: PathBuf) -> Result<()> {
    let config = RelayConfig::from_file(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    let sink = TracingSink::from_config(&config.upload);
    let (handle, mut worker) = Relay::spawn(config, sink)?;

    eprintln!("osem-relay v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("Reading records from stdin, press Ctrl+C to stop...");

    let mut lines = spawn_line_reader(std::io::BufReader::new(std::io::stdin()))?;
    let mut line_no = 0u64;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                eprintln!("\nShutting down...");
                handle.stop();
                break;
            }
            line = lines.recv() => {
                let Some(line) = line else {
                    tracing::info!(
                        "End of input, draining {} queued record(s)",
                        handle.backlog_len()
                    );
                    handle.close();
                    break;
                };
                let line = line.context("reading stdin")?;
                line_no += 1;
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match Record::from_json(line) {
                    Ok(record) => {
                        handle.submit(record);
                    }
                    Err(e) => tracing::warn!("Line {}: invalid record: {}", line_no, e),
                }
            }
        }
    }

    let stats = tokio::select! {
        joined = &mut worker => joined?,
        _ = tokio::signal::ctrl_c() => {
            handle.stop();
            worker.await?
        }
    };

    eprintln!("\nFinal Statistics:");
    print_stats(&stats, handle.evicted());
    Ok(())
}

/// Read lines on a detached thread. A read blocked on stdin never holds up
/// runtime shutdown; the channel closes at end of input.
fn spawn_line_reader<R>(reader: R) -> std::io::Result<mpsc::Receiver<std::io::Result<String>>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(64);
    std::thread::Builder::new()
        .name("stdin-reader".into())
        .spawn(move || {
            for line in reader.lines() {
                let failed = line.is_err();
                if tx.blocking_send(line).is_err() || failed {
                    break;
                }
            }
        })?;
    Ok(rx)
}

fn cmd_gen_config(output: PathBuf) -> Result<()> {
    let toml_str = RelayConfig::example().to_toml_string()?;

    let content = format!(
        r#"# osem-relay configuration
# Generated by osem-relay gen-config
#
# Units use the weewx names (degree_C, km_per_hour, hPa, ...).
# Formats are printf-style (%.1f, %.0f, ...).

{}
"#,
        toml_str
    );

    std::fs::write(&output, content)
        .with_context(|| format!("writing {}", output.display()))?;
    println!("Generated configuration file: {}", output.display());
    Ok(())
}

fn cmd_validate(config_path: PathBuf) -> Result<()> {
    match RelayConfig::from_file(&config_path) {
        Ok(config) => {
            let creds = config.credentials();
            println!("Configuration valid!");
            println!();
            println!("Box:     {}", creds.redacted_box_id());
            println!("Server:  {}", config.station.server_url);
            println!(
                "Units:   {}",
                if config.station.us_units { "US" } else { "metric" }
            );
            println!("Sensors: {}", config.sensors.len());
            for (field, spec) in &config.sensors {
                println!(
                    "  {} -> {} ({}, {})",
                    field,
                    spec.sensor_id,
                    spec.unit
                        .map(|u| u.name().to_string())
                        .unwrap_or_else(|| "default unit".into()),
                    spec.format
                        .as_ref()
                        .map(|f| f.as_str().to_string())
                        .unwrap_or_else(|| "default format".into())
                );
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Configuration invalid: {}", e);
            std::process::exit(1);
        }
    }
}

async fn cmd_test(
    config_path: Option<PathBuf>,
    box_id: Option<String>,
    auth_key: Option<String>,
    server_url: Option<String>,
    sensors: Vec<String>,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => RelayConfig::from_file(&path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => RelayConfig::new(String::new(), String::new()),
    };
    if let Some(box_id) = box_id {
        config.station.box_id = box_id;
    }
    if let Some(auth_key) = auth_key {
        config.station.auth_key = auth_key;
    }
    if let Some(server_url) = server_url {
        config.station.server_url = server_url;
    }
    for entry in &sensors {
        let Some((field, sensor_id)) = entry.split_once('=') else {
            bail!("Invalid sensor '{}' (expected FIELD=SENSOR_ID)", entry);
        };
        config
            .sensors
            .insert(field.trim(), SensorSpec::new(sensor_id.trim()));
    }
    config.validate()?;

    let record = Record::new(chrono::Utc::now().timestamp(), UnitSystem::Us)
        .with("outTemp", 51.26)
        .with("inTemp", 75.8)
        .with("outHumidity", 72.0)
        .with("windSpeed", 8.0)
        .with("windDir", 331.0);

    let formatted = build_payload(&record, &config.sensors, config.station.us_units)?;
    for skipped in &formatted.skipped {
        tracing::warn!("{}", skipped);
    }

    let client = OpenSenseMapClient::new(
        config.station.server_url.clone(),
        Arc::new(config.credentials()),
        config.upload.timeout(),
    )?;
    println!("POST {}", client.redacted_url());
    println!("{}", formatted.payload.body_str());

    if formatted.payload.is_empty() {
        bail!("No mapped field in the test record");
    }

    let receipt = client.post(&formatted.payload).await?;
    println!("HTTP {}: {}", receipt.status, receipt.body.trim());
    Ok(())
}

fn print_stats(stats: &WorkerStatsSnapshot, evicted: u64) {
    println!("--- Upload Statistics ---");
    println!("  posted:         {}", stats.posted);
    println!("  failed:         {}", stats.failed);
    println!("  stale:          {}", stats.stale);
    println!("  rate limited:   {}", stats.rate_limited);
    println!("  empty:          {}", stats.empty);
    println!("  skipped upload: {}", stats.skipped_upload);
    println!("  abandoned:      {}", stats.abandoned);
    println!("  evicted:        {}", evicted);
    println!("  attempts:       {}", stats.attempts);
}
