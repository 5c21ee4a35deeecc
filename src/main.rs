//! stations-stream
//!
//! Materializes the CTA station table: consumes `org.cta.stations`, classifies
//! each station's line and publishes the table changelog, until SIGINT or
//! SIGTERM.

use clap::Parser;
use ctastreams::cta::config::{BOOTSTRAP_SERVERS_ENV, CtaSettings, SCHEMA_REGISTRY_URL_ENV};
use ctastreams::cta::kafka::{
    KafkaConsumer, KafkaProducer, KafkaRecordSource, ProducerConfig, StopHandle, stop_channel,
};
use ctastreams::cta::stream::{StationTable, StationsAgent, StreamAppConfig};
use ctastreams::AppContext;
use log::{info, warn};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "stations-stream")]
#[command(about = "Builds the CTA stations table from the stations topic")]
#[command(version = "0.1.0")]
struct Cli {
    /// Comma separated bootstrap brokers (overrides CTA_BOOTSTRAP_SERVERS)
    #[arg(short, long)]
    brokers: Option<String>,

    /// Schema registry URL (overrides CTA_SCHEMA_REGISTRY_URL)
    #[arg(long)]
    schema_registry: Option<String>,

    /// Idle wait between drain cycles, in milliseconds
    #[arg(long, default_value = "1000")]
    sleep_ms: u64,

    /// Start with an empty table instead of replaying the changelog
    #[arg(long)]
    skip_recovery: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let settings = CtaSettings::from_lookup(|key| match key {
        BOOTSTRAP_SERVERS_ENV => cli.brokers.clone().or_else(|| std::env::var(key).ok()),
        SCHEMA_REGISTRY_URL_ENV => cli
            .schema_registry
            .clone()
            .or_else(|| std::env::var(key).ok()),
        _ => std::env::var(key).ok(),
    });

    let app = StreamAppConfig::default();
    info!(
        "Starting {} on {} (table {})",
        app.app_id,
        settings.bootstrap_servers(),
        app.table_name
    );

    let ctx = AppContext::connect(settings)?;

    let changelog = KafkaProducer::new(
        ProducerConfig::new(ctx.settings(), &app.changelog_topic).topology(app.table_partitions, 1),
        &ctx,
    )
    .await?;
    let mut agent = StationsAgent::new(StationTable::new(), changelog);

    if cli.skip_recovery {
        info!("Skipping changelog recovery");
    } else {
        let mut source = KafkaRecordSource::subscribe(&app.replay_config(ctx.settings()), &ctx)?;
        agent.recover(&mut source, app.recovery_max_idle_polls).await;
        source.close();
    }

    let config = app.input_config(ctx.settings(), Duration::from_millis(cli.sleep_ms));
    let mut consumer = KafkaConsumer::new(config, agent, &ctx)?;

    let (stop, signal) = stop_channel();
    tokio::spawn(stop_on_shutdown(stop));

    let stats = consumer.consume(signal).await;
    consumer.close();
    if let Err(e) = consumer.handler_mut().changelog_mut().close() {
        warn!("Failed to close changelog producer: {}", e);
    }

    info!(
        "{} stopped: {} processed, {} dropped, {} stations in table",
        app.app_id,
        stats.processed,
        stats.dropped,
        consumer.handler().table().len()
    );
    Ok(())
}

async fn stop_on_shutdown(stop: StopHandle) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => info!("Received SIGINT"),
                    _ = terminate.recv() => info!("Received SIGTERM"),
                }
            }
            Err(e) => {
                warn!("Cannot listen for SIGTERM: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        info!("Received Ctrl-C");
    }
    stop.stop();
}
