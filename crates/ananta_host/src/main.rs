//! # ananta-host — reference host
//!
//! Reads one JSON call envelope per line from stdin, writes one JSON reply
//! per line to stdout, and interleaves engine events (`onStatisticsUpdate`,
//! `onFieldsUpdate`) on the same stream. Logs go to stderr.
//!
//! ## Lifecycle
//!
//! 1. Build the engine from command-line options.
//! 2. Serve calls until stdin reaches EOF or Ctrl-C arrives.
//! 3. Shut the engine down, then drain the output queue.
//!
//! All stdout writes go through one writer task. Events are queued without
//! blocking and dropped with a warning when the queue is full, so a reader
//! that stops draining stdout never stalls the tick loop.

use std::sync::Arc;
use std::time::Duration;

use ananta_bridge::Dispatcher;
use ananta_bridge::codec;
use ananta_engine::{EngineConfig, EngineEvent, EventSink, FieldEngine, SinkError};
use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "ananta-host",
    about = "Acoustic field engine over JSON lines on stdin/stdout"
)]
struct Args {
    /// Background tick interval in milliseconds
    #[arg(long, default_value_t = 100)]
    tick_interval_ms: u64,

    /// Per-tick probability that a superposed field decoheres
    #[arg(long, default_value_t = 0.05)]
    decoherence_probability: f64,

    /// Initial engine-wide quantum uncertainty
    #[arg(long, default_value_t = 0.1)]
    uncertainty: f64,

    /// Seed for the engine's random source
    #[arg(long)]
    seed: Option<u64>,

    /// Stop the background loop after this many ticks (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    max_ticks: u64,

    /// Only decohere on explicit updateSystem calls
    #[arg(long)]
    no_background_decoherence: bool,

    /// Lines buffered for stdout before events are dropped
    #[arg(long, default_value_t = 1024)]
    output_buffer: usize,
}

impl Args {
    fn engine_config(&self) -> EngineConfig {
        let config = EngineConfig::default()
            .with_tick_interval(Duration::from_millis(self.tick_interval_ms))
            .with_decoherence_probability(self.decoherence_probability)
            .with_initial_uncertainty(self.uncertainty)
            .with_max_ticks(self.max_ticks)
            .with_background_decoherence(!self.no_background_decoherence);
        match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }
}

/// Queues each event as one JSON line for the stdout writer.
struct StdoutSink {
    tx: mpsc::Sender<String>,
}

impl EventSink for StdoutSink {
    fn deliver(&self, event: &EngineEvent) -> Result<(), SinkError> {
        let line = codec::encode_json(event).map_err(|e| SinkError::Encode(e.to_string()))?;
        self.tx.try_send(line).map_err(|e| match e {
            TrySendError::Full(_) => SinkError::Full,
            TrySendError::Closed(_) => SinkError::Closed,
        })
    }
}

async fn write_lines(mut rx: mpsc::Receiver<String>) -> std::io::Result<()> {
    let mut out = tokio::io::stdout();
    while let Some(line) = rx.recv().await {
        out.write_all(line.as_bytes()).await?;
        out.write_all(b"\n").await?;
        out.flush().await?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let (tx, rx) = mpsc::channel(args.output_buffer.max(1));
    let writer = tokio::spawn(write_lines(rx));

    let sink = Arc::new(StdoutSink { tx: tx.clone() });
    let engine = Arc::new(FieldEngine::new(args.engine_config(), sink));
    info!(instance_id = %engine.instance_id(), "ananta-host ready");

    let dispatcher = Dispatcher::new(Arc::clone(&engine));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("stdin closed");
                    break;
                };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let reply = dispatcher.handle_json(line);
                if tx.send(reply).await.is_err() {
                    warn!("stdout writer stopped");
                    break;
                }
            }
            signal = tokio::signal::ctrl_c() => {
                signal?;
                info!("interrupted");
                break;
            }
        }
    }

    engine.shutdown().await;
    drop(dispatcher);
    drop(engine);
    drop(tx);
    writer.await??;

    info!("ananta-host shut down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_queue_drops_event_without_blocking() {
        let (tx, mut rx) = mpsc::channel(1);
        let sink = StdoutSink { tx };
        let event = EngineEvent::FieldsUpdate(Vec::new());

        sink.deliver(&event).unwrap();
        assert!(matches!(sink.deliver(&event), Err(SinkError::Full)));

        let line = rx.try_recv().unwrap();
        assert_eq!(line, r#"{"method":"onFieldsUpdate","arguments":[]}"#);
    }

    #[test]
    fn test_closed_queue_reports_closed() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sink = StdoutSink { tx };
        let event = EngineEvent::FieldsUpdate(Vec::new());
        assert!(matches!(sink.deliver(&event), Err(SinkError::Closed)));
    }
}
