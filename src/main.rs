use anyhow::Result;
use clap::Parser;
use quakewatch::{clean_narrative, Receiver, ReceiverConfig, DEFAULT_BASE_URL};
use std::time::Duration;
use tracing::info;

/// Live monitor for the BMKG InaTEWS earthquake feeds.
#[derive(Parser, Debug)]
#[command(name = "quakewatch", version, about)]
struct Args {
    /// Bucket root to poll
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Seconds between fetch cycles
    #[arg(long, default_value_t = 15)]
    interval: u64,

    /// Per-request network timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Print the historical quake listing and exit
    #[arg(long)]
    history: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let config = ReceiverConfig {
        base_url: args.base_url,
        poll_interval: Duration::from_secs(args.interval),
        timeout: Duration::from_secs(args.timeout),
        ..ReceiverConfig::default()
    };
    let mut receiver = Receiver::new(config)?;

    if args.history {
        for reading in receiver.history().await? {
            println!(
                "{}  M{:<4} depth {:>5} km  {}  ({})",
                reading.time, reading.magnitude, reading.depth, reading.place, reading.status
            );
        }
        return Ok(());
    }

    let mut streams = receiver.start()?;
    info!("waiting for new quake data, Ctrl-C to stop");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                receiver.shutdown();
                break;
            }
            Some(alert) = streams.alerts.recv() => {
                println!("--- ALERT ---");
                println!("{}", alert.headline);
                println!("{}", alert.description);
                println!("Area      : {}", alert.area);
                println!("Magnitude : {}", alert.magnitude);
                println!("Depth     : {}", alert.depth);
                println!("Potential : {}", alert.potential);
                println!("{}", alert.instruction);
            }
            Some(reading) = streams.realtime.recv() => {
                println!("--- REALTIME ---");
                println!("{}", reading.place);
                println!("Time      : {}", reading.time);
                println!("Magnitude : {}", reading.magnitude);
                println!("Depth     : {}", reading.depth);
                println!("Phase     : {}", reading.phase);
                println!("Status    : {}", reading.status);
            }
            Some(narrative) = streams.narratives.recv() => {
                println!("--- NARRATIVE ({}) ---", narrative.event_id);
                println!("{}", clean_narrative(&narrative.text));
            }
            else => break,
        }
    }

    Ok(())
}
