//! Capture CLI - acquisition-loop entry point
//!
//! Opens a registered capture source and polls it the way a host
//! visualization pipeline would, logging throughput as chunks arrive.
//! Useful for bringing up the kernel driver and watching the stream without
//! a GUI host attached.

use anyhow::Context;
use novacap_rs::backend::SAMPLES_PER_CHUNK;
use novacap_rs::config::CaptureSettings;
use novacap_rs::source::{find_descriptor, registry, DataSource};
use novacap_rs::types::SampleFrame;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,novacap_rs=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = CaptureSettings::load_or_default();

    // An explicit argument overrides the configured source name.
    let source_name = std::env::args()
        .nth(1)
        .unwrap_or_else(|| settings.source_name.clone());

    let descriptor = find_descriptor(&source_name).with_context(|| {
        let known: Vec<_> = registry().iter().map(|d| d.name).collect();
        format!(
            "unknown capture source '{}' (registered: {})",
            source_name,
            known.join(", ")
        )
    })?;

    tracing::info!(
        source = descriptor.name,
        description = descriptor.description,
        "starting capture"
    );

    let mut source = descriptor.create();
    source
        .init()
        .with_context(|| format!("failed to open '{}'", descriptor.name))?;

    tracing::info!(
        channels = source.input_count(),
        sampling_rate = source.sampling_rate(),
        unit_per_volt = source.unit_per_volt(),
        "source ready"
    );

    let mut frame = SampleFrame::new(source.input_count(), SAMPLES_PER_CHUNK);
    let poll_interval = Duration::from_millis(settings.poll_interval_ms);
    let mut chunks: u64 = 0;
    let mut empty_cycles: u64 = 0;

    loop {
        let produced = source.get_raw_data(&mut frame);
        if produced == 0 {
            // Momentary gap: the device had nothing, retry next cycle.
            empty_cycles += 1;
            std::thread::sleep(poll_interval);
            continue;
        }

        chunks += 1;
        if chunks % settings.report_every_chunks == 0 {
            tracing::info!(
                chunks,
                samples = chunks * produced as u64,
                empty_cycles,
                success_pct = 100.0 * chunks as f64 / (chunks + empty_cycles) as f64,
                "capture progress"
            );
        }

        std::thread::sleep(poll_interval);
    }
}
