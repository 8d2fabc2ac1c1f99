use anyhow::{bail, Context, Result};
use bmconv_cli::Args;
use bmconv_core::{ConversionJob, ConversionReport};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(args.default_log_filter())),
        )
        .init();

    let config = args.resolve_config();
    let job = ConversionJob::new(config).context("Invalid key layout")?;

    if let Some(library) = &args.in_dir {
        let outcomes = job
            .run_batch(library)
            .with_context(|| format!("Failed to scan {}", library.display()))?;
        let mut failed = 0;
        for outcome in &outcomes {
            match &outcome.result {
                Ok(report) => log_report(report),
                Err(e) => {
                    failed += 1;
                    warn!("{}: {}", outcome.chart.path.display(), e);
                }
            }
        }
        println!(
            "Converted {} of {} charts",
            outcomes.len() - failed,
            outcomes.len()
        );
        return Ok(());
    }

    let Some(in_file) = &args.in_file else {
        bail!("No input given");
    };
    let report = job
        .run(in_file)
        .with_context(|| format!("Failed to convert {}", in_file.display()))?;
    log_report(&report);
    Ok(())
}

fn log_report(report: &ConversionReport) {
    if let Some(chart) = &report.chart {
        info!("Chart: {}", chart.display());
    }
    if let Some(audio) = &report.audio {
        info!("Audio: {}", audio.display());
    }
    info!(
        "Converted {} objects and {} sounds, copied {} files",
        report.objects,
        report.sounds,
        report.copied.len()
    );
}
