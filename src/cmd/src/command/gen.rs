use std::path::PathBuf;

use bytesize::ByteSize;
use clap::Parser;
use events_gen::scenario::Config;
use events_gen::scenario::Scenario;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;
use tracing::info;

use crate::config::LogLevel;
use crate::error::Result;

#[derive(Parser, Clone)]
pub struct Gen {
    /// TOML config file, layered over the built-in defaults
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Overrides `output.path`
    #[arg(long)]
    pub out_path: Option<PathBuf>,
    /// Overrides `log.level`
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,
}

pub fn gen(cfg: Config) -> Result<()> {
    debug!("out path: {:?}", cfg.output_location);
    debug!("from date {}", cfg.start_date);
    debug!("to date {}", cfg.end_date);
    let date_diff = cfg.end_date - cfg.start_date;
    debug!(
        "time range: {}",
        humantime::format_duration(date_diff.to_std()?)
    );
    debug!("batch size: {}", cfg.batch_size);
    info!(
        "expecting {} product view, {} order and {} account events",
        cfg.counts.product_view, cfg.counts.order, cfg.counts.account
    );
    info!("starting event generation...");

    let out = cfg.output_location.clone();
    let mut scenario = Scenario::try_new(cfg, StdRng::from_entropy())?;
    let stats = scenario.run()?;

    info!("successfully generated!");
    for (category, rows) in &stats.rows {
        info!("{category}: {rows} events");
    }
    debug!(
        "batches: {}, files: {}, on-disk size: {}",
        stats.batches,
        stats.files,
        ByteSize::b(stats.bytes)
    );
    info!("total {} events saved to {:?}", stats.total_rows(), out);

    Ok(())
}
