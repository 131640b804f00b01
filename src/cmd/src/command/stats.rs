use std::path::PathBuf;

use arrow::util::pretty::pretty_format_batches;
use clap::Parser;
use events_gen::schema::COLUMN_EVENT_CATEGORY;
use events_gen::writer::read_partition;
use events_gen::writer::read_partition_stats;
use tracing::info;

use crate::config::LogLevel;
use crate::error::Error;
use crate::error::Result;

#[derive(Parser, Clone)]
pub struct Stats {
    /// Output location written by `gen`
    #[arg(long)]
    pub path: PathBuf,
    #[arg(long, default_value = COLUMN_EVENT_CATEGORY)]
    pub partition_key: String,
    /// Print the first N rows of every partition
    #[arg(long)]
    pub preview: Option<usize>,
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

pub fn stats(args: &Stats) -> Result<()> {
    if !args.path.try_exists()? {
        return Err(Error::Internal(format!(
            "path {:?} doesn't exist",
            args.path
        )));
    }

    let partitions = read_partition_stats(&args.path, &args.partition_key)?;
    info!("{} partition(s) in {:?}", partitions.len(), args.path);

    let mut total = 0;
    for (value, stats) in &partitions {
        println!(
            "{}={value}: {} rows in {} file(s)",
            args.partition_key, stats.rows, stats.files
        );
        total += stats.rows;
    }
    println!("total: {total} rows");

    if let Some(limit) = args.preview {
        for value in partitions.keys() {
            let mut rows = Vec::new();
            let mut left = limit;
            for batch in read_partition(&args.path, &args.partition_key, value)? {
                if left == 0 {
                    break;
                }
                let n = left.min(batch.num_rows());
                rows.push(batch.slice(0, n));
                left -= n;
            }
            println!("{}={value}", args.partition_key);
            println!("{}", pretty_format_batches(&rows)?);
        }
    }

    Ok(())
}
