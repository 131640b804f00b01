use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration as StdDuration;
use std::time::Instant;

use arrow::datatypes::SchemaRef;
use bytesize::ByteSize;
use chrono::DateTime;
use chrono::Utc;
use enum_iterator::all;
use rand::Rng;
use tracing::debug;
use tracing::info;

use crate::batch_builder::RecordBatchBuilder;
use crate::error::EventsGenError;
use crate::error::Result;
use crate::events::EventCategory;
use crate::events::EventType;
use crate::generator;
use crate::generator::TimeWindow;
use crate::ids::IdPools;
use crate::schema::create_schema;
use crate::schema::COLUMN_EVENT_CATEGORY;
use crate::writer::PartitionedWriter;
use crate::writer::WriteMode;

pub const DEFAULT_BATCH_SIZE: usize = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventCounts {
    pub product_view: usize,
    pub order: usize,
    pub account: usize,
}

impl EventCounts {
    pub fn get(&self, typ: EventType) -> usize {
        match typ {
            EventType::ProductView => self.product_view,
            EventType::Order => self.order,
            EventType::Account => self.account,
        }
    }

    pub fn total(&self) -> usize {
        all::<EventType>().map(|typ| self.get(typ)).sum()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub counts: EventCounts,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub output_location: PathBuf,
    pub partition_key: String,
    pub batch_size: usize,
}

impl Config {
    /// Checks the configuration and returns the time window it describes.
    pub fn validate(&self) -> Result<TimeWindow> {
        for typ in all::<EventType>() {
            if self.counts.get(typ) == 0 {
                return Err(EventsGenError::Config(format!(
                    "{typ} event count should be positive"
                )));
            }
        }
        if self.batch_size == 0 {
            return Err(EventsGenError::Config(
                "batch size should be positive".to_string(),
            ));
        }
        // rows are addressed with u32 indices when split into partitions
        if self.batch_size > u32::MAX as usize {
            return Err(EventsGenError::Config(format!(
                "batch size should be at most {}",
                u32::MAX
            )));
        }
        if self.partition_key != COLUMN_EVENT_CATEGORY {
            return Err(EventsGenError::Config(format!(
                "unsupported partition key {:?}, only {COLUMN_EVENT_CATEGORY} is supported",
                self.partition_key
            )));
        }
        if self.output_location.as_os_str().is_empty() {
            return Err(EventsGenError::Config(
                "output location should be set".to_string(),
            ));
        }

        TimeWindow::try_new(self.start_date, self.end_date)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteState {
    FirstBatch,
    Subsequent,
}

/// Hands out the write mode for each batch of a run: the very first batch
/// overwrites the output location, every later one appends.
#[derive(Debug, Clone)]
pub struct WriteModes {
    state: WriteState,
}

impl WriteModes {
    pub fn new() -> Self {
        Self {
            state: WriteState::FirstBatch,
        }
    }

    pub fn next_mode(&mut self) -> WriteMode {
        match self.state {
            WriteState::FirstBatch => {
                self.state = WriteState::Subsequent;
                WriteMode::Overwrite
            }
            WriteState::Subsequent => WriteMode::Append,
        }
    }
}

impl Default for WriteModes {
    fn default() -> Self {
        Self::new()
    }
}

/// Splits `total` into chunks of at most `batch_size`.
pub fn batch_sizes(total: usize, batch_size: usize) -> impl Iterator<Item = usize> {
    let batch_size = batch_size.max(1);
    (0..total)
        .step_by(batch_size)
        .map(move |offset| batch_size.min(total - offset))
}

#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub batches: usize,
    pub rows: BTreeMap<EventCategory, usize>,
    pub files: usize,
    pub bytes: u64,
    pub elapsed: StdDuration,
}

impl RunStats {
    pub fn total_rows(&self) -> usize {
        self.rows.values().sum()
    }
}

pub struct Scenario<R> {
    pub rng: R,
    pub pools: IdPools,
    pub window: TimeWindow,
    pub counts: EventCounts,
    pub batch_size: usize,
    pub schema: SchemaRef,
    pub writer: PartitionedWriter,
}

impl<R: Rng> Scenario<R> {
    pub fn try_new(cfg: Config, rng: R) -> Result<Self> {
        let window = cfg.validate()?;

        Ok(Self {
            rng,
            pools: IdPools::new()?,
            window,
            counts: cfg.counts,
            batch_size: cfg.batch_size,
            schema: create_schema(),
            writer: PartitionedWriter::new(cfg.output_location, cfg.partition_key),
        })
    }

    pub fn run(&mut self) -> Result<RunStats> {
        let started = Instant::now();
        let mut modes = WriteModes::new();
        let mut stats = RunStats::default();

        for typ in all::<EventType>() {
            let total = self.counts.get(typ);
            for (batch_num, size) in batch_sizes(total, self.batch_size).enumerate() {
                info!(
                    "generating {typ} events batch {}: {size} events",
                    batch_num + 1
                );
                let events =
                    generator::generate(typ, size, &self.window, &self.pools, &mut self.rng);

                let mut builder = RecordBatchBuilder::new(size, self.schema.clone());
                for event in &events {
                    builder.write_event(event)?;
                }
                let batch = builder.build_record_batch()?;

                let mode = modes.next_mode();
                info!("saving batch {} with mode {mode}...", batch_num + 1);
                let written = self.writer.write(&batch, mode)?;
                debug!(
                    "batch written: {} file(s), {}",
                    written.files,
                    ByteSize::b(written.bytes)
                );

                stats.batches += 1;
                stats.files += written.files;
                stats.bytes += written.bytes;
                *stats.rows.entry(typ.category()).or_default() += batch.num_rows();
            }
        }

        stats.elapsed = started.elapsed();
        info!(
            "generated {} events in {}",
            stats.total_rows(),
            humantime::format_duration(stats.elapsed)
        );

        Ok(stats)
    }
}
