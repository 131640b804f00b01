use std::path::Path;
use std::path::PathBuf;

use chrono::DateTime;
use chrono::Utc;
use clap::ValueEnum;
use dateparser::DateTimeUtc;
use events_gen::scenario::EventCounts;
use events_gen::scenario::DEFAULT_BATCH_SIZE;
use events_gen::schema::COLUMN_EVENT_CATEGORY;
use serde_derive::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing::Level;

pub const ENV_PREFIX: &str = "EVENTS_GEN";

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct Events {
    pub product_view: usize,
    pub order: usize,
    pub account: usize,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct Time {
    /// window length ending at `to_date`, e.g. "30 days"
    pub duration: String,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct Output {
    pub path: PathBuf,
    pub partition_by: String,
    pub batch_size: usize,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct Log {
    pub level: LogLevel,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub events: Events,
    pub time: Time,
    pub output: Output,
    pub log: Log,
}

impl Config {
    /// Built-in defaults, then the optional file, then `EVENTS_GEN__*` env variables.
    pub fn load(path: Option<&Path>) -> crate::error::Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("events.product_view", 5_000_000_i64)?
            .set_default("events.order", 1_000_000_i64)?
            .set_default("events.account", 1_000_000_i64)?
            .set_default("time.duration", "30 days")?
            .set_default("output.path", "./output/events")?
            .set_default("output.partition_by", COLUMN_EVENT_CATEGORY)?
            .set_default("output.batch_size", DEFAULT_BATCH_SIZE as i64)?
            .set_default("log.level", "info")?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        Ok(builder.build()?.try_deserialize()?)
    }
}

fn parse_duration(s: &str) -> crate::error::Result<chrono::Duration> {
    Ok(chrono::Duration::from_std(parse_duration::parse(s)?)?)
}

fn parse_date(s: &str) -> crate::error::Result<DateTime<Utc>> {
    Ok(s.parse::<DateTimeUtc>()?.0.with_timezone(&Utc))
}

impl Time {
    pub fn window(&self, now: DateTime<Utc>) -> crate::error::Result<(DateTime<Utc>, DateTime<Utc>)> {
        let to = match &self.to_date {
            None => now,
            Some(dt) => parse_date(dt)?,
        };
        let from = match &self.from_date {
            None => to - parse_duration(self.duration.as_str())?,
            Some(dt) => parse_date(dt)?,
        };

        Ok((from, to))
    }
}

impl TryInto<events_gen::scenario::Config> for Config {
    type Error = crate::error::Error;

    fn try_into(self) -> Result<events_gen::scenario::Config, Self::Error> {
        let (start_date, end_date) = self.time.window(Utc::now())?;

        Ok(events_gen::scenario::Config {
            counts: EventCounts {
                product_view: self.events.product_view,
                order: self.events.order,
                account: self.events.account,
            },
            start_date,
            end_date,
            output_location: self.output.path,
            partition_key: self.output.partition_by,
            batch_size: self.output.batch_size,
        })
    }
}

#[derive(Deserialize, Copy, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum LogLevel {
    #[serde(rename = "trace")]
    Trace,
    #[serde(rename = "debug")]
    Debug,
    #[serde(rename = "info")]
    Info,
    #[serde(rename = "warn")]
    Warn,
    #[serde(rename = "error")]
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
        .into()
    }
}
