use std::collections::BTreeMap;
use std::fs;
use std::fs::File;
use std::path::Path;
use std::path::PathBuf;

use arrow::array::AsArray;
use arrow::array::UInt32Array;
use arrow::compute::take_record_batch;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use strum_macros::Display;
use tracing::debug;
use uuid::Uuid;

use crate::error::EventsGenError;
use crate::error::Result;

/// Directory used for rows whose partition value is null.
pub const DEFAULT_PARTITION: &str = "__HIVE_DEFAULT_PARTITION__";
pub const SUCCESS_MARKER: &str = "_SUCCESS";
const PARQUET_EXTENSION: &str = "parquet";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum WriteMode {
    /// Replace everything under the output root.
    Overwrite,
    /// Add new files next to the existing ones.
    Append,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteStats {
    /// rows written per partition value
    pub rows: BTreeMap<String, usize>,
    pub files: usize,
    pub bytes: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartitionStats {
    pub files: usize,
    pub rows: usize,
}

/// Persists record batches as parquet files grouped into `<key>=<value>`
/// directories under `root`.
pub struct PartitionedWriter {
    root: PathBuf,
    partition_key: String,
    props: WriterProperties,
    seq: usize,
}

impl PartitionedWriter {
    pub fn new(root: impl Into<PathBuf>, partition_key: impl Into<String>) -> Self {
        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .build();

        Self {
            root: root.into(),
            partition_key: partition_key.into(),
            props,
            seq: 0,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn partition_key(&self) -> &str {
        &self.partition_key
    }

    pub fn write(&mut self, batch: &RecordBatch, mode: WriteMode) -> Result<WriteStats> {
        match mode {
            WriteMode::Overwrite => {
                if self.root.try_exists()? {
                    debug!("removing existing output {:?}", self.root);
                    fs::remove_dir_all(&self.root)?;
                }
            }
            WriteMode::Append => {}
        }
        fs::create_dir_all(&self.root)?;

        let idx = batch.schema().index_of(&self.partition_key)?;
        let col = batch.column(idx).as_string_opt::<i32>().ok_or_else(|| {
            EventsGenError::Internal(format!(
                "partition column {} should be utf8",
                self.partition_key
            ))
        })?;

        let mut groups: BTreeMap<Option<&str>, Vec<u32>> = BTreeMap::new();
        for (row, value) in col.iter().enumerate() {
            let row = u32::try_from(row).map_err(|_| {
                EventsGenError::Internal(format!("batch row {row} exceeds u32 range"))
            })?;
            groups.entry(value).or_default().push(row);
        }

        let mut stats = WriteStats::default();
        for (value, rows) in groups {
            let dir = self.root.join(partition_dir_name(&self.partition_key, value)?);
            fs::create_dir_all(&dir)?;

            let part = take_record_batch(batch, &UInt32Array::from(rows))?;
            let path = dir.join(format!(
                "part-{:05}-{}.snappy.{PARQUET_EXTENSION}",
                self.seq,
                Uuid::new_v4()
            ));
            let mut writer = ArrowWriter::try_new(
                File::create(&path)?,
                batch.schema(),
                Some(self.props.clone()),
            )?;
            writer.write(&part)?;
            writer.close()?;

            stats.files += 1;
            stats.bytes += fs::metadata(&path)?.len();
            stats.rows.insert(
                value.unwrap_or(DEFAULT_PARTITION).to_string(),
                part.num_rows(),
            );
        }

        File::create(self.root.join(SUCCESS_MARKER))?;
        self.seq += 1;

        Ok(stats)
    }
}

fn partition_dir_name(key: &str, value: Option<&str>) -> Result<String> {
    let value = match value {
        None => DEFAULT_PARTITION,
        Some(v) if v.is_empty() || v == "." || v == ".." || v.contains(['/', '\\']) => {
            return Err(EventsGenError::Internal(format!(
                "invalid partition value {v:?}"
            )));
        }
        Some(v) => v,
    };

    Ok(format!("{key}={value}"))
}

fn partition_dirs(root: &Path, key: &str) -> Result<Vec<(String, PathBuf)>> {
    let prefix = format!("{key}=");
    let mut dirs = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if let Some(value) = name.strip_prefix(&prefix) {
            dirs.push((value.to_string(), entry.path()));
        }
    }
    dirs.sort();

    Ok(dirs)
}

fn parquet_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == PARQUET_EXTENSION) {
            files.push(path);
        }
    }
    files.sort();

    Ok(files)
}

/// Scans an output location and counts files and rows per partition value.
pub fn read_partition_stats(root: &Path, key: &str) -> Result<BTreeMap<String, PartitionStats>> {
    let mut res = BTreeMap::new();
    for (value, dir) in partition_dirs(root, key)? {
        let mut stats = PartitionStats::default();
        for path in parquet_files(&dir)? {
            let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(&path)?)?;
            stats.rows += builder.metadata().file_metadata().num_rows() as usize;
            stats.files += 1;
        }
        res.insert(value, stats);
    }

    Ok(res)
}

/// Reads every row of one partition.
pub fn read_partition(root: &Path, key: &str, value: &str) -> Result<Vec<RecordBatch>> {
    let dir = root.join(partition_dir_name(key, Some(value))?);
    let mut batches = Vec::new();
    for path in parquet_files(&dir)? {
        let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(&path)?)?.build()?;
        for batch in reader {
            batches.push(batch?);
        }
    }

    Ok(batches)
}

#[cfg(test)]
mod tests {
    use std::env::temp_dir;
    use std::sync::Arc;

    use arrow::array::ArrayRef;
    use arrow::array::Int64Array;
    use arrow::array::StringArray;

    use super::*;

    fn batch(categories: Vec<Option<&str>>) -> RecordBatch {
        let ids = Int64Array::from((0..categories.len() as i64).collect::<Vec<_>>());
        RecordBatch::try_from_iter(vec![
            ("id", Arc::new(ids) as ArrayRef),
            ("cat", Arc::new(StringArray::from(categories)) as ArrayRef),
        ])
        .unwrap()
    }

    #[test]
    fn test_overwrite_then_append() -> Result<()> {
        let root = temp_dir().join(format!("{}", Uuid::new_v4()));
        fs::create_dir_all(root.join("stale"))?;
        fs::write(root.join("stale").join("file"), b"old")?;

        let mut w = PartitionedWriter::new(&root, "cat");
        let stats = w.write(&batch(vec![Some("a"), Some("b"), Some("a")]), WriteMode::Overwrite)?;
        assert_eq!(stats.files, 2);
        assert_eq!(stats.rows["a"], 2);
        assert_eq!(stats.rows["b"], 1);
        assert!(!root.join("stale").exists());
        assert!(root.join(SUCCESS_MARKER).exists());

        w.write(&batch(vec![Some("c"), Some("a")]), WriteMode::Append)?;
        let parts = read_partition_stats(&root, "cat")?;
        assert_eq!(parts.len(), 3);
        assert_eq!(parts["a"], PartitionStats { files: 2, rows: 3 });
        assert_eq!(parts["b"], PartitionStats { files: 1, rows: 1 });
        assert_eq!(parts["c"], PartitionStats { files: 1, rows: 1 });

        let rows: usize = read_partition(&root, "cat", "a")?
            .iter()
            .map(|b| b.num_rows())
            .sum();
        assert_eq!(rows, 3);

        w.write(&batch(vec![Some("d")]), WriteMode::Overwrite)?;
        let parts = read_partition_stats(&root, "cat")?;
        assert_eq!(parts.keys().collect::<Vec<_>>(), vec!["d"]);

        fs::remove_dir_all(&root)?;
        Ok(())
    }

    #[test]
    fn test_null_and_invalid_partitions() -> Result<()> {
        let root = temp_dir().join(format!("{}", Uuid::new_v4()));
        let mut w = PartitionedWriter::new(&root, "cat");
        let stats = w.write(&batch(vec![None, Some("x")]), WriteMode::Overwrite)?;
        assert_eq!(stats.rows[DEFAULT_PARTITION], 1);
        assert!(root.join(format!("cat={DEFAULT_PARTITION}")).is_dir());

        assert!(w.write(&batch(vec![Some("../x")]), WriteMode::Append).is_err());
        assert!(w.write(&batch(vec![Some("")]), WriteMode::Append).is_err());

        let mut w = PartitionedWriter::new(&root, "missing");
        assert!(w.write(&batch(vec![Some("x")]), WriteMode::Append).is_err());
        let mut w = PartitionedWriter::new(&root, "id");
        assert!(w.write(&batch(vec![Some("x")]), WriteMode::Append).is_err());

        fs::remove_dir_all(&root)?;
        Ok(())
    }
}
