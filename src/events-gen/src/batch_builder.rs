use std::sync::Arc;

use arrow::array::ArrayRef;
use arrow::array::StringBuilder;
use arrow::array::TimestampMicrosecondBuilder;
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;

use crate::error::Result;
use crate::generator::Event;
use crate::schema::TIMEZONE;

pub struct RecordBatchBuilder {
    event_name: StringBuilder,
    event_timestamp: TimestampMicrosecondBuilder,
    event_category: StringBuilder,
    event_value: StringBuilder,
    entity_id: StringBuilder,
    schema: SchemaRef,
    len: usize,
}

impl RecordBatchBuilder {
    pub fn new(cap: usize, schema: SchemaRef) -> Self {
        Self {
            event_name: StringBuilder::with_capacity(cap, cap * 16),
            event_timestamp: TimestampMicrosecondBuilder::with_capacity(cap),
            event_category: StringBuilder::with_capacity(cap, cap * 8),
            event_value: StringBuilder::with_capacity(cap, cap * 128),
            entity_id: StringBuilder::with_capacity(cap, cap * 64),
            schema,
            len: 0,
        }
    }

    pub fn build_record_batch(&mut self) -> Result<RecordBatch> {
        let cols: Vec<ArrayRef> = vec![
            Arc::new(self.event_name.finish()),
            Arc::new(self.event_timestamp.finish().with_timezone(TIMEZONE)),
            Arc::new(self.event_category.finish()),
            Arc::new(self.event_value.finish()),
            Arc::new(self.entity_id.finish()),
        ];

        let batch = RecordBatch::try_new(self.schema.clone(), cols)?;

        self.len = 0;
        Ok(batch)
    }

    pub fn write_event(&mut self, event: &Event) -> Result<()> {
        self.event_name.append_value(event.name.to_string());
        self.event_timestamp.append_value(event.timestamp);
        self.event_category
            .append_value(event.category().to_string());
        self.event_value
            .append_value(serde_json::to_string(&event.value)?);
        self.entity_id.append_value(&event.entity_id);

        self.len += 1;

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
