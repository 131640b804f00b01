use std::sync::Arc;

use arrow::datatypes::DataType;
use arrow::datatypes::Field;
use arrow::datatypes::Schema;
use arrow::datatypes::SchemaRef;
use arrow::datatypes::TimeUnit;

pub const COLUMN_EVENT_NAME: &str = "event_name";
pub const COLUMN_EVENT_TIMESTAMP: &str = "event_timestamp";
pub const COLUMN_EVENT_CATEGORY: &str = "event_category";
pub const COLUMN_EVENT_VALUE: &str = "event_value";
pub const COLUMN_ENTITY_ID: &str = "entity_id";

/// UTC as a fixed offset, which arrow formats without a timezone database.
pub const TIMEZONE: &str = "+00:00";

pub fn timestamp_type() -> DataType {
    DataType::Timestamp(TimeUnit::Microsecond, Some(TIMEZONE.into()))
}

/// Output schema shared by every partition file.
pub fn create_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new(COLUMN_EVENT_NAME, DataType::Utf8, false),
        Field::new(COLUMN_EVENT_TIMESTAMP, timestamp_type(), false),
        Field::new(COLUMN_EVENT_CATEGORY, DataType::Utf8, false),
        Field::new(COLUMN_EVENT_VALUE, DataType::Utf8, false),
        Field::new(COLUMN_ENTITY_ID, DataType::Utf8, false),
    ]))
}
