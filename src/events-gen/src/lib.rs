pub mod batch_builder;
pub mod error;
pub mod events;
pub mod generator;
pub mod ids;
pub mod scenario;
pub mod schema;
pub mod writer;
