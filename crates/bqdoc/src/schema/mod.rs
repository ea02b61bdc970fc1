//! Schema types for tables, columns and sampled JSON shapes.

mod column;
mod shape;
mod table;

pub use column::{ColumnSchema, JSON_FIELD_TYPE, JsonSample};
pub use shape::JsonShape;
pub use table::{TableRef, TableSchema};
