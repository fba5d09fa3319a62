//! Record normalization
//!
//! Pure post-processing of extracted rows. Nothing in this module performs
//! I/O: it strips null placeholders from child collections, coerces sentinel
//! flag strings to booleans, and joins child rows to their parents by key.

pub mod hierarchy;
pub mod incident;

pub use hierarchy::{collect_child_values, group_by_key, join_key, nest_children};
pub use incident::{
    attach_survivors, coerce_flag, normalize_entity_row, normalize_incident, normalize_incidents,
    strip_null_placeholders,
};
