#![deny(missing_docs)]
#![doc = "Delimited-text batch import of trainer tasks."]

/// Record parsing and batch loading.
pub mod record;

pub use record::{
    build_task_batch, load_task_batch, parse_task_batch, read_task_batch, BatchTask, TaskRecord,
    DEFAULT_DELIMITER, FORMAT_HINT,
};
