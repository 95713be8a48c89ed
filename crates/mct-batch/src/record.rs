use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder, StringRecord, Trim};
use mct_core::errors::{ErrorInfo, MctError};
use mct_core::Interval;
use mct_task::{Task, TaskDefaults};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Field separator used when the caller does not choose one.
pub const DEFAULT_DELIMITER: u8 = b',';

/// Expected record layout, attached to every malformed-record error.
pub const FORMAT_HINT: &str = "records must read \"name,function,start,end[,min_points[,target_error[,confidence]]]\" \
     using the chosen delimiter; omitted trailing fields take the configured defaults";

const MIN_FIELDS: usize = 4;
const MAX_FIELDS: usize = 7;

/// One row of a batch file, before task construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// 1-based position in the batch.
    pub index: usize,
    /// Display name (usually the learner's).
    pub name: String,
    /// Function expression.
    pub expression: String,
    /// Integration interval.
    pub interval: Interval,
    /// Minimum classified points, if given.
    pub min_points: Option<usize>,
    /// Error bound, if given.
    pub target_error: Option<f64>,
    /// Confidence level, if given.
    pub confidence: Option<f64>,
    /// Fields joined back with the delimiter, for error reports.
    pub raw: String,
}

impl TaskRecord {
    /// Builds the task, filling omitted parameters from `defaults`.
    ///
    /// Construction failures are reported with the record index and raw text.
    pub fn build(&self, defaults: &TaskDefaults) -> Result<Task, MctError> {
        Task::new(
            &self.expression,
            self.interval,
            self.min_points.unwrap_or(defaults.min_points),
            self.target_error.unwrap_or(defaults.target_error),
            self.confidence.unwrap_or(defaults.confidence),
        )
        .map_err(|err| record_error("batch_task", self.index, &self.raw, &err.to_string()))
    }
}

/// A named task ready for a session.
#[derive(Debug, Clone)]
pub struct BatchTask {
    /// Display name from the record.
    pub name: String,
    /// Constructed task.
    pub task: Task,
}

/// Parses batch records from `reader`.
///
/// Blank lines are skipped; each field is trimmed.
pub fn parse_task_batch<R: Read>(reader: R, delimiter: u8) -> Result<Vec<TaskRecord>, MctError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .delimiter(delimiter)
        .from_reader(reader);
    let mut records = Vec::new();
    let mut record = ByteRecord::new();
    loop {
        let index = records.len() + 1;
        match reader.read_byte_record(&mut record) {
            Ok(true) => records.push(parse_record(index, &record, delimiter)?),
            Ok(false) => break,
            Err(err) => {
                let index = err
                    .position()
                    .map(|pos| pos.record() as usize + 1)
                    .unwrap_or(index);
                return Err(record_error("batch_read", index, "", &err.to_string()));
            }
        }
    }
    debug!(records = records.len(), "task batch parsed");
    Ok(records)
}

/// Reads batch records from a file. `None` selects [`DEFAULT_DELIMITER`].
pub fn read_task_batch<P: AsRef<Path>>(
    path: P,
    delimiter: Option<u8>,
) -> Result<Vec<TaskRecord>, MctError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| MctError::io("batch_open", path, err))?;
    let records = parse_task_batch(file, delimiter.unwrap_or(DEFAULT_DELIMITER)).map_err(
        |err| match err {
            MctError::Batch(info) => {
                MctError::Batch(info.with_context("path", path.display().to_string()))
            }
            other => other,
        },
    )?;
    info!(path = %path.display(), records = records.len(), "task batch loaded");
    Ok(records)
}

/// Builds every record, stopping at the first that fails.
pub fn build_task_batch(
    records: &[TaskRecord],
    defaults: &TaskDefaults,
) -> Result<Vec<BatchTask>, MctError> {
    records
        .iter()
        .map(|record| {
            Ok(BatchTask {
                name: record.name.clone(),
                task: record.build(defaults)?,
            })
        })
        .collect()
}

/// Reads and builds a whole batch file.
pub fn load_task_batch<P: AsRef<Path>>(
    path: P,
    delimiter: Option<u8>,
    defaults: &TaskDefaults,
) -> Result<Vec<BatchTask>, MctError> {
    let records = read_task_batch(path, delimiter)?;
    build_task_batch(&records, defaults)
}

fn parse_record(index: usize, bytes: &ByteRecord, delimiter: u8) -> Result<TaskRecord, MctError> {
    let separator = char::from(delimiter).to_string();
    let raw = bytes
        .iter()
        .map(String::from_utf8_lossy)
        .collect::<Vec<_>>()
        .join(separator.as_str());
    let fail = |reason: String| record_error("batch_record", index, &raw, &reason);

    let record = StringRecord::from_byte_record(bytes.clone()).map_err(|err| {
        fail(format!(
            "field {} is not valid UTF-8",
            err.utf8_error().field() + 1
        ))
    })?;

    if !(MIN_FIELDS..=MAX_FIELDS).contains(&record.len()) {
        return Err(fail(format!(
            "expected {MIN_FIELDS} to {MAX_FIELDS} fields, found {}",
            record.len()
        )));
    }
    let field = |i: usize| record.get(i).unwrap_or("");
    let optional = |i: usize| Some(field(i)).filter(|value| !value.is_empty());

    let name = field(0).to_string();
    let expression = field(1).to_string();
    if expression.is_empty() {
        return Err(fail("function expression is empty".to_string()));
    }
    let start = parse_number::<f64>(field(2), "start").map_err(&fail)?;
    let end = parse_number::<f64>(field(3), "end").map_err(&fail)?;
    let min_points = optional(4)
        .map(|value| parse_number::<usize>(value, "min_points"))
        .transpose()
        .map_err(&fail)?;
    let target_error = optional(5)
        .map(|value| parse_number::<f64>(value, "target_error"))
        .transpose()
        .map_err(&fail)?;
    let confidence = optional(6)
        .map(|value| parse_number::<f64>(value, "confidence"))
        .transpose()
        .map_err(&fail)?;

    Ok(TaskRecord {
        index,
        name,
        expression,
        interval: Interval::new(start, end),
        min_points,
        target_error,
        confidence,
        raw,
    })
}

fn parse_number<T: std::str::FromStr>(value: &str, field: &str) -> Result<T, String> {
    value
        .parse::<T>()
        .map_err(|_| format!("{field} \"{value}\" is not a valid number"))
}

fn record_error(code: &str, index: usize, raw: &str, reason: &str) -> MctError {
    MctError::Batch(
        ErrorInfo::new(code, format!("malformed task record {index}: \"{raw}\": {reason}"))
            .with_context("record", index.to_string())
            .with_context("raw", raw)
            .with_hint(FORMAT_HINT),
    )
}
