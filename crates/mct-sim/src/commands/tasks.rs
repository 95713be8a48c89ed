use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use mct_batch::read_task_batch;
use mct_core::stable_hash_string;
use mct_task::{SessionPolicy, TaskSession, TaskSpec};
use serde::Serialize;

use super::{parse_delimiter, print_json};

#[derive(Args, Debug)]
pub struct TasksArgs {
    /// Delimited batch file, one task per line.
    #[arg(long = "in")]
    pub input: PathBuf,
    /// Field delimiter of the batch file.
    #[arg(long, default_value = ",", value_parser = parse_delimiter)]
    pub delimiter: u8,
}

#[derive(Debug, Serialize)]
struct TaskSummary {
    index: usize,
    name: String,
    task: TaskSpec,
    task_hash: String,
    f_min: f64,
    f_max: f64,
}

pub fn run(args: &TasksArgs, policy: &SessionPolicy) -> Result<(), Box<dyn Error>> {
    let records = read_task_batch(&args.input, Some(args.delimiter))?;
    let mut summaries = Vec::with_capacity(records.len());
    for record in &records {
        let task = record.build(&policy.defaults)?;
        let session = TaskSession::with_policy(task, *policy);
        let spec = session.task().spec();
        summaries.push(TaskSummary {
            index: record.index,
            name: record.name.clone(),
            task_hash: stable_hash_string(&spec)?,
            task: spec,
            f_min: session.f_min(),
            f_max: session.f_max(),
        });
    }
    print_json(&summaries)
}
