use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use mct_batch::read_task_batch;
use mct_core::RngHandle;
use mct_task::laplace::statistical_error;
use mct_task::{required_points, SessionPolicy, SessionReport, TaskSession};
use serde::Serialize;
use tracing::info;

use super::{parse_delimiter, print_json};

#[derive(Args, Debug)]
pub struct PlayArgs {
    /// Delimited batch file, one task per line.
    #[arg(long = "in")]
    pub input: PathBuf,
    /// Field delimiter of the batch file.
    #[arg(long, default_value = ",", value_parser = parse_delimiter)]
    pub delimiter: u8,
    /// 1-based record to play.
    #[arg(long, default_value_t = 1)]
    pub index: usize,
    /// Master seed; each record draws from its own substream.
    #[arg(long, default_value_t = 2024)]
    pub seed: u64,
    /// Points to classify (defaults to the task minimum).
    #[arg(long)]
    pub points: Option<usize>,
    /// Deliberately wrong classifications to submit before correcting them.
    #[arg(long, default_value_t = 0)]
    pub mistakes: usize,
}

#[derive(Debug, Serialize)]
struct PlayOutput {
    name: String,
    seed: u64,
    report: SessionReport,
    feedback: Feedback,
}

#[derive(Debug, Serialize)]
struct Feedback {
    statistical_error: f64,
    required_points: Option<usize>,
}

pub fn run(args: &PlayArgs, policy: &SessionPolicy) -> Result<(), Box<dyn Error>> {
    let records = read_task_batch(&args.input, Some(args.delimiter))?;
    let record = records
        .iter()
        .find(|record| record.index == args.index)
        .ok_or_else(|| {
            format!(
                "record {} not found; the batch holds {} records",
                args.index,
                records.len()
            )
        })?;
    let task = record.build(&policy.defaults)?;
    let points = args.points.unwrap_or(task.min_points());
    let mut session = TaskSession::with_policy(task.clone(), *policy);

    session.start()?;
    session.set_int_x(task.interval())?;
    session.set_int_y((session.f_min(), session.f_max()))?;
    session.next_step()?;

    let rect = session
        .state()
        .rectangle()
        .ok_or("rectangle missing after the rectangle step")?;
    let mut rng = RngHandle::substream(args.seed, args.index as u64);
    let mut mistakes = args.mistakes;
    for _ in 0..points {
        let point = rng.point_in(&rect);
        session.generate_point(point)?;
        let hit = point.y <= task.f(point.x);
        if mistakes > 0 {
            mistakes -= 1;
            if session.count_point(!hit).is_ok() {
                return Err(format!("wrong classification of {point} was accepted").into());
            }
        }
        session.count_point(hit)?;
    }
    session.next_step()?;

    let inputs = session
        .state()
        .integral_inputs()
        .ok_or("rectangle missing after the point step")?;
    session.set_result(inputs.estimate())?;
    session.next_step()?;
    info!(
        name = %record.name,
        estimate = inputs.estimate(),
        errors = session.stats().error_count(),
        "scripted session finished"
    );

    let feedback = Feedback {
        statistical_error: statistical_error(
            task.confidence(),
            inputs.area,
            inputs.hit_ratio(),
            inputs.total,
        ),
        required_points: required_points(
            task.confidence(),
            task.target_error(),
            inputs.area,
            inputs.hit_ratio(),
        ),
    };
    print_json(&PlayOutput {
        name: record.name.clone(),
        seed: args.seed,
        report: session.report()?,
        feedback,
    })
}
