use std::error::Error;

use clap::{Args, ValueEnum};
use mct_task::numeric::meaning_decimals;
use mct_task::LaplaceTable;
use serde::Serialize;

use super::print_json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

#[derive(Args, Debug)]
pub struct LaplaceArgs {
    /// Number of table rows.
    #[arg(long, default_value_t = 40)]
    pub rows: usize,
    /// Number of table columns.
    #[arg(long, default_value_t = 10)]
    pub cols: usize,
    /// Argument step between rows.
    #[arg(long, default_value_t = 0.1)]
    pub step_y: f64,
    /// Argument step between columns.
    #[arg(long, default_value_t = 0.01)]
    pub step_x: f64,
    /// Tabulate quantiles around this confidence level instead of printing the grid.
    #[arg(long)]
    pub around: Option<f64>,
    /// Relative spread of the tabulation around `--around`.
    #[arg(long, default_value_t = 0.1)]
    pub dev: f64,
    /// Number of tabulated levels.
    #[arg(short, default_value_t = 10)]
    pub n: usize,
    /// Output as an aligned text table or as JSON.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
}

#[derive(Debug, Serialize)]
struct Tabulation {
    confidence: f64,
    nearest_arguments: Vec<f64>,
    levels: Vec<Level>,
}

#[derive(Debug, Serialize)]
struct Level {
    confidence: f64,
    z: f64,
}

pub fn run(args: &LaplaceArgs) -> Result<(), Box<dyn Error>> {
    if args.rows == 0 || args.cols == 0 || !(args.step_y > 0.0 && args.step_x > 0.0) {
        return Err("table dimensions and steps must be positive".into());
    }
    let table = LaplaceTable {
        rows: args.rows,
        cols: args.cols,
        step_y: args.step_y,
        step_x: args.step_x,
    };
    match args.around {
        Some(confidence) => {
            if !(confidence > 0.0 && confidence < 1.0) {
                return Err(format!("confidence must lie in (0, 1), got {confidence}").into());
            }
            let tabulation = Tabulation {
                confidence,
                nearest_arguments: table.nearest_arguments(confidence / 2.0, 2),
                levels: LaplaceTable::tabulate_around(confidence, args.dev, args.n)
                    .into_iter()
                    .map(|(confidence, z)| Level { confidence, z })
                    .collect(),
            };
            match args.format {
                Format::Json => print_json(&tabulation),
                Format::Text => {
                    print_tabulation(&tabulation);
                    Ok(())
                }
            }
        }
        None => match args.format {
            Format::Json => print_json(&table.table()),
            Format::Text => {
                print_table(&table);
                Ok(())
            }
        },
    }
}

fn print_table(table: &LaplaceTable) {
    let row_decimals = meaning_decimals(table.step_y, 1) as usize;
    let col_decimals = meaning_decimals(table.step_x, 1) as usize;
    let header = table
        .col_arguments()
        .iter()
        .map(|dx| format!("{dx:>8.col_decimals$}"))
        .collect::<String>();
    println!("{:>6}{header}", "x");
    for row in table.table() {
        let values = row
            .values
            .iter()
            .map(|v| format!("{v:>8.4}"))
            .collect::<String>();
        println!("{:>6.row_decimals$}{values}", row.argument);
    }
}

fn print_tabulation(tabulation: &Tabulation) {
    println!("{:>12}{:>12}", "confidence", "z");
    for level in &tabulation.levels {
        println!("{:>12.4}{:>12.4}", level.confidence, level.z);
    }
    let nearest = tabulation
        .nearest_arguments
        .iter()
        .map(|x| x.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    println!("table arguments nearest {}: {nearest}", tabulation.confidence);
}
