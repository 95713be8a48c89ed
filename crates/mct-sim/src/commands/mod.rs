use std::error::Error;
use std::path::Path;

use mct_core::serde::to_canonical_json_pretty;
use mct_task::{load_policy, SessionPolicy};
use serde::Serialize;
use tracing::info;

pub mod laplace;
pub mod play;
pub mod tasks;
pub mod version;

pub fn load_policy_or_default(path: Option<&Path>) -> Result<SessionPolicy, Box<dyn Error>> {
    match path {
        Some(path) => {
            let policy = load_policy(path)?;
            info!(path = %path.display(), "session policy loaded");
            Ok(policy)
        }
        None => Ok(SessionPolicy::default()),
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", to_canonical_json_pretty(value)?);
    Ok(())
}

/// Parses a single-byte field delimiter; `\t` and `tab` name the tab character.
pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "\\t" | "tab" => Ok(b'\t'),
        _ => match value.as_bytes() {
            [byte] if byte.is_ascii() => Ok(*byte),
            _ => Err(format!("delimiter must be a single ASCII character, got {value:?}")),
        },
    }
}
