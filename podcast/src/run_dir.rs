//! Allocation of the per-production output directory.
//!
//! Every artifact of one production lands in `{output_dir}/{run_id}/`, where
//! `run_id` is `{YYYYMMDD-HHMMSS}_{sanitized topic}`. The first tool that runs
//! in a production allocates the directory and records it in the session
//! state; every later tool reuses it verbatim.
//!
//! Two productions of the same topic started within the same second share a
//! directory.

use crate::error::Result;
use agent::State;
use chrono::{Local, NaiveDateTime};
use std::path::{Path, PathBuf};

pub const RUN_DIR_KEY: &str = "run_dir";
pub const RUN_ID_KEY: &str = "run_id";

const MAX_TOPIC_CHARS: usize = 30;
const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub dir: PathBuf,
    pub id: String,
}

impl Run {
    /// Path of the run's artifact with the given extension.
    pub fn artifact(&self, extension: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", self.id, extension))
    }
}

/// Replaces every non ASCII-alphanumeric character with `_` and keeps at
/// most 30 characters.
pub fn sanitize_topic(topic: &str) -> String {
    topic
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .take(MAX_TOPIC_CHARS)
        .collect()
}

pub fn run_id_at(timestamp: &NaiveDateTime, topic: &str) -> String {
    format!(
        "{}_{}",
        timestamp.format(TIMESTAMP_FORMAT),
        sanitize_topic(topic)
    )
}

/// Returns the run recorded in `state`, allocating one for `topic` if the
/// production has none yet.
pub fn ensure_run(state: &mut State, topic: &str, output_dir: &Path) -> Result<Run> {
    ensure_run_at(state, topic, output_dir, &Local::now().naive_local())
}

fn ensure_run_at(
    state: &mut State,
    topic: &str,
    output_dir: &Path,
    now: &NaiveDateTime,
) -> Result<Run> {
    if let (Some(dir), Some(id)) = (state.get(RUN_DIR_KEY), state.get(RUN_ID_KEY)) {
        return Ok(Run {
            dir: PathBuf::from(dir),
            id: id.to_string(),
        });
    }

    let id = run_id_at(now, topic);
    let dir = output_dir.join(&id);
    std::fs::create_dir_all(&dir)?;

    tracing::info!(run_dir = %dir.display(), "created run directory");

    state.set(RUN_DIR_KEY, dir.to_string_lossy());
    state.set(RUN_ID_KEY, id.clone());

    Ok(Run { dir, id })
}
