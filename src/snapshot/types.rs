use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::marksheet::{Marksheet, RawTable};

pub const SNAPSHOT_VERSION: u32 = 1;

/// A computed marksheet saved together with the inputs that produced it.
///
/// Keeping the raw table and config makes a snapshot reproducible: running
/// the engine again over `table` with `config` yields the same `marksheet`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub config: Config,
    pub table: RawTable,
    pub marksheet: Marksheet,
}

impl Snapshot {
    pub fn new(config: Config, table: RawTable, marksheet: Marksheet) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            config,
            table,
            marksheet,
        }
    }
}
