use serde::{Deserialize, Serialize};

use crate::marksheet::MarksheetConfig;

/// On-disk configuration file.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Engine configuration: subjects, combined groups, grading, exclusions, ranking.
    pub marksheet: MarksheetConfig,

    pub display: DisplayConfig,
}

/// Presentation-only settings; never affect computed totals or ranks.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Rescale the displayed Total column so the top student shows this value.
    pub rescale_total: Option<f64>,
}
