//! Output format value object

use serde::{Deserialize, Serialize};

/// Output format for simulation reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Every step, the itinerary and all tallies
    #[default]
    Full,
    /// Only the final itinerary
    Itinerary,
    /// JSON output
    Json,
}
