use serde::{Deserialize, Serialize};

use super::Difficulty;

/// Descriptive fields of a chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartMetadata {
    pub title: String,
    pub subtitle: String,
    pub artist: String,
    pub genre: String,
    pub credit: String,
    /// `#BANNER` file, as written in the chart
    pub banner: String,
    /// `#STAGEFILE` file, as written in the chart
    pub background: String,
    pub difficulty: Difficulty,
}

impl Default for ChartMetadata {
    fn default() -> Self {
        Self {
            title: "Unknown".to_string(),
            subtitle: String::new(),
            artist: "Unknown".to_string(),
            genre: String::new(),
            credit: String::new(),
            banner: String::new(),
            background: String::new(),
            difficulty: Difficulty::default(),
        }
    }
}
