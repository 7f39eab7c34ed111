use std::{fmt, path::Path, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{Result, SortVizError};

const DEFAULT_COLUMNS: usize = 70;
const DEFAULT_DELAY_MS: u64 = 10;

/// The closed set of sorting algorithms the engine can animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Algorithm {
    #[default]
    BubbleSort,
    QuickSort,
    MergeSort,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [
        Algorithm::BubbleSort,
        Algorithm::QuickSort,
        Algorithm::MergeSort,
    ];

    /// Stable identifier used in config files and on the command line.
    pub fn key(self) -> &'static str {
        match self {
            Algorithm::BubbleSort => "bubbleSort",
            Algorithm::QuickSort => "quickSort",
            Algorithm::MergeSort => "mergeSort",
        }
    }

    /// Human readable name.
    pub fn display_name(self) -> &'static str {
        match self {
            Algorithm::BubbleSort => "Bubble Sort",
            Algorithm::QuickSort => "Quick Sort",
            Algorithm::MergeSort => "Merge Sort",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Algorithm {
    type Err = SortVizError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bubblesort" | "bubble" => Ok(Algorithm::BubbleSort),
            "quicksort" | "quick" => Ok(Algorithm::QuickSort),
            "mergesort" | "merge" => Ok(Algorithm::MergeSort),
            other => Err(SortVizError::msg(format!("unknown sort algorithm `{other}`"))),
        }
    }
}

/// Settings captured by value when a run starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SortConfig {
    pub algorithm: Algorithm,
    /// When `false` the delay is ignored and steps only yield.
    pub paced: bool,
    pub delay_ms: u64,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            paced: true,
            delay_ms: DEFAULT_DELAY_MS,
        }
    }
}

impl SortConfig {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            ..Self::default()
        }
    }

    pub fn unpaced(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            paced: false,
            ..Self::default()
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub sort: SortConfig,
    /// Number of bars; the initial values are `1..=columns`.
    pub columns: usize,
    /// Seed for reproducible shuffles.
    pub seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sort: SortConfig::default(),
            columns: DEFAULT_COLUMNS,
            seed: None,
        }
    }
}

impl AppConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// The unshuffled column heights, `1..=columns`.
    pub fn initial_values(&self) -> Vec<f64> {
        (1..=self.columns).map(|v| v as f64).collect()
    }
}

/// Parses a comma or whitespace separated list of numbers.
pub fn parse_values(input: &str) -> Result<Vec<f64>> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .enumerate()
        .map(|(index, token)| {
            token.parse::<f64>().map_err(|_| {
                SortVizError::invalid_input(format!(
                    "element {index} (`{token}`) is not numeric"
                ))
            })
        })
        .collect()
}
