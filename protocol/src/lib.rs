//! Messages exchanged with a background board generation.
//!
//! A run receives one [`GenerateRequest`], answers with any number of
//! [`GeneratorMessage::Percent`] updates and finishes with a single
//! [`GeneratorMessage::Result`] carrying the encoded tile buffer, row-major.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub rows: u32,
    pub cols: u32,
    pub mines: usize,
}

impl GenerateRequest {
    pub const fn new(rows: u32, cols: u32, mines: usize) -> Self {
        Self { rows, cols, mines }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum GeneratorMessage {
    /// Share of the generation done so far, `0.0..=100.0`.
    Percent(f32),
    /// The finished board, terminal for the run.
    Result(Vec<u8>),
}

impl GeneratorMessage {
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Result(_))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
