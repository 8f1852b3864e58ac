//! Loosely typed cell values.
//!
//! Spreadsheet cells arrive as strings, integers, floats, or nothing at all.
//! [`Cell`] keeps that distinction explicit so normalizers dispatch on the
//! variant instead of relying on implicit coercion.

use serde::{Deserialize, Serialize};

/// A single cell read from an input table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Cell {
    /// No value (absent column, empty spreadsheet cell).
    #[default]
    Missing,
    /// Numeric value (integers are widened to `f64`).
    Number(f64),
    /// Textual value, untrimmed.
    Text(String),
}

impl Cell {
    /// Build a text cell.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Whether the cell holds no value.
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Render the cell as a string.
    ///
    /// Numbers use the shortest round-trip form (`3`, `0.8`). Returns `None`
    /// for [`Cell::Missing`]. Text is returned as-is (not trimmed).
    pub fn render(&self) -> Option<String> {
        match self {
            Self::Missing => None,
            Self::Number(n) => Some(n.to_string()),
            Self::Text(s) => Some(s.clone()),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for Cell {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Into::into)
    }
}
