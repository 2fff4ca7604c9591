//! Render output shared by the list screens.

use serde::Serialize;

/// Result of rendering a (filtered, sorted) list.
///
/// An empty list is an explicit state with its own message, never an empty
/// table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TableView<R> {
    Empty { message: String },
    Rows { rows: Vec<R> },
}

impl<R> TableView<R> {
    pub fn from_rows(rows: Vec<R>, empty_message: &str) -> Self {
        if rows.is_empty() {
            Self::Empty {
                message: empty_message.to_string(),
            }
        } else {
            Self::Rows { rows }
        }
    }

    pub fn rows(&self) -> &[R] {
        match self {
            Self::Empty { .. } => &[],
            Self::Rows { rows } => rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }
}
