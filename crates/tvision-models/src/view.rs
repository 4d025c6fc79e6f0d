//! Top-level view state.

use serde::{Deserialize, Serialize};

/// Which top-level screen is active.
///
/// This gates the whole board, not any single product; per-product
/// lifecycle lives in [`crate::GenerationStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ViewState {
    /// Landing screen, nothing discovered yet
    #[default]
    Idle,
    /// A discovery call is in flight
    Searching,
    /// Discovery resolved and the board is populated
    ProductsFound,
}

impl ViewState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewState::Idle => "idle",
            ViewState::Searching => "searching",
            ViewState::ProductsFound => "products_found",
        }
    }
}

impl std::fmt::Display for ViewState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
