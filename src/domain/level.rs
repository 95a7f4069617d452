use serde::{Deserialize, Serialize};
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum LevelKind {
    Support,
    Resistance,
}

/// A price the market has reacted at, inferred from local extrema.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: f64,
    pub kind: LevelKind,
}

impl PriceLevel {
    pub fn new(price: f64, kind: LevelKind) -> Self {
        Self { price, kind }
    }
}
