//! Orthodox liturgical calendar types and engine.
//!
//! The engine is a set of pure functions over a [`LiturgicalData`] table:
//! given a Gregorian date it resolves the applicable feasts, the fasting
//! level, the liturgical season, and the choir tone. Nothing in this
//! module touches application state or does I/O.

pub mod data;
pub mod engine;

pub use data::{FixedFeast, LiturgicalData, PaschalYear};
pub use engine::{
    choir_tone, events_for_date, fasting_level, is_sunday, julian_date, liturgical_season,
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Rank of a feast, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeastLevel {
    Great,
    Major,
    Minor,
    Regular,
}

/// Fasting discipline for a given date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FastingLevel {
    None,
    Regular,
    Strict,
    Lent,
}

/// A feast or observance resolved for a concrete date.
///
/// Derived on demand from the data table and never persisted. Several
/// events may apply to the same date (fixed + moveable union).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrthodoxEvent {
    pub name: String,
    /// Plain-English label where the traditional title is not obvious.
    pub name_en: Option<String>,
    /// Resolved for the query year.
    pub date: NaiveDate,
    pub moveable: bool,
    pub liturgy_required: bool,
    pub level: FeastLevel,
    pub fasting: Option<FastingLevel>,
}

/// Liturgical season of the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    BrightWeek,
    Paschal,
    NativityFast,
    Nativity,
    /// 1-indexed week within Great Lent.
    GreatLent { week: u32 },
    ApostlesFast,
    DormitionFast,
    Ordinary,
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Season::BrightWeek => write!(f, "Bright Week"),
            Season::Paschal => write!(f, "Paschal Season"),
            Season::NativityFast => write!(f, "Nativity Fast"),
            Season::Nativity => write!(f, "Nativity Season"),
            Season::GreatLent { week } => write!(f, "Great Lent, Week {week}"),
            Season::ApostlesFast => write!(f, "Apostles' Fast"),
            Season::DormitionFast => write!(f, "Dormition Fast"),
            Season::Ordinary => write!(f, "Ordinary Time"),
        }
    }
}
