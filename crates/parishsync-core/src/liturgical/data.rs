//! Static liturgical data: fixed feasts, per-year Paschal anchors, and
//! fasting-period ranges.
//!
//! The table is an injectable, versioned value rather than module-level
//! constants so new years can be supplied without code changes. A year
//! missing from the table is a defined degraded case for the engine,
//! never an error: no moveable events, no Lent match, tone 1, generic
//! season.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{FastingLevel, FeastLevel};

/// A feast celebrated on the same month/day every year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedFeast {
    pub month: u32,
    pub day: u32,
    pub name: String,
    pub name_en: Option<String>,
    pub level: FeastLevel,
    /// Fasting attached to the day itself (e.g. the strict one-day fasts).
    pub fasting: Option<FastingLevel>,
}

/// Precomputed Paschal-cycle anchors and the Great Lent range for one year.
///
/// Pascha is never computed here; dates come from the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaschalYear {
    pub pascha: NaiveDate,
    pub palm_sunday: NaiveDate,
    pub ascension: NaiveDate,
    pub pentecost: NaiveDate,
    pub all_saints: NaiveDate,
    pub lent_start: NaiveDate,
    pub lent_end: NaiveDate,
}

/// The full liturgical data table consumed by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiturgicalData {
    /// Table schema version, bumped when entries change shape.
    pub version: u32,
    pub great_feasts: Vec<FixedFeast>,
    pub major_feasts: Vec<FixedFeast>,
    /// Full Paschal-cycle records, currently through 2028.
    pub years: BTreeMap<i32, PaschalYear>,
    /// Pascha dates alone reach further (through 2030) for tone and
    /// season resolution.
    pub pascha_dates: BTreeMap<i32, NaiveDate>,
}

impl Default for LiturgicalData {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LiturgicalData {
    /// The builtin table shipped with the crate.
    pub fn builtin() -> Self {
        Self {
            version: 1,
            great_feasts: builtin_great_feasts(),
            major_feasts: builtin_major_feasts(),
            years: builtin_paschal_years(),
            pascha_dates: builtin_pascha_dates(),
        }
    }

    /// Paschal-cycle record for a year, if the table covers it.
    pub fn paschal_year(&self, year: i32) -> Option<&PaschalYear> {
        self.years.get(&year)
    }

    /// Pascha date for a year, preferring the long-range table.
    pub fn pascha(&self, year: i32) -> Option<NaiveDate> {
        self.pascha_dates
            .get(&year)
            .copied()
            .or_else(|| self.years.get(&year).map(|y| y.pascha))
    }

    /// Inclusive Great Lent range for a year, if covered.
    pub fn lent_range(&self, year: i32) -> Option<(NaiveDate, NaiveDate)> {
        self.years.get(&year).map(|y| (y.lent_start, y.lent_end))
    }
}

fn feast(
    month: u32,
    day: u32,
    name: &str,
    name_en: Option<&str>,
    level: FeastLevel,
    fasting: Option<FastingLevel>,
) -> FixedFeast {
    FixedFeast {
        month,
        day,
        name: name.to_string(),
        name_en: name_en.map(str::to_string),
        level,
        fasting,
    }
}

fn builtin_great_feasts() -> Vec<FixedFeast> {
    use FeastLevel::Great;
    vec![
        feast(1, 6, "Theophany", Some("Baptism of the Lord"), Great, None),
        feast(2, 2, "Meeting of the Lord", Some("Presentation in the Temple"), Great, None),
        feast(3, 25, "Annunciation of the Theotokos", None, Great, None),
        feast(8, 6, "Transfiguration of the Lord", None, Great, None),
        feast(8, 15, "Dormition of the Theotokos", None, Great, None),
        feast(9, 8, "Nativity of the Theotokos", None, Great, None),
        feast(
            9,
            14,
            "Elevation of the Holy Cross",
            None,
            Great,
            Some(FastingLevel::Strict),
        ),
        feast(11, 21, "Entry of the Theotokos into the Temple", None, Great, None),
        feast(12, 25, "Nativity of the Lord", Some("Christmas"), Great, None),
    ]
}

fn builtin_major_feasts() -> Vec<FixedFeast> {
    use FeastLevel::Major;
    vec![
        feast(1, 1, "Circumcision of the Lord and St. Basil the Great", None, Major, None),
        feast(1, 30, "Three Holy Hierarchs", None, Major, None),
        feast(4, 23, "Great-Martyr George", None, Major, None),
        feast(5, 21, "Sts. Constantine and Helen", None, Major, None),
        feast(6, 24, "Nativity of St. John the Baptist", None, Major, None),
        feast(6, 29, "Holy Apostles Peter and Paul", None, Major, None),
        feast(7, 20, "Holy Prophet Elijah", None, Major, None),
        feast(
            8,
            29,
            "Beheading of St. John the Baptist",
            None,
            Major,
            Some(FastingLevel::Strict),
        ),
        feast(10, 1, "Protection of the Theotokos", None, Major, None),
        feast(10, 26, "Great-Martyr Demetrius", None, Major, None),
        feast(11, 8, "Synaxis of the Archangels", None, Major, None),
        feast(12, 6, "St. Nicholas the Wonderworker", None, Major, None),
    ]
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date in builtin table")
}

fn builtin_paschal_years() -> BTreeMap<i32, PaschalYear> {
    let rows = [
        // (year, pascha, palm, ascension, pentecost, all saints, lent start, lent end)
        (2024, (5, 5), (4, 28), (6, 13), (6, 23), (6, 30), (3, 18), (5, 4)),
        (2025, (4, 20), (4, 13), (5, 29), (6, 8), (6, 15), (3, 3), (4, 19)),
        (2026, (4, 12), (4, 5), (5, 21), (5, 31), (6, 7), (2, 23), (4, 11)),
        (2027, (5, 2), (4, 25), (6, 10), (6, 20), (6, 27), (3, 15), (5, 1)),
        (2028, (4, 16), (4, 9), (5, 25), (6, 4), (6, 11), (2, 28), (4, 15)),
    ];

    rows.iter()
        .map(|&(year, pa, ps, asc, pe, al, ls, le)| {
            (
                year,
                PaschalYear {
                    pascha: ymd(year, pa.0, pa.1),
                    palm_sunday: ymd(year, ps.0, ps.1),
                    ascension: ymd(year, asc.0, asc.1),
                    pentecost: ymd(year, pe.0, pe.1),
                    all_saints: ymd(year, al.0, al.1),
                    lent_start: ymd(year, ls.0, ls.1),
                    lent_end: ymd(year, le.0, le.1),
                },
            )
        })
        .collect()
}

fn builtin_pascha_dates() -> BTreeMap<i32, NaiveDate> {
    [
        (2020, (4, 19)),
        (2021, (5, 2)),
        (2022, (4, 24)),
        (2023, (4, 16)),
        (2024, (5, 5)),
        (2025, (4, 20)),
        (2026, (4, 12)),
        (2027, (5, 2)),
        (2028, (4, 16)),
        (2029, (4, 8)),
        (2030, (4, 28)),
    ]
    .iter()
    .map(|&(year, (m, d))| (year, ymd(year, m, d)))
    .collect()
}
