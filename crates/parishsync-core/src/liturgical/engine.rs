//! Pure calendar-engine functions.
//!
//! All functions take the data table and a date explicitly; calling any
//! of them twice with equal arguments yields equal results.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use super::{FastingLevel, FeastLevel, LiturgicalData, OrthodoxEvent, Season};

/// Liturgy duration is not modeled here; the conflict detector owns the
/// implied-window math.
///
/// Returns the union of fixed-date and moveable feasts falling on `date`.
/// Fixed and moveable tables are disjoint by construction, so no dedup
/// pass runs; callers merging with other sources must dedupe by
/// `(name, date)`.
pub fn events_for_date(data: &LiturgicalData, date: NaiveDate) -> Vec<OrthodoxEvent> {
    let mut events = Vec::new();

    for feast in data.great_feasts.iter().chain(data.major_feasts.iter()) {
        if feast.month == date.month() && feast.day == date.day() {
            events.push(OrthodoxEvent {
                name: feast.name.clone(),
                name_en: feast.name_en.clone(),
                date,
                moveable: false,
                liturgy_required: true,
                level: feast.level,
                fasting: feast.fasting,
            });
        }
    }

    if let Some(year) = data.paschal_year(date.year()) {
        let anchors: [(&str, NaiveDate, FeastLevel); 5] = [
            ("Pascha", year.pascha, FeastLevel::Great),
            ("Palm Sunday", year.palm_sunday, FeastLevel::Great),
            ("Ascension of the Lord", year.ascension, FeastLevel::Great),
            ("Pentecost", year.pentecost, FeastLevel::Great),
            ("All Saints Sunday", year.all_saints, FeastLevel::Major),
        ];
        for (name, anchor, level) in anchors {
            if anchor == date {
                events.push(OrthodoxEvent {
                    name: name.to_string(),
                    name_en: None,
                    date,
                    moveable: true,
                    liturgy_required: true,
                    level,
                    fasting: None,
                });
            }
        }
    }

    events
}

/// Whether `date` falls on a Sunday.
pub fn is_sunday(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Sun
}

/// Fasting level for a date, strict precedence order, first match wins.
pub fn fasting_level(data: &LiturgicalData, date: NaiveDate) -> FastingLevel {
    // Great Lent, per-year inclusive range. Unsupported years contribute
    // no match and fall through.
    if let Some((start, end)) = data.lent_range(date.year()) {
        if date >= start && date <= end {
            return FastingLevel::Lent;
        }
    }

    let (month, day) = (date.month(), date.day());

    // Dormition fast, Aug 1-14 every year.
    if month == 8 && day <= 14 {
        return FastingLevel::Regular;
    }

    // Nativity fast, Nov 15 - Dec 24. Neither fixed range wraps the
    // year boundary, so the query date's own year is always correct.
    if (month == 11 && day >= 15) || (month == 12 && day <= 24) {
        return FastingLevel::Regular;
    }

    // Strict one-day fast on Sep 14.
    if month == 9 && day == 14 {
        return FastingLevel::Strict;
    }

    // Weekly ascetic days.
    if matches!(date.weekday(), Weekday::Wed | Weekday::Fri) {
        return FastingLevel::Regular;
    }

    FastingLevel::None
}

/// Julian-calendar date for a Gregorian one.
///
/// The fixed 13-day offset holds for the 20th-21st century divergence
/// only; no Gregorian leap-rule adjustment is modeled.
pub fn julian_date(gregorian: NaiveDate) -> NaiveDate {
    gregorian - Duration::days(13)
}

/// Choir tone (1..=8), an 8-week cycle starting at tone 1 the week of
/// Pascha. Years outside the Pascha table degrade to tone 1.
pub fn choir_tone(data: &LiturgicalData, date: NaiveDate) -> u8 {
    let Some(pascha) = data.pascha(date.year()) else {
        return 1;
    };
    let days_since = (date - pascha).num_days();
    // Euclidean div/rem so pre-Pascha weeks normalize into the cycle.
    (days_since.div_euclid(7).rem_euclid(8) + 1) as u8
}

/// Liturgical season for a date. Years outside the Pascha table degrade
/// to [`Season::Ordinary`].
pub fn liturgical_season(data: &LiturgicalData, date: NaiveDate) -> Season {
    let Some(pascha) = data.pascha(date.year()) else {
        return Season::Ordinary;
    };
    let days_since = (date - pascha).num_days();
    let (month, day) = (date.month(), date.day());

    if (0..=7).contains(&days_since) {
        return Season::BrightWeek;
    }
    if (8..=49).contains(&days_since) {
        return Season::Paschal;
    }
    if (month == 11 && day >= 15) || (month == 12 && day <= 24) {
        return Season::NativityFast;
    }
    if (month == 12 && day >= 25) || (month == 1 && day <= 6) {
        return Season::Nativity;
    }
    if (-48..=-1).contains(&days_since) {
        let week = ((days_since + 48) / 7 + 1) as u32;
        return Season::GreatLent { week };
    }
    let pentecost = pascha + Duration::days(49);
    if let Some(apostles_end) = NaiveDate::from_ymd_opt(date.year(), 6, 29) {
        if date >= pentecost && date <= apostles_end {
            return Season::ApostlesFast;
        }
    }
    if month == 8 && day <= 14 {
        return Season::DormitionFast;
    }

    Season::Ordinary
}
