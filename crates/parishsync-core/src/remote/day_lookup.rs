//! Remote "today's calendar" lookup, keyed by jurisdiction and date.
//!
//! Any failure (network, non-2xx, timeout) falls back to the local
//! calendar engine, and the fallback result still populates the cache
//! so repeated failures do not re-hit the network within the TTL.

use std::time::Duration as StdDuration;

use chrono::{Duration, NaiveDate, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{TtlCache, CACHE_TTL_HOURS, REQUEST_TIMEOUT_SECS};
use crate::liturgical::{self, FastingLevel, FeastLevel, LiturgicalData};

/// Where a [`DayInfo`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DaySource {
    Remote,
    Local,
}

/// Scripture readings for a day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Readings {
    pub epistle: Option<String>,
    pub gospel: Option<String>,
}

/// The day summary shown on the "today" screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayInfo {
    pub saints: Vec<String>,
    pub readings: Readings,
    pub fasting: FastingLevel,
    pub feast: Option<String>,
    pub tone: Option<u8>,
    pub source: DaySource,
}

/// Client for the remote day-lookup service.
pub struct DayLookupClient {
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
    base_url: String,
    data: LiturgicalData,
    cache: TtlCache<String, DayInfo>,
}

impl DayLookupClient {
    pub fn new(base_url: &str, data: LiturgicalData) -> Result<Self, std::io::Error> {
        let client = reqwest::Client::builder()
            .timeout(StdDuration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(std::io::Error::other)?;
        Ok(Self {
            client,
            runtime: tokio::runtime::Runtime::new()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            data,
            cache: TtlCache::new(Duration::hours(CACHE_TTL_HOURS)),
        })
    }

    /// Day summary for `date`, remote first, local engine on failure.
    /// Results (either provenance) are cached for the TTL window.
    pub fn fetch_day(&mut self, jurisdiction: &str, date: NaiveDate) -> DayInfo {
        let key = format!("today:{jurisdiction}:{date}");
        let now = Utc::now();
        if let Some(cached) = self.cache.get(&key, now) {
            return cached;
        }

        let info = match self.fetch_remote(jurisdiction, date) {
            Ok(info) => info,
            Err(e) => {
                warn!("day lookup for {date} failed, using local engine: {e}");
                self.local_day(date)
            }
        };
        self.cache.insert(key, info.clone(), now);
        info
    }

    fn fetch_remote(&self, jurisdiction: &str, date: NaiveDate) -> Result<DayInfo, reqwest::Error> {
        let url = format!(
            "{}/api/calendar?date={date}&jurisdiction={}",
            self.base_url,
            urlencoding::encode(jurisdiction)
        );
        debug!("fetching {url}");
        let body: Value = self.runtime.block_on(async {
            self.client
                .get(&url)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await
        })?;
        Ok(self.parse_remote(&body, date))
    }

    fn parse_remote(&self, body: &Value, date: NaiveDate) -> DayInfo {
        let saints = body["saints"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|s| s.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        let readings = Readings {
            epistle: body["readings"]["epistle"].as_str().map(str::to_string),
            gospel: body["readings"]["gospel"].as_str().map(str::to_string),
        };
        let fasting = body["fasting"]
            .as_str()
            .and_then(parse_fasting)
            .unwrap_or_else(|| liturgical::fasting_level(&self.data, date));
        let tone = body["tone"]
            .as_u64()
            .map(|t| t as u8)
            .or_else(|| Some(liturgical::choir_tone(&self.data, date)));
        DayInfo {
            saints,
            readings,
            fasting,
            feast: body["feast"].as_str().map(str::to_string),
            tone,
            source: DaySource::Remote,
        }
    }

    /// Synthesize an equivalent response from the local engine.
    fn local_day(&self, date: NaiveDate) -> DayInfo {
        let mut events = liturgical::events_for_date(&self.data, date);
        events.sort_by_key(|e| match e.level {
            FeastLevel::Great => 0,
            FeastLevel::Major => 1,
            FeastLevel::Minor => 2,
            FeastLevel::Regular => 3,
        });
        DayInfo {
            saints: events.iter().map(|e| e.name.clone()).collect(),
            readings: Readings::default(),
            fasting: liturgical::fasting_level(&self.data, date),
            feast: events.first().map(|e| e.name.clone()),
            tone: Some(liturgical::choir_tone(&self.data, date)),
            source: DaySource::Local,
        }
    }
}

fn parse_fasting(value: &str) -> Option<FastingLevel> {
    match value {
        "none" => Some(FastingLevel::None),
        "regular" => Some(FastingLevel::Regular),
        "strict" => Some(FastingLevel::Strict),
        "lent" => Some(FastingLevel::Lent),
        _ => None,
    }
}
