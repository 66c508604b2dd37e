//! Remote day-detail lookup, keyed by `(year, month, day)`.

use std::time::Duration as StdDuration;

use chrono::{Datelike, Duration, NaiveDate, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{DaySource, TtlCache, CACHE_TTL_HOURS, REQUEST_TIMEOUT_SECS};
use crate::liturgical::{self, FastingLevel, FeastLevel, LiturgicalData};

/// One commemoration in the detailed day view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayEventDetail {
    pub name: String,
    pub description: Option<String>,
    pub level: FeastLevel,
}

/// Full detail for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayDetail {
    pub events: Vec<DayEventDetail>,
    pub fasting: FastingLevel,
    pub source: DaySource,
}

/// Client for the remote day-detail service. Uses its own cache with
/// a `detail:` key prefix, independent of the "today" lookup.
pub struct DayDetailClient {
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
    base_url: String,
    data: LiturgicalData,
    cache: TtlCache<String, DayDetail>,
}

impl DayDetailClient {
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

    /// Detailed view of `date`, remote first, local engine on failure.
    pub fn fetch_detail(&mut self, date: NaiveDate) -> DayDetail {
        let key = format!("detail:{}-{}-{}", date.year(), date.month(), date.day());
        let now = Utc::now();
        if let Some(cached) = self.cache.get(&key, now) {
            return cached;
        }

        let detail = match self.fetch_remote(date) {
            Ok(detail) => detail,
            Err(e) => {
                warn!("day detail for {date} failed, using local engine: {e}");
                self.local_detail(date)
            }
        };
        self.cache.insert(key, detail.clone(), now);
        detail
    }

    fn fetch_remote(&self, date: NaiveDate) -> Result<DayDetail, reqwest::Error> {
        let url = format!(
            "{}/api/detail/{}/{}/{}",
            self.base_url,
            date.year(),
            date.month(),
            date.day()
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

    fn parse_remote(&self, body: &Value, date: NaiveDate) -> DayDetail {
        let events = body["events"]
            .as_array()
            .map(|items| items.iter().filter_map(parse_event).collect())
            .unwrap_or_default();
        let fasting = body["fasting"]
            .as_str()
            .and_then(parse_fasting)
            .unwrap_or_else(|| liturgical::fasting_level(&self.data, date));
        DayDetail {
            events,
            fasting,
            source: DaySource::Remote,
        }
    }

    fn local_detail(&self, date: NaiveDate) -> DayDetail {
        let events = liturgical::events_for_date(&self.data, date)
            .into_iter()
            .map(|e| DayEventDetail {
                name: e.name,
                description: None,
                level: e.level,
            })
            .collect();
        DayDetail {
            events,
            fasting: liturgical::fasting_level(&self.data, date),
            source: DaySource::Local,
        }
    }
}

fn parse_event(value: &Value) -> Option<DayEventDetail> {
    Some(DayEventDetail {
        name: value["name"].as_str()?.to_string(),
        description: value["description"].as_str().map(str::to_string),
        level: match value["level"].as_str() {
            Some("great") => FeastLevel::Great,
            Some("major") => FeastLevel::Major,
            Some("minor") => FeastLevel::Minor,
            _ => FeastLevel::Regular,
        },
    })
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

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn remote_detail_is_parsed() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/api/detail/2025/8/6")
            .with_status(200)
            .with_body(
                r#"{"events":[{"name":"Transfiguration of the Lord",
                              "description":"Feast of the Transfiguration",
                              "level":"great"}],
                    "fasting":"regular"}"#,
            )
            .expect(1)
            .create();

        let mut client = DayDetailClient::new(&server.url(), LiturgicalData::builtin()).unwrap();
        let detail = client.fetch_detail(d(2025, 8, 6));
        assert_eq!(detail.source, DaySource::Remote);
        assert_eq!(detail.events.len(), 1);
        assert_eq!(detail.events[0].name, "Transfiguration of the Lord");
        assert_eq!(detail.events[0].level, FeastLevel::Great);
        assert_eq!(detail.fasting, FastingLevel::Regular);
        mock.assert();
    }

    #[test]
    fn failure_falls_back_and_caches() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/api/detail/2025/12/25")
            .with_status(503)
            .expect(1)
            .create();

        let mut client = DayDetailClient::new(&server.url(), LiturgicalData::builtin()).unwrap();
        let detail = client.fetch_detail(d(2025, 12, 25));
        assert_eq!(detail.source, DaySource::Local);
        assert!(detail
            .events
            .iter()
            .any(|e| e.name == "Nativity of the Lord"));

        let again = client.fetch_detail(d(2025, 12, 25));
        assert_eq!(again.source, DaySource::Local);
        mock.assert();
    }

    #[test]
    fn dates_are_cached_independently() {
        let mut server = mockito::Server::new();
        let first = server
            .mock("GET", "/api/detail/2025/7/1")
            .with_status(500)
            .expect(1)
            .create();
        let second = server
            .mock("GET", "/api/detail/2025/7/2")
            .with_status(500)
            .expect(1)
            .create();

        let mut client = DayDetailClient::new(&server.url(), LiturgicalData::builtin()).unwrap();
        client.fetch_detail(d(2025, 7, 1));
        client.fetch_detail(d(2025, 7, 2));
        first.assert();
        second.assert();
    }
}
