//! Embedded click analytics for a short link.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Device class attributed to a visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DeviceClass {
    Mobile,
    Desktop,
}

impl DeviceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Mobile => "Mobile",
            DeviceClass::Desktop => "Desktop",
        }
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Browser family attributed to a visit. `Other` is the catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BrowserName {
    Firefox,
    Chrome,
    Safari,
    Edge,
    #[serde(rename = "Internet Explorer")]
    InternetExplorer,
    Other,
}

impl BrowserName {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserName::Firefox => "Firefox",
            BrowserName::Chrome => "Chrome",
            BrowserName::Safari => "Safari",
            BrowserName::Edge => "Edge",
            BrowserName::InternetExplorer => "Internet Explorer",
            BrowserName::Other => "Other",
        }
    }
}

impl fmt::Display for BrowserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One visit, ready to be appended to a link's analytics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickSample {
    pub at: DateTime<Utc>,
    pub device: DeviceClass,
    pub browser: BrowserName,
}

/// Analytics document stored alongside every link.
///
/// Serializes to the same shape the store keeps:
/// `{"timestamps": [...], "devices": {"Mobile": 1}, "browsers": {"Chrome": 1}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analytics {
    #[serde(default)]
    pub timestamps: Vec<DateTime<Utc>>,
    #[serde(default)]
    pub devices: BTreeMap<DeviceClass, u64>,
    #[serde(default)]
    pub browsers: BTreeMap<BrowserName, u64>,
}

impl Analytics {
    /// Appends a visit: one timestamp, one device increment, one browser increment.
    pub fn record(&mut self, sample: &ClickSample) {
        self.timestamps.push(sample.at);
        *self.devices.entry(sample.device).or_insert(0) += 1;
        *self.browsers.entry(sample.browser).or_insert(0) += 1;
    }

    /// Number of visits grouped by UTC calendar day, ascending.
    pub fn daily_clicks(&self) -> BTreeMap<NaiveDate, u64> {
        let mut days = BTreeMap::new();
        for ts in &self.timestamps {
            *days.entry(ts.date_naive()).or_insert(0) += 1;
        }
        days
    }

    pub fn device_total(&self) -> u64 {
        self.devices.values().sum()
    }

    pub fn browser_total(&self) -> u64 {
        self.browsers.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(day: u32, hour: u32, device: DeviceClass, browser: BrowserName) -> ClickSample {
        ClickSample {
            at: Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap(),
            device,
            browser,
        }
    }

    #[test]
    fn test_record_updates_all_counters() {
        let mut analytics = Analytics::default();

        analytics.record(&sample(1, 10, DeviceClass::Mobile, BrowserName::Safari));
        analytics.record(&sample(1, 11, DeviceClass::Mobile, BrowserName::Chrome));
        analytics.record(&sample(2, 9, DeviceClass::Desktop, BrowserName::Chrome));

        assert_eq!(analytics.timestamps.len(), 3);
        assert_eq!(analytics.devices[&DeviceClass::Mobile], 2);
        assert_eq!(analytics.devices[&DeviceClass::Desktop], 1);
        assert_eq!(analytics.browsers[&BrowserName::Chrome], 2);
        assert_eq!(analytics.browsers[&BrowserName::Safari], 1);
        assert_eq!(analytics.device_total(), 3);
        assert_eq!(analytics.browser_total(), 3);
    }

    #[test]
    fn test_daily_clicks_grouped_and_sorted() {
        let mut analytics = Analytics::default();
        analytics.record(&sample(5, 23, DeviceClass::Desktop, BrowserName::Other));
        analytics.record(&sample(2, 1, DeviceClass::Desktop, BrowserName::Other));
        analytics.record(&sample(5, 0, DeviceClass::Desktop, BrowserName::Other));

        let days: Vec<(String, u64)> = analytics
            .daily_clicks()
            .into_iter()
            .map(|(d, n)| (d.to_string(), n))
            .collect();

        assert_eq!(
            days,
            vec![("2024-03-02".to_string(), 1), ("2024-03-05".to_string(), 2)]
        );
    }

    #[test]
    fn test_serialized_shape() {
        let mut analytics = Analytics::default();
        analytics.record(&sample(1, 12, DeviceClass::Desktop, BrowserName::InternetExplorer));

        let value = serde_json::to_value(&analytics).unwrap();

        assert_eq!(value["devices"]["Desktop"], 1);
        assert_eq!(value["browsers"]["Internet Explorer"], 1);
        assert_eq!(value["timestamps"][0], "2024-03-01T12:00:00Z");
    }

    #[test]
    fn test_deserialize_empty_document() {
        let analytics: Analytics =
            serde_json::from_str(r#"{"devices":{},"browsers":{},"timestamps":[]}"#).unwrap();
        assert_eq!(analytics, Analytics::default());

        let analytics: Analytics = serde_json::from_str("{}").unwrap();
        assert!(analytics.timestamps.is_empty());
    }
}
