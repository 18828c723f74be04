//! Visitor classification from the `User-Agent` string.

use regex::Regex;
use std::sync::LazyLock;

use crate::domain::entities::{BrowserName, DeviceClass};

static MOBILE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)mobile").expect("valid mobile pattern"));

/// Device class and browser attributed to a single visit.
///
/// Classification is total: every string (and a missing one) maps to exactly
/// one device class and one browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientProfile {
    pub device: DeviceClass,
    pub browser: BrowserName,
}

impl ClientProfile {
    pub fn from_user_agent(user_agent: Option<&str>) -> Self {
        let ua = user_agent.unwrap_or_default();
        Self {
            device: classify_device(ua),
            browser: classify_browser(ua),
        }
    }
}

/// `Mobile` when the string contains "mobile" in any case, else `Desktop`.
pub fn classify_device(user_agent: &str) -> DeviceClass {
    if MOBILE_REGEX.is_match(user_agent) {
        DeviceClass::Mobile
    } else {
        DeviceClass::Desktop
    }
}

/// First match wins: Firefox, Chrome, Safari, Edge, then IE markers.
///
/// Checks are case-sensitive substring matches. Chromium-based Edge and most
/// Android browsers carry "Chrome" and land there.
pub fn classify_browser(user_agent: &str) -> BrowserName {
    if user_agent.contains("Firefox") {
        BrowserName::Firefox
    } else if user_agent.contains("Chrome") {
        BrowserName::Chrome
    } else if user_agent.contains("Safari") {
        BrowserName::Safari
    } else if user_agent.contains("Edge") {
        BrowserName::Edge
    } else if user_agent.contains("MSIE") || user_agent.contains("Trident/") {
        BrowserName::InternetExplorer
    } else {
        BrowserName::Other
    }
}
