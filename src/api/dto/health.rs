//! DTOs for the health endpoint.

use serde::Serialize;

/// Overall service state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: &'static str,
    pub checks: HealthChecks,
}

/// One entry per dependency the service needs to answer requests.
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub store: CheckStatus,
}

#[derive(Debug, Serialize)]
pub struct CheckStatus {
    /// `ok` or `error`.
    pub status: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckStatus {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok",
            message: Some(message.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: Some(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_lowercase_status() {
        let response = HealthResponse {
            status: HealthStatus::Degraded,
            version: "0.1.0",
            checks: HealthChecks {
                store: CheckStatus::error("Store error: timed out"),
            },
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["checks"]["store"]["status"], "error");
    }
}
