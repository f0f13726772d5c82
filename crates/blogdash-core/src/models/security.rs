//! Security log entries and the log analysis endpoint's request/response.

use chrono::{Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp format the analysis endpoint expects (no zone, server local).
const TIME_RANGE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Default look-back window for analysis.
/// 30 days covers a typical review cycle.
const DEFAULT_ANALYSIS_DAYS: i64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityLog {
    pub id: i64,
    #[serde(default)]
    pub ip_address: String,
    #[serde(default)]
    pub user_agent: String,
    #[serde(default)]
    pub details: String,
    /// `login_failed`, `login_success`, `password_reset`, `account_locked`.
    pub event_type: String,
    pub created_at: String,
}

impl SecurityLog {
    pub fn is_failure(&self) -> bool {
        matches!(self.event_type.as_str(), "login_failed" | "account_locked")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisDepth {
    Basic,
    Detailed,
    Comprehensive,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimeRange {
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOptions {
    pub include_patterns: bool,
    pub include_recommendations: bool,
    pub include_summary: bool,
    pub cache_result: bool,
    /// Seconds the backend may cache the result for.
    pub cache_ttl: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisConfig {
    pub time_range: TimeRange,
    pub analysis_type: AnalysisDepth,
    pub model: String,
    pub options: AnalysisOptions,
}

impl AnalysisConfig {
    pub fn between(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            time_range: TimeRange {
                start_time: start.format(TIME_RANGE_FORMAT).to_string(),
                end_time: end.format(TIME_RANGE_FORMAT).to_string(),
            },
            analysis_type: AnalysisDepth::Comprehensive,
            model: "deepseek-chat".to_string(),
            options: AnalysisOptions {
                include_patterns: true,
                include_recommendations: true,
                include_summary: true,
                cache_result: true,
                cache_ttl: 300,
            },
        }
    }

    /// The last `DEFAULT_ANALYSIS_DAYS` days up to now.
    pub fn recent() -> Self {
        let end = Utc::now().naive_utc();
        Self::between(end - Duration::days(DEFAULT_ANALYSIS_DAYS), end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogPattern {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogAnalysis {
    #[serde(default)]
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub patterns: Vec<LogPattern>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_analysis_config_wire_format() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap().and_hms_opt(23, 59, 59).unwrap();
        let json = serde_json::to_value(AnalysisConfig::between(start, end)).unwrap();

        assert_eq!(json["time_range"]["start_time"], "2024-01-01T00:00:00");
        assert_eq!(json["time_range"]["end_time"], "2024-01-31T23:59:59");
        assert_eq!(json["analysis_type"], "comprehensive");
        assert_eq!(json["options"]["cache_ttl"], 300);
    }

    #[test]
    fn test_analysis_defaults_when_fields_missing() {
        let analysis: LogAnalysis = serde_json::from_str(r#"{"summary":"quiet week"}"#).unwrap();
        assert_eq!(analysis.risk_level, RiskLevel::Low);
        assert_eq!(analysis.summary, "quiet week");
        assert!(analysis.patterns.is_empty());

        let analysis: LogAnalysis = serde_json::from_str(
            r#"{"risk_level":"high","patterns":[{"type":"brute_force","count":12,"description":"x"}]}"#,
        )
        .unwrap();
        assert_eq!(analysis.risk_level, RiskLevel::High);
        assert_eq!(analysis.patterns[0].kind, "brute_force");
    }
}
