use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::Operator;

pub const CALC_PATH: &str = "api/calc/";
pub const COMPUTE_PATH: &str = "api/calc/compute/";
pub const STATS_PATH: &str = "api/calc/stats/";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalcRequest {
    pub a: f64,
    pub b: f64,
    pub op: Operator,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalcResponse {
    pub result: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputeRequest {
    pub expression: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputeResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    pub result: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub today_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calc_request_uses_wire_operator_names() {
        let request = CalcRequest {
            a: 1.0,
            b: 2.0,
            op: Operator::Add,
        };
        assert_eq!(
            serde_json::to_value(request).unwrap(),
            serde_json::json!({ "a": 1.0, "b": 2.0, "op": "add" })
        );
    }

    #[test]
    fn stats_response_accepts_missing_date() {
        let stats: StatsResponse = serde_json::from_str(r#"{"today_count": 4}"#).unwrap();
        assert_eq!(stats.today_count, 4);
        assert_eq!(stats.date, None);

        let stats: StatsResponse =
            serde_json::from_str(r#"{"date": "2024-03-09", "today_count": 0}"#).unwrap();
        assert_eq!(stats.date, NaiveDate::from_ymd_opt(2024, 3, 9));
    }
}
