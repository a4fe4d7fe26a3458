//! API request and response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use validator::Validate;

use crate::health_metrics::BmiCategory;
use crate::models::{Measurement, Role};

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

// ============================================================================
// Authentication
// ============================================================================

/// Tokens plus the signed-in user
///
/// `user.role` lets a client send administrators to the admin view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserProfile,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"))]
    pub password: String,
}

/// User profile response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// BMI records
// ============================================================================

/// Body of `POST /api/bmi`
///
/// Fields stay raw JSON so numbers, numeric strings and blanks can all be
/// told apart by `validation::parse_measurement`. Only a JSON object is
/// accepted as the body; unknown keys are ignored.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecordBmiRequest {
    pub weight: Option<Value>,
    pub height: Option<Value>,
}

impl<'de> Deserialize<'de> for RecordBmiRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut body = Map::<String, Value>::deserialize(deserializer)?;
        let mut take = |key: &str| body.remove(key).filter(|v| !v.is_null());

        Ok(Self {
            weight: take("weight"),
            height: take("height"),
        })
    }
}

/// A BMI record as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementResponse {
    pub id: String,
    pub weight: f64,
    pub height: f64,
    pub bmi: f64,
    pub category: BmiCategory,
    pub created_at: DateTime<Utc>,
    pub user_id: String,
}

impl From<Measurement> for MeasurementResponse {
    fn from(m: Measurement) -> Self {
        Self {
            id: m.id.to_string(),
            weight: m.weight,
            height: m.height,
            bmi: m.bmi,
            category: m.category,
            created_at: m.created_at,
            user_id: m.user_id.to_string(),
        }
    }
}

/// Aggregate statistics for the admin view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_users: i64,
    pub total_records: i64,
    #[serde(rename = "averageBMI")]
    pub average_bmi: f64,
    pub category_distribution: BTreeMap<BmiCategory, i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn test_measurement_response_shape() {
        let user_id = Uuid::new_v4();
        let measurement = Measurement {
            id: Uuid::new_v4(),
            user_id,
            weight: 75.0,
            height: 180.0,
            bmi: 23.15,
            category: BmiCategory::Normal,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(MeasurementResponse::from(measurement)).unwrap();
        let obj = json.as_object().unwrap();
        for key in ["id", "weight", "height", "bmi", "category", "createdAt", "userId"] {
            assert!(obj.contains_key(key), "missing {}", key);
        }
        assert_eq!(json["category"], "Normal");
        assert_eq!(json["userId"], user_id.to_string());
    }

    #[test]
    fn test_stats_response_shape() {
        let mut distribution = BTreeMap::new();
        distribution.insert(BmiCategory::Normal, 2);
        distribution.insert(BmiCategory::Obese, 1);
        let stats = StatsResponse {
            total_users: 2,
            total_records: 3,
            average_bmi: 24.5,
            category_distribution: distribution,
        };

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(
            json,
            json!({
                "totalUsers": 2,
                "totalRecords": 3,
                "averageBMI": 24.5,
                "categoryDistribution": { "Normal": 2, "Obese": 1 }
            })
        );
    }

    #[test]
    fn test_record_request_tolerates_missing_fields() {
        let req: RecordBmiRequest = serde_json::from_value(json!({ "weight": 70 })).unwrap();
        assert!(req.weight.is_some());
        assert!(req.height.is_none());

        let req: RecordBmiRequest =
            serde_json::from_value(json!({ "weight": null, "height": "180", "bmi": 1 })).unwrap();
        assert!(req.weight.is_none());
        assert_eq!(req.height, Some(json!("180")));
    }

    #[rstest]
    #[case(json!([70, 175]))]
    #[case(json!("70,175"))]
    #[case(json!(null))]
    fn test_record_request_requires_object(#[case] body: Value) {
        assert!(serde_json::from_value::<RecordBmiRequest>(body).is_err());
    }

    #[test]
    fn test_register_request_validation() {
        let ok = RegisterRequest {
            name: "Test User".to_string(),
            email: "user@example.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad = RegisterRequest {
            name: String::new(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
        };
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }
}
