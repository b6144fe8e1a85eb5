use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::diagnostic::{AnswerSet, CompanyInfo};

pub const ANONYMOUS_USER_ID: &str = "anonymous";
const ANONYMOUS_NAME: &str = "Anonyme";
const ANONYMOUS_EMAIL: &str = "anonymous@example.com";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultId(pub String);

impl ResultId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Account a result is filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultOwner {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl ResultOwner {
    /// Owner derived from the submitting company; falls back to the anonymous account.
    pub fn for_submission(user_id: Option<&str>, company: &CompanyInfo) -> Self {
        let non_empty = |value: &str, fallback: &str| {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                fallback.to_string()
            } else {
                trimmed.to_string()
            }
        };

        Self {
            id: non_empty(user_id.unwrap_or_default(), ANONYMOUS_USER_ID),
            name: non_empty(&company.name, ANONYMOUS_NAME),
            email: non_empty(&company.email, ANONYMOUS_EMAIL),
        }
    }
}

impl Default for ResultOwner {
    fn default() -> Self {
        Self::for_submission(None, &CompanyInfo::default())
    }
}

/// A persisted diagnostic result.
///
/// Camel-case field names from older exports are accepted on read, and `created_at`
/// is normalised to UTC whatever shape it was stored in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredResult {
    pub id: ResultId,
    pub score: f64,
    #[serde(default)]
    pub answers: AnswerSet,
    #[serde(default, alias = "companyInfo")]
    pub company_info: CompanyInfo,
    #[serde(alias = "createdAt", deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub user: ResultOwner,
    #[serde(default, alias = "submissionId", skip_serializing_if = "Option::is_none")]
    pub submission_id: Option<Uuid>,
}

impl StoredResult {
    /// Company name, or the owner's name when the company block is empty.
    pub fn display_name(&self) -> &str {
        if self.company_info.name.trim().is_empty() {
            &self.user.name
        } else {
            &self.company_info.name
        }
    }

    pub fn display_email(&self) -> &str {
        if self.company_info.email.trim().is_empty() {
            &self.user.email
        } else {
            &self.company_info.email
        }
    }
}

/// Payload accepted when a completed diagnostic is submitted.
///
/// Any client-side score is ignored; the overall score is recomputed from `answers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewResult {
    #[serde(default, alias = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub answers: AnswerSet,
    #[serde(alias = "companyInfo")]
    pub company_info: CompanyInfo,
    #[serde(default, alias = "submissionId", skip_serializing_if = "Option::is_none")]
    pub submission_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Name,
    Email,
    Score,
    #[default]
    #[serde(alias = "createdAt", alias = "date")]
    CreatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Admin list filter: substring search plus a sort key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub sort: SortField,
    #[serde(default)]
    pub order: Option<SortOrder>,
}

impl ResultQuery {
    /// Newest first by date; ascending for every other key unless overridden.
    pub fn effective_order(&self) -> SortOrder {
        self.order.unwrap_or(match self.sort {
            SortField::CreatedAt => SortOrder::Desc,
            _ => SortOrder::Asc,
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    Millis(i64),
    Parts {
        #[serde(alias = "_seconds")]
        seconds: i64,
        #[serde(default, alias = "_nanoseconds")]
        nanoseconds: u32,
    },
}

/// Parses the timestamp shapes found in stored results.
pub fn normalize_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Text(text) => normalize_timestamp(&text)
            .ok_or_else(|| D::Error::custom(format!("unrecognised timestamp '{text}'"))),
        RawTimestamp::Millis(millis) => DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| D::Error::custom(format!("timestamp {millis}ms out of range"))),
        RawTimestamp::Parts {
            seconds,
            nanoseconds,
        } => DateTime::from_timestamp(seconds, nanoseconds)
            .ok_or_else(|| D::Error::custom(format!("timestamp {seconds}s out of range"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn legacy_document(created_at: serde_json::Value) -> serde_json::Value {
        json!({
            "id": "abc123",
            "score": 62.5,
            "answers": {
                "Data|Leaders": { "universe": "Data", "profile": "Leaders", "level": "Avancé", "score": 0 }
            },
            "companyInfo": { "name": "Hexacube", "email": "contact@hexacube.fr", "size": "", "sector": "" },
            "createdAt": created_at,
            "user": { "id": "anonymous", "name": "Hexacube", "email": "contact@hexacube.fr" }
        })
    }

    fn expected() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).single().expect("valid instant")
    }

    #[test]
    fn created_at_accepts_every_stored_shape() {
        for raw in [
            json!("2024-05-17T09:30:00Z"),
            json!("2024-05-17T11:30:00+02:00"),
            json!("2024-05-17T09:30:00.000"),
            json!(1_715_938_200_000_i64),
            json!({ "seconds": 1_715_938_200_i64, "nanoseconds": 0 }),
            json!({ "_seconds": 1_715_938_200_i64, "_nanoseconds": 0 }),
        ] {
            let result: StoredResult =
                serde_json::from_value(legacy_document(raw.clone())).expect("legacy document");
            assert_eq!(result.created_at, expected(), "shape {raw}");
        }
    }

    #[test]
    fn unparseable_timestamps_are_rejected() {
        let error = serde_json::from_value::<StoredResult>(legacy_document(json!("yesterday")));
        assert!(error.is_err());
    }

    #[test]
    fn legacy_documents_keep_answers_and_company() {
        let result: StoredResult =
            serde_json::from_value(legacy_document(json!("2024-05-17T09:30:00Z")))
                .expect("legacy document");

        assert_eq!(result.company_info.name, "Hexacube");
        assert_eq!(result.answers.len(), 1);
        let answer = result.answers.iter().next().expect("answer");
        assert_eq!(answer.score(), 75.0);
    }

    #[test]
    fn owner_falls_back_to_anonymous_account() {
        let owner = ResultOwner::for_submission(Some("  "), &CompanyInfo::default());
        assert_eq!(owner.id, ANONYMOUS_USER_ID);
        assert_eq!(owner.name, "Anonyme");
        assert_eq!(owner.email, "anonymous@example.com");

        let company = CompanyInfo {
            name: "Hexacube".to_string(),
            email: "contact@hexacube.fr".to_string(),
            ..CompanyInfo::default()
        };
        let owner = ResultOwner::for_submission(Some("user-7"), &company);
        assert_eq!(owner.id, "user-7");
        assert_eq!(owner.name, "Hexacube");
    }

    #[test]
    fn default_sort_is_newest_first() {
        let query = ResultQuery::default();
        assert_eq!(query.sort, SortField::CreatedAt);
        assert_eq!(query.effective_order(), SortOrder::Desc);

        let by_name = ResultQuery {
            sort: SortField::Name,
            ..ResultQuery::default()
        };
        assert_eq!(by_name.effective_order(), SortOrder::Asc);
    }

    #[test]
    fn stored_results_serialize_snake_case() {
        let result: StoredResult =
            serde_json::from_value(legacy_document(json!("2024-05-17T09:30:00Z")))
                .expect("legacy document");
        let value = serde_json::to_value(&result).expect("serialize");

        assert!(value.get("company_info").is_some());
        assert_eq!(value["created_at"], "2024-05-17T09:30:00Z");
        assert!(value.get("submission_id").is_none());
    }
}
