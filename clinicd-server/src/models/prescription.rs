//! Prescription model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A prescription row, always owned by exactly one user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub tablets: String,
    pub dosage: String,
    pub duration: String,
    pub date: DateTime<Utc>,
}

/// One entry of the `newPrescription` array on the append route.
/// `date` defaults to the server clock when omitted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPrescription {
    pub tablets: String,
    pub dosage: String,
    pub duration: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_is_optional() {
        let p: NewPrescription =
            serde_json::from_str(r#"{"tablets":"A","dosage":"1","duration":"5d"}"#).unwrap();
        assert!(p.date.is_none());
        assert_eq!(p.tablets, "A");
    }

    #[test]
    fn explicit_date_is_kept() {
        let p: NewPrescription = serde_json::from_str(
            r#"{"tablets":"A","dosage":"1","duration":"5d","date":"2025-03-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(p.date.unwrap().to_rfc3339(), "2025-03-01T10:00:00+00:00");
    }

    #[test]
    fn missing_tablets_is_an_error() {
        let res: Result<NewPrescription, _> =
            serde_json::from_str(r#"{"dosage":"1","duration":"5d"}"#);
        assert!(res.is_err());
    }
}
