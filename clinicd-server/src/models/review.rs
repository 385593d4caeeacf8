//! Review model and create-payload validation
//!
//! Reviews are independent of users; `created_at` is server-assigned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{check_email, check_min_len, FieldError};

pub const RATING_MIN: i32 = 1;
pub const RATING_MAX: i32 = 5;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Untyped create payload.
#[derive(Debug, Clone, Deserialize)]
pub struct NewReview {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub rating: i32,
    #[serde(default)]
    pub comment: String,
}

/// Narrowed create payload.
#[derive(Debug, Clone)]
pub struct ValidReview {
    pub name: String,
    pub email: String,
    pub rating: i32,
    pub comment: String,
}

impl NewReview {
    /// Check every constraint and collect all failures.
    pub fn validate(self) -> Result<ValidReview, Vec<FieldError>> {
        let mut errors = Vec::new();

        if let Err(e) = check_min_len("name", &self.name, 2) {
            errors.push(e);
        }
        if let Err(e) = check_email("email", &self.email) {
            errors.push(e);
        }
        if !(RATING_MIN..=RATING_MAX).contains(&self.rating) {
            errors.push(FieldError::OutOfRange {
                field: "rating",
                min: RATING_MIN,
                max: RATING_MAX,
            });
        }
        if let Err(e) = check_min_len("comment", &self.comment, 5) {
            errors.push(e);
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ValidReview {
            name: self.name,
            email: self.email,
            rating: self.rating,
            comment: self.comment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(rating: i32) -> NewReview {
        NewReview {
            name: "Grace".to_string(),
            email: "grace@example.com".to_string(),
            rating,
            comment: "Very helpful staff".to_string(),
        }
    }

    #[test]
    fn boundary_ratings_accepted() {
        assert!(payload(1).validate().is_ok());
        assert!(payload(5).validate().is_ok());
    }

    #[test]
    fn out_of_range_ratings_rejected() {
        for rating in [0, 6, -3] {
            let errors = payload(rating).validate().unwrap_err();
            assert!(matches!(
                errors[0],
                FieldError::OutOfRange {
                    field: "rating",
                    min: 1,
                    max: 5
                }
            ));
        }
    }

    #[test]
    fn short_comment_rejected() {
        let mut p = payload(4);
        p.comment = "meh".to_string();
        let errors = p.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0],
            FieldError::TooShort {
                field: "comment",
                min: 5
            }
        ));
    }

    #[test]
    fn bad_email_and_rating_both_reported() {
        let p = NewReview {
            name: "Grace".to_string(),
            email: "grace-at-example".to_string(),
            rating: 6,
            comment: "Very helpful staff".to_string(),
        };
        let errors = p.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
