//! User endpoints: listing, creation, prescription append, completion,
//! and owner-scoped deletes

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, put},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::db::repos::{PrescriptionRepo, UserRepo};
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::{NewPrescription, NewUser, Prescription, Sex, User};

/// User response with prescriptions
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phno: String,
    pub age: String,
    pub sex: Sex,
    pub address: String,
    pub medical_concern: Vec<String>,
    pub is_completed: bool,
    pub created_at: String,
    pub prescriptions: Vec<PrescriptionResponse>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub tablets: String,
    pub dosage: String,
    pub duration: String,
    pub date: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            phno: u.phno,
            age: u.age,
            sex: u.sex,
            address: u.address,
            medical_concern: u.medical_concern,
            is_completed: u.is_completed,
            created_at: u.created_at.to_rfc3339(),
            prescriptions: u
                .prescriptions
                .into_iter()
                .map(PrescriptionResponse::from)
                .collect(),
        }
    }
}

impl From<Prescription> for PrescriptionResponse {
    fn from(p: Prescription) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            tablets: p.tablets,
            dosage: p.dosage,
            duration: p.duration,
            date: p.date.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct CreatedResponse {
    pub message: &'static str,
    pub user: UserResponse,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct DeletedPrescriptionResponse {
    pub message: &'static str,
    pub deleted: PrescriptionResponse,
}

/// GET /api/userDetails - all users with prescriptions
async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = UserRepo::new(&state.pool).list().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// POST /api/userDetails - validate then create
async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewUser>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let valid = payload.validate()?;
    let user = UserRepo::new(&state.pool).create(valid).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "User created",
            user: user.into(),
        }),
    ))
}

/// GET /api/userDetails/{id} - one user with prescriptions
async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = UserRepo::new(&state.pool).get(id).await?;
    Ok(Json(user.into()))
}

/// Pull the `newPrescription` array out of an otherwise untyped body.
/// Anything that isn't an array of prescription objects is a 400.
fn parse_new_prescriptions(body: &Value) -> Result<Vec<NewPrescription>, ApiError> {
    let entries = body
        .get("newPrescription")
        .and_then(Value::as_array)
        .ok_or_else(|| ApiError::BadRequest {
            message: "newPrescription must be an array".to_string(),
        })?;

    entries
        .iter()
        .map(|entry| {
            serde_json::from_value(entry.clone()).map_err(|e| ApiError::BadRequest {
                message: format!("invalid prescription entry: {}", e),
            })
        })
        .collect()
}

/// PUT /api/userDetails/{id} - append prescriptions
async fn add_prescriptions(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> Result<Json<UserResponse>, ApiError> {
    let items = parse_new_prescriptions(&body)?;
    let user = UserRepo::new(&state.pool)
        .append_prescriptions(id, &items)
        .await?;
    Ok(Json(user.into()))
}

/// PUT /api/userDetails/{id}/complete - mark treatment completed
async fn complete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    UserRepo::new(&state.pool).mark_completed(id).await?;
    Ok(Json(MessageResponse {
        message: "Marked as completed",
    }))
}

/// DELETE /api/userDetails/{id}
async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    UserRepo::new(&state.pool).delete(id).await?;
    Ok(Json(MessageResponse {
        message: "User deleted",
    }))
}

/// DELETE /api/userDetails/{userId}/prescription/{prescriptionId}
///
/// Scoped: the prescription must belong to the user in the path.
async fn delete_prescription(
    State(state): State<Arc<AppState>>,
    Path((user_id, prescription_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<DeletedPrescriptionResponse>, ApiError> {
    let deleted = PrescriptionRepo::new(&state.pool)
        .delete_scoped(user_id, prescription_id)
        .await?;
    Ok(Json(DeletedPrescriptionResponse {
        message: "Prescription deleted",
        deleted: deleted.into(),
    }))
}

/// DELETE /api/userDetails/{userId}/newPrescription/{prescriptionId}
async fn delete_new_prescription(
    State(state): State<Arc<AppState>>,
    Path((user_id, prescription_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<DeletedPrescriptionResponse>, ApiError> {
    let deleted = PrescriptionRepo::new(&state.pool)
        .delete_new_scoped(user_id, prescription_id)
        .await?;
    Ok(Json(DeletedPrescriptionResponse {
        message: "New prescription deleted",
        deleted: deleted.into(),
    }))
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/userDetails", get(list_users).post(create_user))
        .route(
            "/api/userDetails/{id}",
            get(get_user).put(add_prescriptions).delete(delete_user),
        )
        .route("/api/userDetails/{id}/complete", put(complete_user))
        .route(
            "/api/userDetails/{user_id}/prescription/{prescription_id}",
            delete(delete_prescription),
        )
        .route(
            "/api/userDetails/{user_id}/newPrescription/{prescription_id}",
            delete(delete_new_prescription),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_prescription_must_be_an_array() {
        for body in [
            json!({}),
            json!({"newPrescription": {"tablets": "A"}}),
            json!({"newPrescription": "A"}),
            json!({"newPrescription": null}),
        ] {
            let err = parse_new_prescriptions(&body).unwrap_err();
            assert!(matches!(err, ApiError::BadRequest { .. }));
        }
    }

    #[test]
    fn empty_array_is_accepted() {
        let items = parse_new_prescriptions(&json!({"newPrescription": []})).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn entries_are_deserialized() {
        let body = json!({
            "newPrescription": [
                {"tablets": "A", "dosage": "1", "duration": "5d"},
                {"tablets": "B", "dosage": "2", "duration": "3d", "date": "2025-03-01T10:00:00Z"},
            ]
        });
        let items = parse_new_prescriptions(&body).unwrap();
        assert_eq!(items.len(), 2);
        assert!(items[0].date.is_none());
        assert!(items[1].date.is_some());
    }

    #[test]
    fn malformed_entry_is_rejected() {
        let body = json!({"newPrescription": [{"dosage": "1"}]});
        let err = parse_new_prescriptions(&body).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest { .. }));
    }

    #[test]
    fn response_serializes_camel_case() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phno: "0123456789".to_string(),
            age: "36".to_string(),
            sex: Sex::Female,
            address: "12 Analytical Lane".to_string(),
            medical_concern: vec!["migraine".to_string()],
            is_completed: false,
            created_at: chrono::Utc::now(),
            prescriptions: Vec::new(),
        };
        let value = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(value.get("medicalConcern").is_some());
        assert!(value.get("isCompleted").is_some());
        assert!(value.get("medical_concern").is_none());
    }
}
