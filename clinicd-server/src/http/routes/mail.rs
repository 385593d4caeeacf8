//! Prescription mail endpoint
//!
//! Validates the request against current data, then hands the composed
//! email to the background mailer task. The HTTP response only reports
//! that the message was queued; send failures land in the mailer's log.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::repos::UserRepo;
use crate::http::error::ApiError;
use crate::http::server::AppState;
use clinicd_core::{PrescriptionEmail, PrescriptionLine};

#[derive(Deserialize)]
pub struct SendEmailRequest {
    pub id: Uuid,
}

#[derive(Serialize)]
pub struct QueuedResponse {
    pub message: &'static str,
}

/// POST /api/sendEmail
async fn send_email(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SendEmailRequest>,
) -> Result<(StatusCode, Json<QueuedResponse>), ApiError> {
    let user = UserRepo::new(&state.pool).get(req.id).await?;

    if user.email.trim().is_empty() {
        return Err(ApiError::BadRequest {
            message: "user email is missing".to_string(),
        });
    }
    if user.prescriptions.is_empty() {
        return Err(ApiError::BadRequest {
            message: "no prescriptions available to email".to_string(),
        });
    }

    let email = PrescriptionEmail {
        to: user.email,
        patient_name: user.name,
        items: user
            .prescriptions
            .into_iter()
            .map(|p| PrescriptionLine {
                tablets: p.tablets,
                dosage: p.dosage,
                duration: p.duration,
            })
            .collect(),
    };

    state
        .mail_queue
        .send(email)
        .await
        .map_err(|_| ApiError::Internal {
            message: "mail queue is closed".to_string(),
        })?;

    Ok((
        StatusCode::ACCEPTED,
        Json(QueuedResponse {
            message: "Email queued",
        }),
    ))
}

/// Mail routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/sendEmail", post(send_email))
}
