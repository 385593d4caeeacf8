//! Spreadsheet export endpoint

use std::sync::Arc;

use axum::http::header;
use axum::response::IntoResponse;
use axum::{extract::State, routing::get, Router};

use crate::db::repos::UserRepo;
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::User;
use clinicd_core::export::{users_workbook, UserRow};

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

fn to_row(user: User) -> UserRow {
    UserRow {
        name: user.name,
        email: user.email,
        phno: user.phno,
        age: user.age,
        sex: user.sex.to_string(),
        medical_concern: user.medical_concern.join(", "),
        is_completed: user.is_completed,
    }
}

/// GET /api/download-excel
///
/// The workbook is built in memory and streamed straight back; nothing
/// is written to disk.
async fn download_excel(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let users = UserRepo::new(&state.pool).list().await?;
    let rows: Vec<UserRow> = users.into_iter().map(to_row).collect();
    let bytes = users_workbook(&rows)?;

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"UserData.xlsx\"",
            ),
        ],
        bytes,
    ))
}

/// Export routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/download-excel", get(download_excel))
}
