//! clinicd-server: clinic management REST backend
//!
//! Exposes CRUD over users, prescriptions and reviews, queues
//! prescription mail, exports a spreadsheet of all users, and runs a
//! daily scheduled fetch against its own listing endpoint.

pub mod db;
pub mod http;
pub mod mailer;
pub mod models;
pub mod scheduler;

pub use http::error::ApiError;
pub use http::server::{run_server, AppState, ServerConfig};
