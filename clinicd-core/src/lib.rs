//! clinicd-core: shared helpers for the clinicd backend
//!
//! Keeps the pieces that have no HTTP or database knowledge:
//! environment configuration, prescription mail composition and
//! dispatch, and the spreadsheet export of patient records.

pub mod config;
pub mod export;
pub mod mail;

pub use config::{Config, MailConfig};
pub use mail::{Mailer, PrescriptionEmail, PrescriptionLine};
