//! Route handlers, one module per resource

pub mod export;
pub mod health;
pub mod mail;
pub mod reviews;
pub mod users;
