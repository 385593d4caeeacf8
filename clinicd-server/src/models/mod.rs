//! Domain models and request payload validation

pub mod prescription;
pub mod review;
pub mod user;
pub mod validation;

pub use prescription::{NewPrescription, Prescription};
pub use review::{NewReview, Review, ValidReview};
pub use user::{NewUser, Sex, User, ValidUser};
pub use validation::FieldError;
