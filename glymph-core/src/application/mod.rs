pub mod agent;
pub mod auth;
pub mod catalog;
pub mod error;
pub mod tooling;
pub mod validation;

pub use error::ServiceError;
