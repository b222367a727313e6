//! Custom extractors for Axum handlers.
//!
//! Reusable extractors that reduce boilerplate and keep rejections in the
//! standard [`ErrorResponse`](crate::errors::ErrorResponse) envelope.

pub mod id_path;
pub mod validated_json;

pub use id_path::IdPath;
pub use validated_json::ValidatedJson;
