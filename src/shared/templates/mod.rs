//! Server-side HTML rendering.

pub mod engine;
mod pages;

pub use engine::{PageRenderer, TemplateError};
pub use pages::Pages;

use crate::core::error::AppError;

impl From<TemplateError> for AppError {
    fn from(err: TemplateError) -> Self {
        AppError::Internal(err.to_string())
    }
}
