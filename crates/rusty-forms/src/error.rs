// File: src/error.rs
// Purpose: Errors raised by form model operations

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("a control named `{0}` already exists in this group")]
    DuplicateControl(String),

    #[error("no control named `{0}` in this group")]
    UnknownControl(String),
}

pub type FormResult<T> = Result<T, FormError>;
