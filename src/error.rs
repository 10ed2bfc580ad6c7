use thiserror::Error;

/// Domain error taxonomy shared by every backend adapter. Adapters translate
/// their storage-level failures into one of these kinds before the error
/// crosses into the service layer; services propagate them unchanged.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("validation failed: {0}")]
    Validation(String),
}

impl StoreError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Translate a sqlx error, logging the underlying cause with context.
    pub(crate) fn from_sqlx(err: sqlx::Error, context: &str) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound(context.to_string()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::Conflict(context.to_string())
            }
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                Self::NotFound(context.to_string())
            }
            _ => {
                tracing::error!(error = %err, "{context}");
                Self::Unavailable(context.to_string())
            }
        }
    }
}

impl From<validator::ValidationErrors> for StoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}
