use thiserror::Error;

/// Unified error type for database operations that application code can handle
#[derive(Error, Debug)]
pub enum DbError {
    /// Entity not found by the given identifier
    #[error("Entity not found")]
    NotFound,

    /// Unique constraint violation
    #[error("Unique constraint violation")]
    UniqueViolation {
        constraint: Option<String>,
        table: Option<String>,
        message: String,
    },

    /// Foreign key constraint violation
    #[error("Foreign key constraint violation")]
    ForeignKeyViolation {
        constraint: Option<String>,
        table: Option<String>,
        message: String,
    },

    /// Check constraint violation
    #[error("Check constraint violation")]
    CheckViolation {
        constraint: Option<String>,
        table: Option<String>,
        message: String,
    },

    /// Catch-all for non-recoverable errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convert from sqlx::Error using sqlx's own error categorization
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => DbError::NotFound,
            sqlx::Error::Database(db_err) => {
                let constraint = db_err.constraint().map(|s| s.to_string());
                let table = db_err.table().map(|s| s.to_string());
                let message = db_err.message().to_string();

                if db_err.is_unique_violation() {
                    DbError::UniqueViolation { constraint, table, message }
                } else if db_err.is_foreign_key_violation() {
                    DbError::ForeignKeyViolation { constraint, table, message }
                } else if db_err.is_check_violation() {
                    DbError::CheckViolation { constraint, table, message }
                } else {
                    DbError::Other(anyhow::Error::from(err))
                }
            }
            _ => DbError::Other(anyhow::Error::from(err)),
        }
    }
}

impl DbError {
    /// Human readable description of a unique violation, keyed on the constraint that fired
    pub fn conflict_message(&self) -> Option<&'static str> {
        match self {
            DbError::UniqueViolation { constraint, .. } => Some(match constraint.as_deref() {
                Some("companies_slug_unique") => "A company with this slug already exists",
                Some("recruiters_email_unique") => "An account with this email address already exists",
                _ => "Resource already exists",
            }),
            _ => None,
        }
    }
}

/// Type alias for database operation results
pub type Result<T> = std::result::Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        assert!(matches!(DbError::from(sqlx::Error::RowNotFound), DbError::NotFound));
    }

    #[test]
    fn test_conflict_message_by_constraint() {
        let slug = DbError::UniqueViolation {
            constraint: Some("companies_slug_unique".to_string()),
            table: Some("companies".to_string()),
            message: "duplicate key".to_string(),
        };
        assert_eq!(slug.conflict_message(), Some("A company with this slug already exists"));

        let unknown = DbError::UniqueViolation {
            constraint: None,
            table: None,
            message: "duplicate key".to_string(),
        };
        assert_eq!(unknown.conflict_message(), Some("Resource already exists"));
        assert_eq!(DbError::NotFound.conflict_message(), None);
    }
}
