use sea_orm::error::DbErr;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

use crate::models::mto_shipment::ShipmentStatus;

/// Field-level validation failures, keyed by field name.
///
/// Ordered so that rendered messages are stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Merges another set into this one, keeping the messages of both.
    pub fn append(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            first = false;
            write!(f, "{}: {}", field, messages.join(", "))?;
        }
        Ok(())
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        for (field, errs) in errors.field_errors() {
            for err in errs.iter() {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                fields.add(field, message);
            }
        }
        fields
    }
}

/// An attempted shipment status change that the state machine does not allow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictStatusError {
    pub id: Uuid,
    pub from: ShipmentStatus,
    pub to: ShipmentStatus,
    pub allowed_from: Vec<ShipmentStatus>,
}

impl fmt::Display for ConflictStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let allowed = self
            .allowed_from
            .iter()
            .map(|s| format!("\"{}\"", s))
            .collect::<Vec<_>>()
            .join(", ");
        write!(
            f,
            "Shipment with id '{}' can only transition to status '{}' from [{}], but its current status is '{}'",
            self.id, self.to, allowed, self.from
        )
    }
}

impl std::error::Error for ConflictStatusError {}

#[derive(Debug, thiserror::Error, Serialize)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(
        #[from]
        #[serde(skip)]
        DbErr,
    ),

    #[error("Not found: id {id}: {context}")]
    NotFound { id: Uuid, context: String },

    #[error("Precondition failed: id {id}: {message}")]
    PreconditionFailed { id: Uuid, message: String },

    #[error("Invalid input: id {id}: {message}: {errors}")]
    InvalidInput {
        id: Uuid,
        message: String,
        errors: FieldErrors,
    },

    #[error("{0}")]
    ConflictStatus(ConflictStatusError),

    #[error("Conflict: id {id}: {message}")]
    Conflict { id: Uuid, message: String },

    #[error("Forbidden: id {id}: {message}")]
    Forbidden { id: Uuid, message: String },

    #[error("Unprocessable: id {id}: {message}")]
    Unprocessable { id: Uuid, message: String },

    #[error("Event error: {0}")]
    EventError(String),
}

impl From<ConflictStatusError> for ServiceError {
    fn from(err: ConflictStatusError) -> Self {
        ServiceError::ConflictStatus(err)
    }
}

pub trait IntoDbErr {
    fn into_db_err(self) -> DbErr;
}

impl IntoDbErr for DbErr {
    fn into_db_err(self) -> DbErr {
        self
    }
}

impl IntoDbErr for String {
    fn into_db_err(self) -> DbErr {
        DbErr::Custom(self)
    }
}

impl IntoDbErr for &str {
    fn into_db_err(self) -> DbErr {
        DbErr::Custom(self.to_string())
    }
}

impl ServiceError {
    /// Generic constructor that normalizes any supported database error input.
    pub fn db_error<E: IntoDbErr>(error: E) -> Self {
        ServiceError::DatabaseError(error.into_db_err())
    }

    pub fn not_found(id: Uuid, context: impl Into<String>) -> Self {
        ServiceError::NotFound {
            id,
            context: context.into(),
        }
    }

    pub fn precondition_failed(id: Uuid, message: impl Into<String>) -> Self {
        ServiceError::PreconditionFailed {
            id,
            message: message.into(),
        }
    }

    pub fn invalid_input(id: Uuid, errors: FieldErrors, message: impl Into<String>) -> Self {
        ServiceError::InvalidInput {
            id,
            message: message.into(),
            errors,
        }
    }

    pub fn conflict(id: Uuid, message: impl Into<String>) -> Self {
        ServiceError::Conflict {
            id,
            message: message.into(),
        }
    }

    pub fn forbidden(id: Uuid, message: impl Into<String>) -> Self {
        ServiceError::Forbidden {
            id,
            message: message.into(),
        }
    }

    pub fn unprocessable(id: Uuid, message: impl Into<String>) -> Self {
        ServiceError::Unprocessable {
            id,
            message: message.into(),
        }
    }

    /// Maps a failed write to the right error kind.
    ///
    /// Guarded updates filter on the last-modified timestamp that was read, so
    /// `RecordNotUpdated` means somebody else wrote the row in between.
    pub fn from_write(id: Uuid, error: DbErr) -> Self {
        match error {
            DbErr::RecordNotUpdated => ServiceError::precondition_failed(
                id,
                "record was modified by another request",
            ),
            other => ServiceError::db_error(other),
        }
    }

    /// HTTP status an outer API layer should report for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::PreconditionFailed { .. } => 412,
            Self::InvalidInput { .. } => 422,
            Self::ConflictStatus(_) | Self::Conflict { .. } => 409,
            Self::Forbidden { .. } => 403,
            Self::Unprocessable { .. } => 422,
            Self::DatabaseError(_) | Self::EventError(_) => 500,
        }
    }

    /// Returns the error message suitable for callers outside the service.
    /// Internal errors return generic messages to avoid leaking implementation details.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(_) => "Database error".to_string(),
            Self::EventError(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }

    /// Field errors carried by an `InvalidInput`, if any.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::InvalidInput { errors, .. } => Some(errors),
            _ => None,
        }
    }
}
