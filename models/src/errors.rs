// models/src/errors.rs

pub use thiserror::Error;

/// Rejections raised while turning user input into domain records.
///
/// The `Display` text of every variant is safe to show to the person who
/// submitted the form.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("Invalid age value")]
    InvalidAge,
    #[error("Age must be between 0 and 120")]
    AgeOutOfRange(i64),
    #[error("Invalid number format for bed counts")]
    InvalidBedCount(&'static str),
    #[error("Bed counts cannot be negative")]
    NegativeBedCount,
    #[error("Available beds cannot exceed total beds")]
    AvailableBedsExceedTotal,
    #[error("Available ICU beds cannot exceed total ICU beds")]
    AvailableIcuExceedsTotal,
    #[error("At least one specialty is required")]
    NoSpecialties,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("identifier '{0}' is invalid")]
    InvalidIdentifier(String),
    #[error("Unknown {kind}: {id}")]
    UnknownReference { kind: &'static str, id: String },
}

pub type ValidationResult<T> = Result<T, ValidationError>;
