use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

pub type CoreResult<T> = Result<T, CoreError>;

/// Error type shared by the ledger, scheduler, maintenance and storage layers.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid amount: {0} (must be greater than zero)")]
    InvalidAmount(Decimal),
    #[error("Unknown tenant: {0}")]
    InvalidTenant(Uuid),
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: Uuid },
    #[error("Invalid transition for {kind} {id}: {from} -> {to}")]
    InvalidTransition {
        kind: &'static str,
        id: Uuid,
        from: String,
        to: String,
    },
    #[error("Invalid rating: {0} (expected 1 to 5)")]
    InvalidRating(u8),
    #[error("Payment instrument declined")]
    InstrumentDeclined,
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CoreError {
    pub fn not_found(kind: &'static str, id: Uuid) -> Self {
        Self::NotFound { kind, id }
    }

    pub fn transition(
        kind: &'static str,
        id: Uuid,
        from: impl std::fmt::Debug,
        to: impl std::fmt::Debug,
    ) -> Self {
        Self::InvalidTransition {
            kind,
            id,
            from: format!("{from:?}"),
            to: format!("{to:?}"),
        }
    }

    /// True for failures raised by the storage collaborator.
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_) | Self::Io(_) | Self::Serde(_))
    }

    /// Short message suitable for showing next to a retry button.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "Enter an amount greater than zero.",
            Self::InvalidTenant(_) => "That tenant does not exist.",
            Self::NotFound { .. } => "The requested record could not be found.",
            Self::InvalidTransition { .. } => "That change is not allowed in the current state.",
            Self::InvalidRating(_) => "Choose a rating between 1 and 5.",
            Self::InstrumentDeclined => "The card details were declined.",
            Self::Validation(_) => "Some required details are missing or invalid.",
            Self::Persistence(_) | Self::Io(_) | Self::Serde(_) => {
                "Your changes could not be saved. Please try again."
            }
            Self::Config(_) => "The application configuration could not be read.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persistence_kinds_are_grouped() {
        let io = CoreError::from(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert!(io.is_persistence());
        assert!(CoreError::Persistence("locked".into()).is_persistence());
        assert!(!CoreError::InvalidRating(9).is_persistence());
        assert_eq!(io.user_message(), CoreError::Persistence(String::new()).user_message());
    }

    #[test]
    fn transition_error_names_both_states() {
        let id = Uuid::nil();
        let err = CoreError::transition("charge", id, "Paid", "Deactivated");
        let message = err.to_string();
        assert!(message.contains("charge"), "unexpected message: {message}");
        assert!(message.contains("Paid"), "unexpected message: {message}");
    }
}
