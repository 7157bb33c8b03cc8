//! Conversion outcome state machine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of a failed conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The payload never reached the converter.
    ValidationRejected,
    /// The converter exited with a non-zero status.
    ConverterNonZeroExit,
    /// The converter failed to launch, was killed by a signal, or lied
    /// about producing output.
    ConverterCrashed,
    /// The converter exceeded the wall-clock timeout and was killed.
    ConverterTimedOut,
    /// Staging or artifact I/O failed.
    IoError,
    /// The surrounding request was cancelled mid-flight.
    Cancelled,
}

impl FailureKind {
    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationRejected => "validation_rejected",
            Self::ConverterNonZeroExit => "converter_non_zero_exit",
            Self::ConverterCrashed => "converter_crashed",
            Self::ConverterTimedOut => "converter_timed_out",
            Self::IoError => "io_error",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// State of one conversion request as it moves through orchestration.
///
/// Legal transitions: `Pending → Running → Succeeded | Failed`, plus
/// `Pending → Failed` when validation or staging rejects the request
/// before a process is spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionOutcome {
    /// Accepted, staging not yet complete.
    Pending,
    /// The converter process is running.
    Running,
    /// An artifact was produced and verified.
    Succeeded,
    /// Terminal failure.
    Failed(FailureKind),
}

impl ConversionOutcome {
    /// Check if the outcome is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed(_))
    }

    /// Whether a transition to `next` is legal.
    pub fn can_transition_to(&self, next: ConversionOutcome) -> bool {
        match (self, next) {
            (Self::Pending, Self::Running) => true,
            (Self::Pending, Self::Failed(_)) => true,
            (Self::Running, Self::Succeeded) => true,
            (Self::Running, Self::Failed(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ConversionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Running => write!(f, "running"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed(kind) => write!(f, "failed({kind})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!ConversionOutcome::Pending.is_terminal());
        assert!(!ConversionOutcome::Running.is_terminal());
        assert!(ConversionOutcome::Succeeded.is_terminal());
        assert!(ConversionOutcome::Failed(FailureKind::IoError).is_terminal());
    }

    #[test]
    fn test_legal_transitions() {
        let pending = ConversionOutcome::Pending;
        let running = ConversionOutcome::Running;
        assert!(pending.can_transition_to(running));
        assert!(pending.can_transition_to(ConversionOutcome::Failed(FailureKind::IoError)));
        assert!(running.can_transition_to(ConversionOutcome::Succeeded));
        assert!(
            running.can_transition_to(ConversionOutcome::Failed(FailureKind::ConverterTimedOut))
        );
    }

    #[test]
    fn test_illegal_transitions() {
        let succeeded = ConversionOutcome::Succeeded;
        assert!(!succeeded.can_transition_to(ConversionOutcome::Running));
        assert!(!ConversionOutcome::Pending.can_transition_to(ConversionOutcome::Succeeded));
        assert!(
            !ConversionOutcome::Failed(FailureKind::Cancelled)
                .can_transition_to(ConversionOutcome::Running)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ConversionOutcome::Failed(FailureKind::ConverterTimedOut).to_string(),
            "failed(converter_timed_out)"
        );
    }
}
