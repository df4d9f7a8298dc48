//! Cycle scheduling status and its monotonic transition rule.

use crate::error::CoreError;

/// Wire values stored in the `status` column of `stage_cycles`.
pub const STATUS_PLANNED: &str = "planned";
pub const STATUS_IN_PROGRESS: &str = "in_progress";
pub const STATUS_FINISHED: &str = "finished";

/// Scheduling status of a cycle.
///
/// Transitions are monotonic: `planned -> in_progress -> finished`.
/// Skipping forward (planned straight to finished) is allowed; moving
/// backward never is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CycleStatus {
    Planned,
    InProgress,
    Finished,
}

impl CycleStatus {
    /// The wire/database representation.
    pub fn as_str(self) -> &'static str {
        match self {
            CycleStatus::Planned => STATUS_PLANNED,
            CycleStatus::InProgress => STATUS_IN_PROGRESS,
            CycleStatus::Finished => STATUS_FINISHED,
        }
    }

    /// Parse a wire/database value.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            STATUS_PLANNED => Ok(CycleStatus::Planned),
            STATUS_IN_PROGRESS => Ok(CycleStatus::InProgress),
            STATUS_FINISHED => Ok(CycleStatus::Finished),
            other => Err(CoreError::Validation(format!(
                "Unknown cycle status: {other}"
            ))),
        }
    }

    /// Whether the cycle accepts or hosts participants (planned or
    /// in progress). Finished cycles are excluded from the active listing.
    pub fn is_active(self) -> bool {
        self != CycleStatus::Finished
    }

    /// Monotonic transition check. Staying put is allowed so partial
    /// updates that resend the current status are not rejected.
    pub fn can_transition(self, next: CycleStatus) -> bool {
        next >= self
    }

    /// Validate a transition, mapping a regression to [`CoreError::Conflict`].
    pub fn ensure_transition(self, next: CycleStatus) -> Result<(), CoreError> {
        if self.can_transition(next) {
            Ok(())
        } else {
            Err(CoreError::Conflict(format!(
                "Cycle status cannot move backward from '{}' to '{}'",
                self.as_str(),
                next.as_str()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn forward_transitions_allowed() {
        assert!(CycleStatus::Planned.can_transition(CycleStatus::InProgress));
        assert!(CycleStatus::Planned.can_transition(CycleStatus::Finished));
        assert!(CycleStatus::InProgress.can_transition(CycleStatus::Finished));
    }

    #[test]
    fn backward_transitions_rejected() {
        assert!(!CycleStatus::Finished.can_transition(CycleStatus::Planned));
        assert!(!CycleStatus::Finished.can_transition(CycleStatus::InProgress));
        assert!(!CycleStatus::InProgress.can_transition(CycleStatus::Planned));

        let err = CycleStatus::Finished
            .ensure_transition(CycleStatus::Planned)
            .unwrap_err();
        assert_matches!(err, CoreError::Conflict(_));
    }

    #[test]
    fn resending_current_status_is_a_no_op() {
        for status in [
            CycleStatus::Planned,
            CycleStatus::InProgress,
            CycleStatus::Finished,
        ] {
            assert!(status.can_transition(status));
        }
    }

    #[test]
    fn finished_cycles_are_not_active() {
        assert!(CycleStatus::Planned.is_active());
        assert!(CycleStatus::InProgress.is_active());
        assert!(!CycleStatus::Finished.is_active());
    }
}
