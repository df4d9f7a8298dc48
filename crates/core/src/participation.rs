//! Participation lifecycle state machine.
//!
//! Every status change to a `stage_participations` row must pass through
//! [`ParticipationStatus::can_transition`]. The rules were previously
//! scattered across UI conditionals; this is the single authoritative
//! transition table.

use crate::error::CoreError;

/// Wire values stored in the `status` column of `stage_participations`.
pub const STATUS_ENROLLED: &str = "enrolled";
pub const STATUS_IN_PROGRESS: &str = "in_progress";
pub const STATUS_APPROVED: &str = "approved";
pub const STATUS_REPROVED: &str = "reproved";
pub const STATUS_WITHDRAWN: &str = "withdrawn";
pub const STATUS_TRANSFERRED: &str = "transferred";

/// Lifecycle status of a user's participation in a cycle.
///
/// ```text
/// enrolled ──> in_progress ──> approved | reproved
///     │             │
///     └─────────────┴────────> withdrawn | transferred
/// ```
///
/// `approved`, `reproved`, `withdrawn`, and `transferred` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticipationStatus {
    Enrolled,
    InProgress,
    Approved,
    Reproved,
    Withdrawn,
    Transferred,
}

impl ParticipationStatus {
    /// All statuses, in lifecycle order. Used by the stats overview so
    /// every status appears in the breakdown even when its count is zero.
    pub const ALL: [ParticipationStatus; 6] = [
        ParticipationStatus::Enrolled,
        ParticipationStatus::InProgress,
        ParticipationStatus::Approved,
        ParticipationStatus::Reproved,
        ParticipationStatus::Withdrawn,
        ParticipationStatus::Transferred,
    ];

    /// The wire/database representation.
    pub fn as_str(self) -> &'static str {
        match self {
            ParticipationStatus::Enrolled => STATUS_ENROLLED,
            ParticipationStatus::InProgress => STATUS_IN_PROGRESS,
            ParticipationStatus::Approved => STATUS_APPROVED,
            ParticipationStatus::Reproved => STATUS_REPROVED,
            ParticipationStatus::Withdrawn => STATUS_WITHDRAWN,
            ParticipationStatus::Transferred => STATUS_TRANSFERRED,
        }
    }

    /// Parse a wire/database value.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            STATUS_ENROLLED => Ok(ParticipationStatus::Enrolled),
            STATUS_IN_PROGRESS => Ok(ParticipationStatus::InProgress),
            STATUS_APPROVED => Ok(ParticipationStatus::Approved),
            STATUS_REPROVED => Ok(ParticipationStatus::Reproved),
            STATUS_WITHDRAWN => Ok(ParticipationStatus::Withdrawn),
            STATUS_TRANSFERRED => Ok(ParticipationStatus::Transferred),
            other => Err(CoreError::Validation(format!(
                "Unknown participation status: {other}"
            ))),
        }
    }

    /// Whether the participation is still underway (counts toward the
    /// user's current stage, blocks re-enrollment UI, etc.).
    pub fn is_active(self) -> bool {
        matches!(
            self,
            ParticipationStatus::Enrolled | ParticipationStatus::InProgress
        )
    }

    /// Whether the participation has reached a final outcome.
    pub fn is_terminal(self) -> bool {
        !self.is_active()
    }

    /// Whether the status carries a completion date.
    ///
    /// `completion_date` is set if and only if the participation was
    /// evaluated (approved or reproved).
    pub fn is_evaluated(self) -> bool {
        matches!(
            self,
            ParticipationStatus::Approved | ParticipationStatus::Reproved
        )
    }

    /// The central transition-validation function.
    ///
    /// Both active states may move to any terminal state; `enrolled` may
    /// additionally move to `in_progress`. Terminal states accept nothing.
    pub fn can_transition(self, next: ParticipationStatus) -> bool {
        match self {
            ParticipationStatus::Enrolled => next != ParticipationStatus::Enrolled,
            ParticipationStatus::InProgress => next.is_terminal(),
            _ => false,
        }
    }

    /// Validate a transition, mapping a violation to [`CoreError::Conflict`].
    pub fn ensure_transition(self, next: ParticipationStatus) -> Result<(), CoreError> {
        if self.can_transition(next) {
            Ok(())
        } else {
            Err(CoreError::Conflict(format!(
                "Cannot transition participation from '{}' to '{}'",
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
    fn enrolled_can_start_or_finish() {
        let from = ParticipationStatus::Enrolled;
        assert!(from.can_transition(ParticipationStatus::InProgress));
        assert!(from.can_transition(ParticipationStatus::Approved));
        assert!(from.can_transition(ParticipationStatus::Reproved));
        assert!(from.can_transition(ParticipationStatus::Withdrawn));
        assert!(from.can_transition(ParticipationStatus::Transferred));
        assert!(!from.can_transition(ParticipationStatus::Enrolled));
    }

    #[test]
    fn in_progress_cannot_go_back_to_enrolled() {
        let from = ParticipationStatus::InProgress;
        assert!(!from.can_transition(ParticipationStatus::Enrolled));
        assert!(!from.can_transition(ParticipationStatus::InProgress));
        assert!(from.can_transition(ParticipationStatus::Approved));
        assert!(from.can_transition(ParticipationStatus::Withdrawn));
    }

    #[test]
    fn terminal_states_accept_nothing() {
        for from in [
            ParticipationStatus::Approved,
            ParticipationStatus::Reproved,
            ParticipationStatus::Withdrawn,
            ParticipationStatus::Transferred,
        ] {
            for next in ParticipationStatus::ALL {
                assert!(
                    !from.can_transition(next),
                    "{} -> {} must be rejected",
                    from.as_str(),
                    next.as_str()
                );
            }
        }
    }

    #[test]
    fn ensure_transition_maps_to_conflict() {
        let err = ParticipationStatus::Approved
            .ensure_transition(ParticipationStatus::Reproved)
            .unwrap_err();
        assert_matches!(err, CoreError::Conflict(_));
    }

    #[test]
    fn parse_round_trips_all_statuses() {
        for status in ParticipationStatus::ALL {
            assert_eq!(ParticipationStatus::parse(status.as_str()).unwrap(), status);
        }
        assert_matches!(
            ParticipationStatus::parse("bogus"),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn completion_date_rule_matches_evaluated_states() {
        assert!(ParticipationStatus::Approved.is_evaluated());
        assert!(ParticipationStatus::Reproved.is_evaluated());
        assert!(!ParticipationStatus::Withdrawn.is_evaluated());
        assert!(!ParticipationStatus::Enrolled.is_evaluated());
    }
}
