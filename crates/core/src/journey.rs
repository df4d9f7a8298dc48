//! Journey aggregation: fold a user's participation history into the
//! summary figures shown on their formation dashboard.
//!
//! The fold is deterministic over its inputs, so fetching the same
//! journey twice without intervening writes yields identical summaries.

use std::collections::HashSet;

use crate::participation::ParticipationStatus;
use crate::types::DbId;

/// The facts the fold needs about one participation, in display order
/// (stage order ascending, then enrollment date). The caller is
/// responsible for the ordering; repositories return rows pre-sorted.
#[derive(Debug, Clone)]
pub struct ParticipationFact {
    pub stage_id: Option<DbId>,
    pub stage_name: Option<String>,
    pub cycle_name: Option<String>,
    pub status: ParticipationStatus,
}

/// Aggregated journey figures for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JourneyStats {
    /// Name of the stage the user is currently working through (the last
    /// active participation in stage order), if any.
    pub current_stage: Option<String>,
    /// Name of the cycle hosting that active participation.
    pub current_cycle: Option<String>,
    /// Number of distinct stages with an approved participation.
    pub total_stages_completed: i64,
    /// `round(completed / total_catalog_stages * 100)`, clamped to [0, 100].
    pub journey_progress_percent: i32,
}

/// Fold participation facts against the catalog size.
///
/// A stage counts as completed once, no matter how many approved
/// participations the user has in its cycles (re-enrollment in a later
/// cycle of the same stage is legal).
pub fn summarize(facts: &[ParticipationFact], total_catalog_stages: i64) -> JourneyStats {
    let mut completed_stages: HashSet<DbId> = HashSet::new();
    let mut current_stage = None;
    let mut current_cycle = None;

    for fact in facts {
        if fact.status == ParticipationStatus::Approved {
            if let Some(stage_id) = fact.stage_id {
                completed_stages.insert(stage_id);
            }
        }
        if fact.status.is_active() {
            current_stage = fact.stage_name.clone();
            current_cycle = fact.cycle_name.clone();
        }
    }

    let total_stages_completed = completed_stages.len() as i64;

    JourneyStats {
        current_stage,
        current_cycle,
        total_stages_completed,
        journey_progress_percent: progress_percent(total_stages_completed, total_catalog_stages),
    }
}

/// Percentage of the catalog completed, rounded to the nearest integer
/// and clamped to [0, 100]. Returns 0 for an empty catalog.
pub fn progress_percent(completed: i64, total_catalog_stages: i64) -> i32 {
    if total_catalog_stages <= 0 {
        return 0;
    }
    let pct = (completed as f64 / total_catalog_stages as f64 * 100.0).round() as i32;
    pct.clamp(0, 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fact(stage_id: DbId, stage: &str, cycle: &str, status: ParticipationStatus) -> ParticipationFact {
        ParticipationFact {
            stage_id: Some(stage_id),
            stage_name: Some(stage.to_string()),
            cycle_name: Some(cycle.to_string()),
            status,
        }
    }

    #[test]
    fn two_of_four_stages_is_fifty_percent() {
        let facts = vec![
            fact(1, "Aspirantado", "Turma 2023", ParticipationStatus::Approved),
            fact(2, "Postulantado", "Turma 2024", ParticipationStatus::Approved),
            fact(3, "Noviciado", "Turma 2025", ParticipationStatus::Enrolled),
        ];
        let stats = summarize(&facts, 4);
        assert_eq!(stats.total_stages_completed, 2);
        assert_eq!(stats.journey_progress_percent, 50);
        assert_eq!(stats.current_stage.as_deref(), Some("Noviciado"));
        assert_eq!(stats.current_cycle.as_deref(), Some("Turma 2025"));
    }

    #[test]
    fn no_completions_is_zero_percent() {
        let facts = vec![fact(1, "Aspirantado", "Turma 2025", ParticipationStatus::Enrolled)];
        let stats = summarize(&facts, 4);
        assert_eq!(stats.total_stages_completed, 0);
        assert_eq!(stats.journey_progress_percent, 0);
    }

    #[test]
    fn empty_catalog_yields_zero_not_a_division_error() {
        let stats = summarize(&[], 0);
        assert_eq!(stats.journey_progress_percent, 0);
        assert_eq!(stats.current_stage, None);
    }

    #[test]
    fn percent_is_clamped_to_one_hundred() {
        // More completed stages than the catalog currently holds can
        // happen when stages are deleted after approval.
        assert_eq!(progress_percent(5, 4), 100);
        assert_eq!(progress_percent(-1, 4), 0);
    }

    #[test]
    fn percent_rounds_to_nearest() {
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 67);
    }

    #[test]
    fn repeated_approvals_of_same_stage_count_once() {
        let facts = vec![
            fact(1, "Aspirantado", "Turma 2023", ParticipationStatus::Approved),
            fact(1, "Aspirantado", "Turma 2024", ParticipationStatus::Approved),
        ];
        let stats = summarize(&facts, 4);
        assert_eq!(stats.total_stages_completed, 1);
        assert_eq!(stats.journey_progress_percent, 25);
    }

    #[test]
    fn reproved_and_withdrawn_do_not_complete_or_block() {
        let facts = vec![
            fact(1, "Aspirantado", "Turma 2023", ParticipationStatus::Reproved),
            fact(1, "Aspirantado", "Turma 2024", ParticipationStatus::Withdrawn),
        ];
        let stats = summarize(&facts, 4);
        assert_eq!(stats.total_stages_completed, 0);
        assert_eq!(stats.current_stage, None);
    }

    #[test]
    fn fold_is_deterministic() {
        let facts = vec![
            fact(1, "Aspirantado", "Turma 2023", ParticipationStatus::Approved),
            fact(2, "Postulantado", "Turma 2024", ParticipationStatus::InProgress),
        ];
        assert_eq!(summarize(&facts, 4), summarize(&facts, 4));
    }
}
