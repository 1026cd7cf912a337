//! Progress and streak aggregation over a program's days.

use super::model::{DayStatus, ProgressSummary, UserDay, UserProgram};

/// Leading COMPLETED days counted from the highest day number down.
///
/// `statuses` is in ascending day order. Counting stops at the first day that
/// is not COMPLETED, so an OPEN or LOCKED last day gives zero.
pub fn current_streak(statuses: &[DayStatus]) -> u32 {
    statuses
        .iter()
        .rev()
        .take_while(|s| **s == DayStatus::Completed)
        .count() as u32
}

/// `completed / total * 100`, rounded to two decimals. Zero for an empty program.
pub fn completion_percentage(completed: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let pct = f64::from(completed) / f64::from(total) * 100.0;
    (pct * 100.0).round() / 100.0
}

pub fn summarize(program: &UserProgram, days: &[UserDay]) -> ProgressSummary {
    let mut ordered: Vec<&UserDay> = days.iter().collect();
    ordered.sort_by_key(|d| d.day_number);
    let statuses: Vec<DayStatus> = ordered.iter().map(|d| d.status).collect();

    let count = |wanted: DayStatus| statuses.iter().filter(|s| **s == wanted).count() as u32;
    let completed_days = count(DayStatus::Completed);

    ProgressSummary {
        total_days: program.total_days,
        completed_days,
        skipped_days: count(DayStatus::Skipped),
        current_streak: current_streak(&statuses),
        completion_percentage: completion_percentage(completed_days, program.total_days),
        current_day: ordered
            .iter()
            .find(|d| d.status == DayStatus::Open)
            .map(|d| d.day_number),
        used_skips: program.used_skips,
        allowed_skips: program.allowed_skips,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;
    use crate::tracker::model::DayStatus::{Completed as C, Locked as L, Open as O, Skipped as S};
    use crate::tracker::model::ProgramStatus;

    fn program(total_days: u32) -> UserProgram {
        UserProgram {
            id: 1,
            user_id: 1,
            template_id: 1,
            status: ProgramStatus::Active,
            started_at: Utc::now(),
            finished_at: None,
            allowed_skips: 3,
            used_skips: 1,
            total_days,
        }
    }

    fn days(statuses: &[DayStatus]) -> Vec<UserDay> {
        statuses
            .iter()
            .enumerate()
            .map(|(i, status)| UserDay {
                id: i as i64 + 1,
                user_program_id: 1,
                day_number: i as u32 + 1,
                status: *status,
                opened_at: None,
                closed_at: None,
            })
            .collect()
    }

    #[test]
    fn streak_stops_at_skipped_day() {
        // Latest first: C, C, S, C
        assert_eq!(current_streak(&[C, S, C, C]), 2);
    }

    #[test]
    fn streak_stops_at_unresolved_last_day() {
        assert_eq!(current_streak(&[C, C, C, O, L, L]), 0);
        assert_eq!(current_streak(&[C, C, O, L]), 0);
        assert_eq!(current_streak(&[C, C, C, O]), 0);
        assert_eq!(current_streak(&[O, L, L]), 0);
        assert_eq!(current_streak(&[]), 0);
    }

    #[test]
    fn streak_counts_only_trailing_completed_run() {
        assert_eq!(current_streak(&[O, C, C]), 2);
        assert_eq!(current_streak(&[C, L, C, C, C]), 3);
        assert_eq!(current_streak(&[C, C, C]), 3);
    }

    #[test]
    fn percentage_rounds_to_two_decimals() {
        assert_eq!(completion_percentage(29, 30), 96.67);
        assert_eq!(completion_percentage(1, 3), 33.33);
        assert_eq!(completion_percentage(30, 30), 100.0);
        assert_eq!(completion_percentage(0, 0), 0.0);
    }

    #[test]
    fn summary_counts_and_current_day() {
        let summary = summarize(&program(5), &days(&[C, S, C, O, L]));
        assert_eq!(summary.total_days, 5);
        assert_eq!(summary.completed_days, 2);
        assert_eq!(summary.skipped_days, 1);
        assert_eq!(summary.current_streak, 0);
        assert_eq!(summary.current_day, Some(4));
        assert_eq!(summary.completion_percentage, 40.0);
        assert_eq!(summary.used_skips, 1);
        assert_eq!(summary.allowed_skips, 3);
    }

    #[test]
    fn summary_is_order_independent() {
        let mut shuffled = days(&[O, C, C]);
        shuffled.reverse();
        let summary = summarize(&program(3), &shuffled);
        assert_eq!(summary.current_streak, 2);
        assert_eq!(summary.current_day, Some(1));
    }

    fn status() -> impl Strategy<Value = DayStatus> {
        prop_oneof![Just(L), Just(O), Just(C), Just(S)]
    }

    proptest! {
        #[test]
        fn summary_stays_within_bounds(statuses in prop::collection::vec(status(), 0..40)) {
            let total = statuses.len() as u32;
            let summary = summarize(&program(total), &days(&statuses));
            prop_assert!(summary.completed_days + summary.skipped_days <= total);
            prop_assert!(summary.current_streak <= summary.completed_days);
            prop_assert!((0.0..=100.0).contains(&summary.completion_percentage));
        }

        #[test]
        fn streak_never_crosses_a_skip(prefix in prop::collection::vec(status(), 0..20), run in 0usize..10) {
            let mut statuses = prefix;
            statuses.push(S);
            statuses.extend(std::iter::repeat(C).take(run));
            prop_assert_eq!(current_streak(&statuses), run as u32);
        }
    }
}
