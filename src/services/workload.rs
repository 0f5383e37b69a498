//! Workload analytics engine
//!
//! Pure read-side aggregation over the request store. Metrics are always
//! recomputed from request rows; the denormalized active_request_count on
//! staff is treated as a cache and never read here.

use uuid::Uuid;

use crate::{
    api::workload::{StaffTaskCounts, StaffWorkload, StaffWorkloadDetail, WorkloadOverview},
    error::AppResult,
    models::enums::{RequestStatus, Role, StaffStatus},
    repository::{requests::RequestOutcome, Repository},
};

#[derive(Clone)]
pub struct WorkloadService {
    repository: Repository,
}

impl WorkloadService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// System-wide summary: totals, average completion time, efficiency
    pub async fn system_summary(&self) -> AppResult<WorkloadOverview> {
        let outcomes = self.repository.requests.fetch_outcomes().await?;
        Ok(summarize_system(&outcomes))
    }

    /// Per-staff metrics for every member matching the optional filters
    pub async fn staff_summary(
        &self,
        role: Option<Role>,
        status: Option<StaffStatus>,
    ) -> AppResult<Vec<StaffWorkload>> {
        let members = self.repository.staff.list(role, status).await?;
        let outcomes = self.repository.requests.fetch_outcomes().await?;

        let summaries = members
            .into_iter()
            .map(|member| {
                let (tasks, completion_rate, avg_time_minutes, efficiency_score) =
                    user_metrics(&outcomes, member.id);
                StaffWorkload {
                    id: member.id,
                    employee_code: member.employee_code,
                    full_name: member.full_name,
                    role: member.role,
                    phone: member.phone,
                    current_status: member.current_status,
                    current_floor_id: member.current_floor_id,
                    tasks,
                    completion_rate,
                    efficiency_score,
                    avg_time_minutes,
                }
            })
            .collect();

        Ok(summaries)
    }

    /// Raw statuses of requests assigned to one user (dashboard counters)
    pub async fn assigned_statuses(&self, user_id: Uuid) -> AppResult<Vec<RequestStatus>> {
        self.repository.requests.fetch_assigned_statuses(user_id).await
    }

    /// Metrics for one staff member plus their 10 most recent requests
    pub async fn staff_detail(&self, user_id: Uuid) -> AppResult<StaffWorkloadDetail> {
        let member = self.repository.staff.get_by_id(user_id).await?;
        let outcomes = self.repository.requests.fetch_outcomes().await?;
        let recent_tasks = self
            .repository
            .requests
            .list_involving(user_id, Some(10))
            .await?;

        let (tasks, completion_rate, avg_time_minutes, efficiency_score) =
            user_metrics(&outcomes, member.id);

        Ok(StaffWorkloadDetail {
            staff: member,
            tasks,
            completion_rate,
            efficiency_score,
            avg_time_minutes,
            recent_tasks,
        })
    }
}

fn involves(outcome: &RequestOutcome, user_id: Uuid) -> bool {
    outcome.requested_by == user_id || outcome.assigned_to == Some(user_id)
}

/// Minutes from creation to completion; None for anything not completed
fn completion_minutes(outcome: &RequestOutcome) -> Option<f64> {
    match (outcome.status, outcome.completed_at) {
        (RequestStatus::Completed, Some(completed_at)) => {
            Some((completed_at - outcome.created_at).num_milliseconds() as f64 / 60_000.0)
        }
        _ => None,
    }
}

/// Rounded mean completion time in minutes; 0 when nothing completed
fn avg_completion_minutes<'a>(outcomes: impl Iterator<Item = &'a RequestOutcome>) -> i64 {
    let durations: Vec<f64> = outcomes.filter_map(completion_minutes).collect();
    if durations.is_empty() {
        return 0;
    }
    (durations.iter().sum::<f64>() / durations.len() as f64).round() as i64
}

/// completed / (completed + cancelled), as a rounded percentage.
/// A cold start with nothing handled counts as 100, not an error.
fn completion_rate(completed: i64, cancelled: i64) -> i64 {
    let handled = completed + cancelled;
    if handled == 0 {
        return 100;
    }
    (completed as f64 / handled as f64 * 100.0).round() as i64
}

/// Blended score: 70% completion rate, 30% speed, clamped to [0, 100]
fn efficiency_score(completion_rate: i64, avg_time_minutes: i64) -> i64 {
    let speed = (100 - avg_time_minutes).max(0) as f64;
    (completion_rate as f64 * 0.7 + speed * 0.3).round() as i64
}

fn bucket_counts<'a>(outcomes: impl Iterator<Item = &'a RequestOutcome>) -> StaffTaskCounts {
    let mut counts = StaffTaskCounts::default();
    for outcome in outcomes {
        counts.total += 1;
        match outcome.status {
            RequestStatus::Completed => counts.completed += 1,
            RequestStatus::InProgress | RequestStatus::Assigned => counts.active += 1,
            RequestStatus::Pending | RequestStatus::Queued => counts.pending += 1,
            RequestStatus::Cancelled => counts.cancelled += 1,
        }
    }
    counts
}

fn user_metrics(
    outcomes: &[RequestOutcome],
    user_id: Uuid,
) -> (StaffTaskCounts, i64, i64, i64) {
    let tasks = bucket_counts(outcomes.iter().filter(|o| involves(o, user_id)));
    let rate = completion_rate(tasks.completed, tasks.cancelled);
    let avg = avg_completion_minutes(outcomes.iter().filter(|o| involves(o, user_id)));
    let score = efficiency_score(rate, avg).clamp(0, 100);
    (tasks, rate, avg, score)
}

fn summarize_system(outcomes: &[RequestOutcome]) -> WorkloadOverview {
    let total_tasks = outcomes.len() as i64;
    let completed = outcomes
        .iter()
        .filter(|o| o.status == RequestStatus::Completed)
        .count() as i64;
    let cancelled = outcomes
        .iter()
        .filter(|o| o.status == RequestStatus::Cancelled)
        .count() as i64;

    WorkloadOverview {
        total_tasks,
        completed,
        avg_time_minutes: avg_completion_minutes(outcomes.iter()),
        efficiency: completion_rate(completed, cancelled),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn outcome(
        status: RequestStatus,
        user_id: Uuid,
        duration_minutes: Option<i64>,
    ) -> RequestOutcome {
        let created_at = Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap();
        RequestOutcome {
            status,
            requested_by: user_id,
            assigned_to: None,
            created_at,
            completed_at: duration_minutes.map(|m| created_at + Duration::minutes(m)),
        }
    }

    #[test]
    fn test_empty_system_summary() {
        let summary = summarize_system(&[]);
        assert_eq!(summary.total_tasks, 0);
        assert_eq!(summary.completed, 0);
        assert_eq!(summary.avg_time_minutes, 0);
        assert_eq!(summary.efficiency, 100);
    }

    #[test]
    fn test_completion_rate_cold_start_is_100() {
        assert_eq!(completion_rate(0, 0), 100);
    }

    #[test]
    fn test_completion_rate_rounding() {
        assert_eq!(completion_rate(3, 1), 75);
        assert_eq!(completion_rate(1, 2), 33);
        assert_eq!(completion_rate(2, 1), 67);
    }

    #[test]
    fn test_avg_ignores_incomplete_requests() {
        let user = Uuid::new_v4();
        let outcomes = vec![
            outcome(RequestStatus::Completed, user, Some(10)),
            outcome(RequestStatus::Completed, user, Some(30)),
            outcome(RequestStatus::InProgress, user, None),
            outcome(RequestStatus::Cancelled, user, None),
        ];
        assert_eq!(avg_completion_minutes(outcomes.iter()), 20);
    }

    #[test]
    fn test_efficiency_score_worked_example() {
        // 3 completed at 10/20/30 minutes, 1 cancelled:
        // rate 75, avg 20, score = round(0.7*75 + 0.3*80) = 77
        let user = Uuid::new_v4();
        let outcomes = vec![
            outcome(RequestStatus::Completed, user, Some(10)),
            outcome(RequestStatus::Completed, user, Some(20)),
            outcome(RequestStatus::Completed, user, Some(30)),
            outcome(RequestStatus::Cancelled, user, None),
        ];
        let (tasks, rate, avg, score) = user_metrics(&outcomes, user);
        assert_eq!(tasks.completed, 3);
        assert_eq!(tasks.cancelled, 1);
        assert_eq!(rate, 75);
        assert_eq!(avg, 20);
        assert_eq!(score, 77);
    }

    #[test]
    fn test_efficiency_score_slow_worker_floors_speed_term() {
        // 200-minute average turns the speed term to 0, not negative
        assert_eq!(efficiency_score(100, 200), 70);
    }

    #[test]
    fn test_bucket_counts() {
        let user = Uuid::new_v4();
        let outcomes = vec![
            outcome(RequestStatus::Pending, user, None),
            outcome(RequestStatus::Queued, user, None),
            outcome(RequestStatus::Assigned, user, None),
            outcome(RequestStatus::InProgress, user, None),
            outcome(RequestStatus::Completed, user, Some(5)),
            outcome(RequestStatus::Cancelled, user, None),
        ];
        let counts = bucket_counts(outcomes.iter());
        assert_eq!(counts.pending, 2);
        assert_eq!(counts.active, 2);
        assert_eq!(counts.completed, 1);
        assert_eq!(counts.cancelled, 1);
        assert_eq!(counts.total, 6);
    }

    #[test]
    fn test_user_metrics_scoped_to_involvement() {
        let user = Uuid::new_v4();
        let other = Uuid::new_v4();
        let mut assigned = outcome(RequestStatus::Completed, other, Some(40));
        assigned.assigned_to = Some(user);
        let outcomes = vec![
            outcome(RequestStatus::Completed, user, Some(20)),
            assigned,
            outcome(RequestStatus::Completed, other, Some(90)),
        ];
        let (tasks, _, avg, _) = user_metrics(&outcomes, user);
        assert_eq!(tasks.completed, 2);
        assert_eq!(avg, 30);
    }
}
