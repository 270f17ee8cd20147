mod common;

use chrono::{Duration, Utc};

use common::{seed_problem, seed_user, Backend};
use woodie_campus_server::{
    errors::AppError,
    models::{
        domain::{ReviewSchedule, SolutionRecord, UserRole, Workbook, WorkbookProblem, WorkbookReviewSchedule},
        dto::request::{ReorderProblemsRequest, SubmitSolutionRequest},
    },
    repositories::{
        DailyStatsRepository, ReviewReminderRepository, ReviewScheduleRepository,
        SolutionRecordRepository, WorkbookRepository, WorkbookReviewScheduleRepository,
    },
    services::mastery::MasteryLevel,
};

fn submission(problem_id: &str, answer: &str) -> SubmitSolutionRequest {
    SubmitSolutionRequest {
        problem_id: problem_id.to_string(),
        workbook_id: None,
        answer: answer.to_string(),
    }
}

#[tokio::test]
async fn problem_climbs_to_retirement_and_leaves_targets() {
    let backend = Backend::default();
    let state = backend.app_state();
    seed_problem(&backend, "p1", "42").await;

    let now = Utc::now();
    let record = state
        .solution_service
        .submit_solution("u1", submission("p1", "41"), now)
        .await
        .unwrap();
    assert_eq!(record.mastery_level, 0);
    assert_eq!(record.next_review_date, now);

    let targets = state.review_service.today_targets("u1", now).await.unwrap();
    assert_eq!(targets.len(), 1);

    let mut at = now;
    for (expected_level, interval) in [(1, 1), (2, 3), (3, 7), (4, 14)] {
        let reviewed = state
            .review_service
            .complete_review("u1", &record.id, true, at)
            .await
            .unwrap();
        assert_eq!(reviewed.mastery_level, expected_level);
        assert_eq!(reviewed.next_review_date, at + Duration::days(interval));
        at = reviewed.next_review_date;
    }

    let later = at + Duration::days(30);
    assert!(state.review_service.today_targets("u1", later).await.unwrap().is_empty());

    let pending = state.review_service.list_schedules("u1", false).await.unwrap();
    assert!(pending.is_empty());
    let all = state.review_service.list_schedules("u1", true).await.unwrap();
    assert_eq!(all.len(), 4);
    assert!(all.iter().all(|s| s.is_completed));

    let stats = state.review_service.today_stats("u1", now).await.unwrap();
    assert_eq!(stats.completed_count, 1);
    assert_eq!(stats.correct_count, 1);
    assert_eq!(stats.accuracy_percentage, 100);
}

#[tokio::test]
async fn incorrect_review_resets_and_is_due_again() {
    let backend = Backend::default();
    let state = backend.app_state();
    let now = Utc::now();

    let mut record = SolutionRecord::new("u1", "p1", "x", true);
    record.mastery_level = MasteryLevel::new(3).unwrap();
    record.next_review_date = now - Duration::days(2);
    let record = backend.solutions.create(record).await.unwrap();

    let reviewed = state
        .review_service
        .complete_review("u1", &record.id, false, now)
        .await
        .unwrap();
    assert_eq!(reviewed.mastery_level, 0);
    assert_eq!(reviewed.next_review_date, now);

    let targets = state.review_service.today_targets("u1", now).await.unwrap();
    assert_eq!(targets.len(), 1);

    let stats = state.review_service.today_stats("u1", now).await.unwrap();
    assert_eq!(stats.completed_count, 1);
    assert_eq!(stats.correct_count, 0);
    assert_eq!(stats.accuracy_percentage, 0);
}

#[tokio::test]
async fn reviewing_another_users_record_is_forbidden() {
    let backend = Backend::default();
    let state = backend.app_state();
    let record = backend
        .solutions
        .create(SolutionRecord::new("owner", "p1", "x", true))
        .await
        .unwrap();

    let result = state
        .review_service
        .complete_review("someone-else", &record.id, true, Utc::now())
        .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));

    let unchanged = backend.solutions.find_by_id(&record.id).await.unwrap().unwrap();
    assert_eq!(unchanged.mastery_level, record.mastery_level);
}

#[tokio::test]
async fn resubmission_replaces_previous_record_as_target() {
    let backend = Backend::default();
    let state = backend.app_state();
    seed_problem(&backend, "p1", "Seoul").await;
    let now = Utc::now();

    state
        .solution_service
        .submit_solution("u1", submission("p1", "Busan"), now - Duration::hours(2))
        .await
        .unwrap();
    let second = state
        .solution_service
        .submit_solution("u1", submission("p1", "seoul"), now)
        .await
        .unwrap();
    assert_eq!(second.attempt_number, 2);
    assert_eq!(second.mastery_level, 1);

    // the wrong first attempt is history now
    assert!(state.review_service.today_targets("u1", now).await.unwrap().is_empty());

    let history = state.solution_service.list_solutions("u1", Some("p1")).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id, second.id);

    let pending = backend.schedules.find_pending_for_problem("u1", "p1").await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].review_stage, 1);
}

#[tokio::test]
async fn retired_latest_record_hides_older_misses() {
    let backend = Backend::default();
    let state = backend.app_state();
    seed_problem(&backend, "p1", "42").await;
    let now = Utc::now();

    let missed = state
        .solution_service
        .submit_solution("u1", submission("p1", "41"), now)
        .await
        .unwrap();
    let solved = state
        .solution_service
        .submit_solution("u1", submission("p1", "42"), now + Duration::minutes(1))
        .await
        .unwrap();
    assert_eq!(solved.mastery_level, 1);

    let mut at = now + Duration::minutes(2);
    for _ in 0..3 {
        let reviewed = state
            .review_service
            .complete_review("u1", &solved.id, true, at)
            .await
            .unwrap();
        at = reviewed.next_review_date;
    }
    let retired = backend.solutions.find_by_id(&solved.id).await.unwrap().unwrap();
    assert!(retired.is_retired());

    assert!(state.review_service.today_targets("u1", at).await.unwrap().is_empty());
    assert!(state
        .review_service
        .priority_targets("u1", None, None, at)
        .await
        .unwrap()
        .is_empty());

    // the first miss is history and can no longer be reviewed
    let result = state
        .review_service
        .complete_review("u1", &missed.id, true, at)
        .await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));
    let untouched = backend.solutions.find_by_id(&missed.id).await.unwrap().unwrap();
    assert_eq!(untouched.mastery_level, MasteryLevel::NEW);
}

#[tokio::test]
async fn priority_targets_sort_by_overdue_days() {
    let backend = Backend::default();
    let state = backend.app_state();
    let now = Utc::now();

    for (problem, days) in [("a", 1), ("b", 6), ("c", 3), ("d", 0)] {
        let mut record = SolutionRecord::new("u1", problem, "x", false);
        record.next_review_date = now - Duration::days(days);
        backend.solutions.create(record).await.unwrap();
    }

    let ranked = state
        .review_service
        .priority_targets("u1", None, None, now)
        .await
        .unwrap();
    let order: Vec<(&str, i64)> = ranked
        .iter()
        .map(|t| (t.record.problem_id.as_str(), t.overdue_days))
        .collect();
    assert_eq!(order, vec![("b", 6), ("c", 3), ("a", 1), ("d", 0)]);

    let capped = state
        .review_service
        .priority_targets("u1", Some(3), Some(2), now)
        .await
        .unwrap();
    let ids: Vec<&str> = capped.iter().map(|t| t.record.problem_id.as_str()).collect();
    assert_eq!(ids, vec!["c", "a"]);
}

#[tokio::test]
async fn workbook_review_walks_stages_until_retired() {
    let backend = Backend::default();
    let state = backend.app_state();
    let now = Utc::now();

    let first = backend
        .workbook_schedules
        .create(WorkbookReviewSchedule::new("u1", "wb-1", now, 0))
        .await
        .unwrap();

    let due = state.review_service.today_workbook_reviews("u1", now).await.unwrap();
    assert_eq!(due.len(), 1);

    let mut schedule_id = first.id;
    let mut at = now;
    for expected_stage in 1..=4 {
        let completion = state
            .review_service
            .complete_workbook_review("u1", &schedule_id, at)
            .await
            .unwrap();
        assert!(completion.completed.is_completed);
        let next = completion.next.expect("next stage");
        assert_eq!(next.review_stage, expected_stage);
        schedule_id = next.id;
        at = next.scheduled_date;
    }

    let last = state
        .review_service
        .complete_workbook_review("u1", &schedule_id, at)
        .await
        .unwrap();
    assert!(last.next.is_none());

    let again = state
        .review_service
        .complete_workbook_review("u1", &schedule_id, at)
        .await;
    assert!(matches!(again, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn workbook_progress_and_reorder() {
    let backend = Backend::default();
    let state = backend.app_state();
    let now = Utc::now();

    let workbook = backend
        .workbooks
        .create(Workbook::new("Capitals", "teacher-1"))
        .await
        .unwrap();
    for (index, problem) in ["p1", "p2", "p3"].iter().enumerate() {
        seed_problem(&backend, problem, "yes").await;
        backend
            .workbooks
            .add_problem(WorkbookProblem::new(&workbook.id, problem, index as i32))
            .await
            .unwrap();
    }

    let mut request = submission("p1", "yes");
    request.workbook_id = Some(workbook.id.clone());
    state.solution_service.submit_solution("u1", request, now).await.unwrap();
    state
        .solution_service
        .submit_solution("u1", submission("p2", "no"), now)
        .await
        .unwrap();

    let progress = state.workbook_service.progress("u1", &workbook.id).await.unwrap();
    assert_eq!(progress.total, 3);
    assert_eq!(progress.solved, 1);
    assert_eq!(progress.percentage, 33);
    assert!(progress.problems[1].attempted);
    assert!(!progress.problems[1].solved);
    assert!(!progress.problems[2].attempted);

    let reordered = state
        .workbook_service
        .reorder(
            &workbook.id,
            ReorderProblemsRequest {
                problem_ids: vec!["p3".into(), "p1".into(), "p2".into()],
            },
        )
        .await
        .unwrap();
    let order: Vec<(&str, i32)> = reordered
        .iter()
        .map(|p| (p.problem_id.as_str(), p.order_index))
        .collect();
    assert_eq!(order, vec![("p3", 0), ("p1", 1), ("p2", 2)]);

    let stored = backend.workbooks.find_problems(&workbook.id).await.unwrap();
    assert_eq!(stored[0].problem_id, "p3");

    let partial = state
        .workbook_service
        .reorder(
            &workbook.id,
            ReorderProblemsRequest {
                problem_ids: vec!["p1".into(), "p2".into()],
            },
        )
        .await;
    assert!(matches!(partial, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn empty_workbook_accepts_empty_order() {
    let backend = Backend::default();
    let state = backend.app_state();
    let workbook = backend
        .workbooks
        .create(Workbook::new("Drafts", "teacher-1"))
        .await
        .unwrap();

    let reordered = state
        .workbook_service
        .reorder(&workbook.id, ReorderProblemsRequest { problem_ids: vec![] })
        .await
        .unwrap();
    assert!(reordered.is_empty());

    let progress = state.workbook_service.progress("u1", &workbook.id).await.unwrap();
    assert_eq!(progress.total, 0);
    assert_eq!(progress.percentage, 0);
}

#[tokio::test]
async fn scheduled_jobs_run_against_stored_data() {
    let backend = Backend::default();
    let state = backend.app_state();
    let now = Utc::now();
    let today = now.date_naive();

    seed_user(&backend, "u1", UserRole::Student).await;
    seed_user(&backend, "u2", UserRole::Student).await;

    let mut due = SolutionRecord::new("u1", "p1", "x", false);
    due.next_review_date = now - Duration::days(1);
    backend.solutions.create(due).await.unwrap();

    backend.stats.record_review("u1", today, true).await.unwrap();
    let reset = state.scheduler.run_now("daily_stats_reset").await.unwrap();
    assert_eq!(reset.affected, 2);
    let stats = backend.stats.find("u1", today).await.unwrap().unwrap();
    assert_eq!(stats.completed_count, 0);

    state.scheduler.run_now("daily_target_precalculation").await.unwrap();
    let stats = backend.stats.find("u1", today).await.unwrap().unwrap();
    assert_eq!(stats.target_count, 1);
    let stats = backend.stats.find("u2", today).await.unwrap().unwrap();
    assert_eq!(stats.target_count, 0);

    let reminders = state.scheduler.run_now("reminder_preparation").await.unwrap();
    assert_eq!(reminders.affected, 1);
    let prepared = backend.reminders.find_for_date(today).await.unwrap();
    assert_eq!(prepared.len(), 1);
    assert_eq!(prepared[0].user_id, "u1");

    let mut old = ReviewSchedule::new("u1", "p9", now - Duration::days(60), 1);
    old.complete(now - Duration::days(45));
    backend.schedules.create(old).await.unwrap();
    let mut recent = ReviewSchedule::new("u1", "p8", now - Duration::days(5), 1);
    recent.complete(now - Duration::days(2));
    backend.schedules.create(recent).await.unwrap();

    let cleanup = state.scheduler.run_now("expired_schedule_cleanup").await.unwrap();
    assert_eq!(cleanup.affected, 1);
    assert_eq!(backend.schedules.find_by_user("u1", true).await.unwrap().len(), 1);

    let status = state.scheduler.status().await;
    assert!(!status.active);
    assert!(status.jobs.iter().all(|job| job.run_count == 1 && job.failure_count == 0));
}
