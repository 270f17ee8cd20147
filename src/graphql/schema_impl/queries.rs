use async_graphql::{Context, Object};
use chrono::Utc;

use crate::{
    app_state::AppState,
    auth::extract_claims_from_context,
    errors::{AppError, AppResult},
    models::dto::response::{
        DailyStatsDto, PriorityTargetDto, ReviewScheduleDto, SolutionRecordDto,
        WorkbookProblemDto, WorkbookProgressDto, WorkbookReviewScheduleDto,
    },
};

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn today_targets(&self, ctx: &Context<'_>) -> AppResult<Vec<SolutionRecordDto>> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx)?;

        state.review_service.today_targets(&claims.sub, Utc::now()).await
    }

    async fn priority_targets(
        &self,
        ctx: &Context<'_>,
        max_overdue_days: Option<i64>,
        limit: Option<i32>,
    ) -> AppResult<Vec<PriorityTargetDto>> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx)?;

        if max_overdue_days.is_some_and(|days| days < 0) {
            return Err(AppError::ValidationError(
                "maxOverdueDays must not be negative".to_string(),
            ));
        }
        let limit = limit.map(|l| l.clamp(1, 200) as usize);

        state
            .review_service
            .priority_targets(&claims.sub, max_overdue_days, limit, Utc::now())
            .await
    }

    async fn review_schedules(
        &self,
        ctx: &Context<'_>,
        #[graphql(default)] include_completed: bool,
    ) -> AppResult<Vec<ReviewScheduleDto>> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx)?;

        state
            .review_service
            .list_schedules(&claims.sub, include_completed)
            .await
    }

    async fn today_workbook_reviews(
        &self,
        ctx: &Context<'_>,
    ) -> AppResult<Vec<WorkbookReviewScheduleDto>> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx)?;

        state
            .review_service
            .today_workbook_reviews(&claims.sub, Utc::now())
            .await
    }

    async fn today_stats(&self, ctx: &Context<'_>) -> AppResult<DailyStatsDto> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx)?;

        state.review_service.today_stats(&claims.sub, Utc::now()).await
    }

    async fn solutions(
        &self,
        ctx: &Context<'_>,
        problem_id: Option<String>,
    ) -> AppResult<Vec<SolutionRecordDto>> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx)?;

        state
            .solution_service
            .list_solutions(&claims.sub, problem_id.as_deref())
            .await
    }

    async fn workbook_problems(
        &self,
        ctx: &Context<'_>,
        workbook_id: String,
    ) -> AppResult<Vec<WorkbookProblemDto>> {
        let state = ctx.data::<AppState>()?;
        extract_claims_from_context(ctx)?;

        state.workbook_service.problems(&workbook_id).await
    }

    async fn workbook_progress(
        &self,
        ctx: &Context<'_>,
        workbook_id: String,
    ) -> AppResult<WorkbookProgressDto> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx)?;

        state.workbook_service.progress(&claims.sub, &workbook_id).await
    }
}
