use async_graphql::{Context, Object};
use chrono::Utc;

use crate::{
    app_state::AppState,
    auth::extract_claims_from_context,
    errors::AppResult,
    models::dto::{
        request::SubmitSolutionRequest,
        response::{SolutionRecordDto, WorkbookReviewCompletionDto},
    },
};

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn complete_review(
        &self,
        ctx: &Context<'_>,
        record_id: String,
        is_correct: bool,
    ) -> AppResult<SolutionRecordDto> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx)?;

        state
            .review_service
            .complete_review(&claims.sub, &record_id, is_correct, Utc::now())
            .await
    }

    async fn complete_workbook_review(
        &self,
        ctx: &Context<'_>,
        schedule_id: String,
    ) -> AppResult<WorkbookReviewCompletionDto> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx)?;

        state
            .review_service
            .complete_workbook_review(&claims.sub, &schedule_id, Utc::now())
            .await
    }

    async fn submit_solution(
        &self,
        ctx: &Context<'_>,
        problem_id: String,
        answer: String,
        workbook_id: Option<String>,
    ) -> AppResult<SolutionRecordDto> {
        let state = ctx.data::<AppState>()?;
        let claims = extract_claims_from_context(ctx)?;

        let request = SubmitSolutionRequest {
            problem_id,
            workbook_id,
            answer,
        };
        state
            .solution_service
            .submit_solution(&claims.sub, request, Utc::now())
            .await
    }
}
