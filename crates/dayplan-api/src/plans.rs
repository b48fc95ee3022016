use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};

use dayplan_types::api::{CreatePlanRequest, PlanQuery, UpdatePlanRequest};
use dayplan_types::models::{NewPlan, Plan, PlanFilter, PlanPatch, PlanStatus};

use crate::auth::{AppState, run_blocking};
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::resources::ResourceApi;
use crate::{ownership, validate};

const MAX_CONTENT_LEN: usize = 500;

impl ResourceApi for Plan {
    type CreateBody = CreatePlanRequest;
    type UpdateBody = UpdatePlanRequest;

    fn draft(body: CreatePlanRequest) -> Result<NewPlan, ApiError> {
        Ok(NewPlan {
            content: validate::required_text("content", &body.content, MAX_CONTENT_LEN)?,
            execution_date: validate::date("execution_date", &body.execution_date)?,
        })
    }

    fn patch(body: UpdatePlanRequest) -> Result<PlanPatch, ApiError> {
        let content = validate::present(body.content)
            .map(|c| validate::required_text("content", &c, MAX_CONTENT_LEN))
            .transpose()?;
        let status = validate::present(body.status)
            .map(|s| s.trim().parse::<PlanStatus>())
            .transpose()
            .map_err(|e| ApiError::validation(e.to_string()))?;
        let execution_date = validate::present(body.execution_date)
            .map(|d| validate::date("execution_date", &d))
            .transpose()?;

        Ok(PlanPatch {
            content,
            status,
            execution_date,
        })
    }
}

/// The caller's plans by execution date, optionally for a single day.
pub async fn list_plans(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Query(query): Query<PlanQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = PlanFilter {
        date: validate::present(query.date)
            .map(|d| validate::date("date", &d))
            .transpose()?,
    };

    let plans = run_blocking(&state, move |state| {
        ownership::list_own::<Plan, _>(&state.db, caller, &filter)
    })
    .await?;

    Ok(Json(plans))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_requires_content_and_date() {
        let ok = Plan::draft(CreatePlanRequest {
            content: " stretch ".into(),
            execution_date: "2026-10-16".into(),
        })
        .unwrap();
        assert_eq!(ok.content, "stretch");

        let no_content = Plan::draft(CreatePlanRequest {
            content: "".into(),
            execution_date: "2026-10-16".into(),
        });
        assert!(matches!(no_content, Err(ApiError::Validation(_))));

        let bad_date = Plan::draft(CreatePlanRequest {
            content: "x".into(),
            execution_date: "tomorrow".into(),
        });
        assert!(matches!(bad_date, Err(ApiError::Validation(_))));
    }

    #[test]
    fn patch_skips_blank_fields() {
        let patch = Plan::patch(UpdatePlanRequest {
            content: Some("".into()),
            status: Some("completed".into()),
            execution_date: None,
        })
        .unwrap();

        assert!(patch.content.is_none());
        assert_eq!(patch.status, Some(PlanStatus::Completed));
        assert!(patch.execution_date.is_none());
    }

    #[test]
    fn patch_rejects_unknown_status() {
        let result = Plan::patch(UpdatePlanRequest {
            status: Some("archived".into()),
            ..Default::default()
        });
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }
}
