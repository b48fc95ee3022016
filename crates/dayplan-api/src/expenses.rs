use axum::{Json, extract::State, response::IntoResponse};

use dayplan_types::api::{CreateExpenseRequest, ExpenseListResponse, UpdateExpenseRequest};
use dayplan_types::models::{Expense, ExpensePatch, NewExpense};

use crate::auth::{AppState, run_blocking};
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::resources::ResourceApi;
use crate::{ownership, validate};

const MAX_CATEGORY_LEN: usize = 50;
const MAX_NOTE_LEN: usize = 500;

fn amount(value: f64) -> Result<f64, ApiError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ApiError::validation("amount must be a positive number"));
    }
    Ok(value)
}

impl ResourceApi for Expense {
    type CreateBody = CreateExpenseRequest;
    type UpdateBody = UpdateExpenseRequest;

    fn draft(body: CreateExpenseRequest) -> Result<NewExpense, ApiError> {
        Ok(NewExpense {
            amount: amount(body.amount)?,
            category: validate::required_text("category", &body.category, MAX_CATEGORY_LEN)?,
            note: validate::bounded_text("note", &body.note, MAX_NOTE_LEN)?,
        })
    }

    fn patch(body: UpdateExpenseRequest) -> Result<ExpensePatch, ApiError> {
        Ok(ExpensePatch {
            amount: body.amount.map(amount).transpose()?,
            category: validate::present(body.category)
                .map(|c| validate::required_text("category", &c, MAX_CATEGORY_LEN))
                .transpose()?,
            note: validate::present(body.note)
                .map(|n| validate::bounded_text("note", &n, MAX_NOTE_LEN))
                .transpose()?,
        })
    }
}

/// The caller's expenses, newest first, with their sum.
pub async fn list_expenses(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let expenses = run_blocking(&state, move |state| {
        ownership::list_own::<Expense, _>(&state.db, caller, &())
    })
    .await?;

    let total = expenses.iter().map(|e| e.amount).sum();
    Ok(Json(ExpenseListResponse { total, expenses }))
}
