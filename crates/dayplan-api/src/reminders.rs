use axum::{Json, extract::State, response::IntoResponse};

use dayplan_types::api::{CreateReminderRequest, UpdateReminderRequest};
use dayplan_types::models::{NewReminder, Reminder, ReminderPatch};

use crate::auth::{AppState, run_blocking};
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::resources::ResourceApi;
use crate::{ownership, validate};

const MAX_TYPE_LEN: usize = 50;
const MAX_CONTENT_LEN: usize = 500;

impl ResourceApi for Reminder {
    type CreateBody = CreateReminderRequest;
    type UpdateBody = UpdateReminderRequest;

    fn draft(body: CreateReminderRequest) -> Result<NewReminder, ApiError> {
        Ok(NewReminder {
            reminder_type: validate::required_text("reminder_type", &body.reminder_type, MAX_TYPE_LEN)?,
            scheduled_time: validate::time_of_day("scheduled_time", &body.scheduled_time)?,
            content: validate::bounded_text("content", &body.content, MAX_CONTENT_LEN)?,
        })
    }

    fn patch(body: UpdateReminderRequest) -> Result<ReminderPatch, ApiError> {
        Ok(ReminderPatch {
            scheduled_time: validate::present(body.scheduled_time)
                .map(|t| validate::time_of_day("scheduled_time", &t))
                .transpose()?,
            content: validate::present(body.content)
                .map(|c| validate::bounded_text("content", &c, MAX_CONTENT_LEN))
                .transpose()?,
            is_enabled: body.is_enabled,
        })
    }
}

pub async fn list_reminders(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let reminders = run_blocking(&state, move |state| {
        ownership::list_own::<Reminder, _>(&state.db, caller, &())
    })
    .await?;

    Ok(Json(reminders))
}
