use axum::{
    Json,
    extract::State,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::modules::customers::core::edit_session::EditSession;
use crate::modules::customers::use_cases::edit_attributes::handler::EditError;
use crate::modules::customers::use_cases::edit_attributes::writer_port::WriteError;
use crate::shell::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMetafieldBody {
    pub customer_id: String,
    pub key: String,
    pub value: String,
    pub namespace: String,
    #[serde(rename = "type")]
    pub value_type: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveEditBody {
    pub customer_id: String,
    pub ship_to_code: String,
    pub navision_account: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Single key/value update: `POST /customers/update-metafield`.
pub async fn update_metafield(
    State(state): State<AppState>,
    body: Result<Json<UpdateMetafieldBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };
    if body.customer_id.trim().is_empty() || body.key.trim().is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorBody {
                error: "customerId and key must be present".into(),
            }),
        )
            .into_response();
    }

    match state
        .editor
        .update_metafield(
            &body.customer_id,
            &body.key,
            &body.value,
            &body.namespace,
            &body.value_type,
        )
        .await
    {
        Ok(()) => Json(json!({ "ok": true })).into_response(),
        Err(error) => edit_error_response(error),
    }
}

/// The two-field logical edit: `POST /customers/save-edit`. Both attribute
/// writes must succeed before the cached page reflects the drafts.
pub async fn save_edit(
    State(state): State<AppState>,
    body: Result<Json<SaveEditBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };
    if body.customer_id.trim().is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorBody {
                error: "customerId must be present".into(),
            }),
        )
            .into_response();
    }

    let session = EditSession::Editing {
        customer_id: body.customer_id,
        draft_ship_to_code: body.ship_to_code,
        draft_navision_account: body.navision_account,
    };

    match state.editor.save_edit(&session).await {
        Ok(()) => Json(json!({ "ok": true })).into_response(),
        Err(error) => edit_error_response(error),
    }
}

fn edit_error_response(error: EditError) -> Response {
    let status = match &error {
        EditError::Write(WriteError::TransportFailure(_))
        | EditError::Write(WriteError::RemoteRejected(_)) => StatusCode::BAD_GATEWAY,
        EditError::SessionClosed => StatusCode::CONFLICT,
    };
    (
        status,
        Json(ErrorBody {
            error: error.to_string(),
        }),
    )
        .into_response()
}
