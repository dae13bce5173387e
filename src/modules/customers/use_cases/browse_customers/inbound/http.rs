use axum::{
    Json,
    extract::{Query, State},
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::modules::customers::core::customer::CustomerRecord;
use crate::modules::customers::core::pagination::{PageCursor, PageResult};
use crate::modules::customers::use_cases::browse_customers::directory_port::FetchError;
use crate::modules::customers::use_cases::browse_customers::handler::{BrowseError, PageView};
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct ListCustomersParams {
    pub cursor: Option<String>,
    pub query: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct ResetSessionBody {
    pub query: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetafieldDto {
    pub key: String,
    pub value: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDto {
    pub id: String,
    pub display_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub metafields: Vec<MetafieldDto>,
}

impl From<CustomerRecord> for CustomerDto {
    fn from(record: CustomerRecord) -> Self {
        let display_id = record.display_id().to_string();
        Self {
            id: record.id,
            display_id,
            first_name: record.first_name,
            last_name: record.last_name,
            email: record.email,
            metafields: record
                .metafields
                .into_iter()
                .map(|m| MetafieldDto {
                    key: m.key,
                    value: m.value,
                })
                .collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfoBody {
    pub has_next_page: bool,
}

/// Body of the stateless page fetch, shaped like the original surface.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomersPageBody {
    pub customers: Vec<CustomerDto>,
    pub page_info: PageInfoBody,
    pub end_cursor: Option<String>,
}

impl From<PageResult> for CustomersPageBody {
    fn from(page: PageResult) -> Self {
        Self {
            customers: page.records.into_iter().map(Into::into).collect(),
            page_info: PageInfoBody {
                has_next_page: page.has_next_page,
            },
            end_cursor: page.end_cursor.map(|c| c.as_str().to_string()),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPageBody {
    pub customers: Vec<CustomerDto>,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl From<PageView> for SessionPageBody {
    fn from(view: PageView) -> Self {
        Self {
            customers: view.records.into_iter().map(Into::into).collect(),
            has_next_page: view.has_next_page,
            has_previous_page: view.has_previous_page,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Stateless page fetch: `GET /customers?cursor=&query=`.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListCustomersParams>,
) -> impl IntoResponse {
    let cursor = params
        .cursor
        .filter(|c| !c.is_empty())
        .map(PageCursor::from);
    let query = params.query.filter(|q| !q.trim().is_empty());

    match state
        .directory
        .fetch_page(cursor.as_ref(), query.as_deref())
        .await
    {
        Ok(page) => Json(CustomersPageBody::from(page)).into_response(),
        Err(error) => fetch_error_response(error),
    }
}

/// Current cached page of the browse session, no remote call.
pub async fn current_page(State(state): State<AppState>) -> impl IntoResponse {
    Json(SessionPageBody::from(state.browse.snapshot().await))
}

/// Clears the session's cursor history and fetches the first page; a missing
/// or query-less body clears the search.
pub async fn reset(
    State(state): State<AppState>,
    body: Result<Json<ResetSessionBody>, JsonRejection>,
) -> impl IntoResponse {
    let query = body.ok().and_then(|Json(b)| b.query);
    browse_result_response(state.browse.reset(query).await)
}

pub async fn next_page(State(state): State<AppState>) -> impl IntoResponse {
    browse_result_response(state.browse.next().await)
}

pub async fn prev_page(State(state): State<AppState>) -> impl IntoResponse {
    browse_result_response(state.browse.prev().await)
}

fn browse_result_response(result: Result<PageView, BrowseError>) -> Response {
    match result {
        Ok(view) => Json(SessionPageBody::from(view)).into_response(),
        Err(BrowseError::Fetch(error)) => fetch_error_response(error),
        Err(BrowseError::Navigation(error)) => (
            StatusCode::CONFLICT,
            Json(ErrorBody {
                error: error.to_string(),
            }),
        )
            .into_response(),
    }
}

fn fetch_error_response(error: FetchError) -> Response {
    let status = match error {
        FetchError::ConfigurationMissing => StatusCode::INTERNAL_SERVER_ERROR,
        FetchError::TransportFailure(_)
        | FetchError::RemoteRejected(_)
        | FetchError::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
    };
    (
        status,
        Json(ErrorBody {
            error: error.to_string(),
        }),
    )
        .into_response()
}
