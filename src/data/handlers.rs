use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::data::pagination::{paginate, Page, PageRequest};
use crate::error::{ApiError, ErrorBody};
use crate::http::request::ApiQuery;
use crate::http::server::AppState;

/// Query string accepted by `/get-all`.
///
/// Kept as raw strings so coercion follows the pagination engine's rules
/// rather than the extractor's.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// The page number for pagination (default is 1).
    #[param(value_type = Option<i64>, minimum = 1)]
    pub page: Option<String>,
    /// The maximum number of items per page (default is 10).
    #[param(value_type = Option<i64>, minimum = 1)]
    pub limit: Option<String>,
    /// The category to filter the data by (case-insensitive).
    pub category: Option<String>,
}

impl From<PageParams> for PageRequest {
    fn from(params: PageParams) -> Self {
        Self {
            page: params.page,
            limit: params.limit,
            category: params.category,
        }
    }
}

/// Paginated and filtered entries.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub success: bool,
    /// The number of items returned in the current page.
    pub count: usize,
    /// The total number of items matching the filter criteria.
    pub total: usize,
    /// The current page number.
    pub page: usize,
    /// The total number of pages based on the filter criteria.
    pub total_pages: usize,
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<Value>,
}

impl From<Page<Value>> for PageResponse {
    fn from(page: Page<Value>) -> Self {
        Self {
            success: true,
            count: page.count,
            total: page.total,
            page: page.page,
            total_pages: page.total_pages,
            data: page.data,
        }
    }
}

/// Fetch all data from the public API, optionally paginated and filtered.
#[utoipa::path(
    get,
    path = "/get-all",
    tag = "Data",
    params(PageParams),
    responses(
        (status = 200, description = "Paginated and filtered data", body = PageResponse),
        (status = 400, description = "The provided page number or limit is invalid", body = ErrorBody),
        (status = 404, description = "No data found for the specified category", body = ErrorBody),
        (status = 500, description = "Failed to fetch data from the API", body = ErrorBody)
    )
)]
pub async fn fetch_all_data(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Json<PageResponse>, ApiError> {
    let entries = state.entries.fetch_entries().await?;

    let request = PageRequest::from(params);
    let page = paginate(entries, &request)?;

    tracing::debug!(
        page = page.page,
        count = page.count,
        total = page.total,
        category = ?request.category,
        "Served entries page"
    );

    Ok(Json(page.into()))
}
