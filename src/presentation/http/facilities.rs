use std::any::Any;
use std::collections::BTreeMap;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::application::use_cases::facilities::FacilityError;
use crate::application::use_cases::facilities::create_facility::{
    CreateFacility, CreateFacilityInput,
};
use crate::application::use_cases::facilities::delete_facility::{DeleteFacility, DeletedFacility};
use crate::application::use_cases::facilities::get_facility::GetFacility;
use crate::application::use_cases::facilities::list_facilities::ListFacilities;
use crate::application::use_cases::facilities::search_facilities::SearchFacilities;
use crate::application::use_cases::facilities::update_facility::{
    UpdateFacility, UpdateFacilityInput,
};
use crate::bootstrap::app_context::AppContext;
use crate::domain::facilities::facility::{Facility, SearchFilters};
use crate::presentation::http::request_body::{FacilityPayload, decode_fields};

/// Body of every non-200 response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            fields: None,
            hint: None,
            example: None,
            details: None,
        }
    }
}

#[derive(Debug, ToSchema)]
pub struct FacilityRequest {
    pub name: Option<String>,
    pub location_id: Option<i64>,
    /// Array of names or a comma separated string.
    #[schema(value_type = Option<Vec<String>>)]
    pub tags: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    pub name: Option<String>,
    pub tag: Option<String>,
    pub city: Option<String>,
}

pub struct ApiError(pub FacilityError);

impl From<FacilityError> for ApiError {
    fn from(e: FacilityError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self.0 {
            FacilityError::Validation {
                message,
                fields,
                hint,
                example,
            } => {
                let fields = (!fields.is_empty()).then(|| {
                    fields
                        .into_iter()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect()
                });
                (
                    StatusCode::BAD_REQUEST,
                    ErrorBody {
                        fields,
                        hint: hint.map(str::to_string),
                        example: example.map(str::to_string),
                        ..ErrorBody::new(message)
                    },
                )
            }
            FacilityError::NotFound => (StatusCode::NOT_FOUND, ErrorBody::new("Facility not found")),
            FacilityError::Query { message, source } => {
                tracing::error!(error = %source, "facility_query_failed");
                (StatusCode::BAD_REQUEST, ErrorBody::new(message))
            }
            FacilityError::Write { message, source } => {
                tracing::error!(error = %source, "facility_write_failed");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorBody {
                        details: Some(source.to_string()),
                        ..ErrorBody::new(message)
                    },
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

/// Turns a panicking handler into the generic write-failure response.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(%details, "handler_panicked");
    let body = ErrorBody {
        details: Some(details),
        ..ErrorBody::new("Unexpected error")
    };
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

fn payload_from(headers: &HeaderMap, body: &[u8]) -> FacilityPayload {
    let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
    FacilityPayload::from_fields(&decode_fields(content_type, body))
}

#[utoipa::path(get, path = "/facilities", tag = "Facilities",
    responses((status = 200, body = [Facility]), (status = 400, body = ErrorBody)))]
pub async fn list_facilities(
    State(ctx): State<AppContext>,
) -> Result<Json<Vec<Facility>>, ApiError> {
    let repo = ctx.facility_repo();
    let uc = ListFacilities {
        repo: repo.as_ref(),
    };
    Ok(Json(uc.execute().await?))
}

#[utoipa::path(get, path = "/facilities/{id}", tag = "Facilities",
    params(("id" = i64, Path, description = "Facility ID")),
    responses((status = 200, body = Facility), (status = 404, body = ErrorBody)))]
pub async fn get_facility(
    State(ctx): State<AppContext>,
    Path(id): Path<i64>,
) -> Result<Json<Facility>, ApiError> {
    let repo = ctx.facility_repo();
    let uc = GetFacility {
        repo: repo.as_ref(),
    };
    Ok(Json(uc.execute(id).await?))
}

#[utoipa::path(post, path = "/facilities", tag = "Facilities",
    request_body(content = FacilityRequest, content_type = "application/json"),
    responses((status = 200, body = Facility), (status = 400, body = ErrorBody)))]
pub async fn create_facility(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Facility>, ApiError> {
    let payload = payload_from(&headers, &body);
    let repo = ctx.facility_repo();
    let uc = CreateFacility {
        repo: repo.as_ref(),
    };
    let facility = uc
        .execute(CreateFacilityInput {
            name: payload.name.unwrap_or_default(),
            location_id: payload.location_id.unwrap_or(0),
            tags: payload.tags.unwrap_or_default(),
        })
        .await?;
    Ok(Json(facility))
}

#[utoipa::path(put, path = "/facilities/{id}", tag = "Facilities",
    params(("id" = i64, Path, description = "Facility ID")),
    request_body(content = FacilityRequest, content_type = "application/json"),
    responses((status = 200, body = Facility), (status = 400, body = ErrorBody), (status = 404, body = ErrorBody)))]
pub async fn update_facility(
    State(ctx): State<AppContext>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Facility>, ApiError> {
    let payload = payload_from(&headers, &body);
    let repo = ctx.facility_repo();
    let uc = UpdateFacility {
        repo: repo.as_ref(),
    };
    let facility = uc
        .execute(
            id,
            UpdateFacilityInput {
                name: payload.name,
                location_id: payload.location_id,
                tags: payload.tags,
            },
        )
        .await?;
    Ok(Json(facility))
}

#[utoipa::path(delete, path = "/facilities/{id}", tag = "Facilities",
    params(("id" = i64, Path, description = "Facility ID")),
    responses((status = 200, body = DeletedFacility), (status = 404, body = ErrorBody)))]
pub async fn delete_facility(
    State(ctx): State<AppContext>,
    Path(id): Path<i64>,
) -> Result<Json<DeletedFacility>, ApiError> {
    let repo = ctx.facility_repo();
    let uc = DeleteFacility {
        repo: repo.as_ref(),
    };
    Ok(Json(uc.execute(id).await?))
}

#[utoipa::path(get, path = "/facilities/search", tag = "Facilities",
    params(SearchQuery),
    responses((status = 200, body = [Facility]), (status = 400, body = ErrorBody)))]
pub async fn search_facilities(
    State(ctx): State<AppContext>,
    q: Option<Query<SearchQuery>>,
) -> Result<Json<Vec<Facility>>, ApiError> {
    let q = q.map(|Query(v)| v).unwrap_or_default();
    let repo = ctx.facility_repo();
    let uc = SearchFacilities {
        repo: repo.as_ref(),
    };
    let items = uc
        .execute(SearchFilters {
            name: q.name,
            tag: q.tag,
            city: q.city,
        })
        .await?;
    Ok(Json(items))
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/facilities", get(list_facilities).post(create_facility))
        .route("/facilities/search", get(search_facilities))
        .route(
            "/facilities/:id",
            get(get_facility)
                .put(update_facility)
                .delete(delete_facility),
        )
        .with_state(ctx)
}
