//! Advertisement handlers.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::query::RawAdQuery;
use crate::domain::entities::NewAdvertisement;

use super::error::ApiError;
use super::models::{AdCreateRequest, AdCreatedResponse, AdListItem, AdListResponse};
use super::state::ApiState;

pub async fn create_advertisement(
    State(state): State<ApiState>,
    payload: Result<Json<AdCreateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload
        .map_err(|rejection| ApiError::bad_request("Invalid body", Some(rejection.body_text())))?;

    let id = state.ads.create(NewAdvertisement::from(payload)).await?;

    Ok((StatusCode::CREATED, Json(AdCreatedResponse { id })))
}

pub async fn list_advertisements(
    State(state): State<ApiState>,
    query: Result<Query<RawAdQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query
        .map_err(|rejection| ApiError::bad_request("Invalid query", Some(rejection.body_text())))?;

    let ads = state.ads.list_active(query).await?;

    Ok(Json(AdListResponse {
        items: ads.into_iter().map(AdListItem::from).collect(),
    }))
}
