use crate::{
    cache::keys,
    error::{AppError, Result},
    models::{CreateMedicine, Medicine, UpdateMedicine},
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    pub page: Option<u32>,
}

fn api_response(
    data: impl serde::Serialize,
    message: Option<&str>,
    status: StatusCode,
) -> impl IntoResponse {
    (
        status,
        Json(json!({"success": true, "data": data, "message": message})),
    )
}

/// GET /api/medicines: the full catalog (or one page), served read-through
pub async fn list_medicines(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    let key = keys::list_key(params.page);
    let medicines = state
        .cache
        .read_through(&key, keys::LIST_TTL, || {
            let repo = state.medicines.clone();
            let page = params.page;
            async move { repo.find_all(page).await }
        })
        .await?;

    Ok(api_response(medicines, None, StatusCode::OK))
}

/// GET /api/medicines/:id: check cache, on miss read persistence and
/// populate; a missing record is 404 and is not cached
pub async fn get_medicine(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let key = keys::detail_key(&id);

    if let Some(medicine) = state.cache.get::<Medicine>(&key).await {
        return Ok(api_response(medicine, None, StatusCode::OK));
    }

    match state.medicines.find_by_id(&id).await? {
        Some(medicine) => {
            state.cache.set(&key, &medicine, keys::DETAIL_TTL).await;
            Ok(api_response(medicine, None, StatusCode::OK))
        }
        None => Err(AppError::NotFound("Medicine not found.".to_string())),
    }
}

/// GET /api/medicines/search?q=...: read-through on the search family
pub async fn search_medicines(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<impl IntoResponse> {
    if params.q.is_empty() {
        return Err(AppError::BadRequest("Search query cannot be empty.".to_string()));
    }

    let key = keys::search_key(&params.q, params.page);
    let medicines = state
        .cache
        .read_through(&key, keys::SEARCH_TTL, || {
            let repo = state.medicines.clone();
            let query = params.q.clone();
            let page = params.page;
            async move { repo.search(&query, page).await }
        })
        .await?;

    Ok(api_response(medicines, None, StatusCode::OK))
}

/// POST /api/medicines
pub async fn create_medicine(
    State(state): State<AppState>,
    Json(input): Json<CreateMedicine>,
) -> Result<impl IntoResponse> {
    let medicine = state.medicines.create(input).await?;
    Ok(api_response(
        medicine,
        Some("Medicine created successfully."),
        StatusCode::CREATED,
    ))
}

/// PUT /api/medicines/:id
pub async fn update_medicine(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateMedicine>,
) -> Result<impl IntoResponse> {
    match state.medicines.update(&id, input).await? {
        Some(medicine) => Ok(api_response(
            medicine,
            Some("Medicine updated successfully."),
            StatusCode::OK,
        )),
        None => Err(AppError::NotFound("Medicine not found.".to_string())),
    }
}

/// DELETE /api/medicines/:id
pub async fn delete_medicine(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    match state.medicines.delete(&id).await? {
        Some(_) => Ok(api_response(
            serde_json::Value::Null,
            Some("Medicine deleted successfully."),
            StatusCode::OK,
        )),
        None => Err(AppError::NotFound("Medicine not found.".to_string())),
    }
}
