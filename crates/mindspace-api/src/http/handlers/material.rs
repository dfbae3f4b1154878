//! Materials library HTTP handlers.
//!
//! Endpoints:
//! - GET  /api/v1/materials            - List published materials
//! - GET  /api/v1/materials/{id}       - Get a material
//! - POST /api/v1/materials            - Publish (psychologists only)
//! - GET  /api/v1/materials/categories - List categories
//! - POST /api/v1/materials/categories - Create (psychologists only)
//!
//! List responses carry an excerpt instead of the full content.

use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mindspace_types::material::{Category, Material, NewCategory, NewMaterial};

use crate::http::error::AppError;
use crate::http::extractors::CurrentUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Query parameters for material listing.
#[derive(Debug, Deserialize)]
pub struct MaterialListQuery {
    pub category_id: Option<i64>,
}

/// List-view material: excerpt instead of the full content.
#[derive(Debug, Serialize)]
pub struct MaterialSummary {
    pub id: i64,
    pub title: String,
    pub excerpt: String,
    pub kind: String,
    pub image_url: Option<String>,
    pub categories: Vec<Category>,
}

impl From<&Material> for MaterialSummary {
    fn from(material: &Material) -> Self {
        Self {
            id: material.id,
            title: material.title.clone(),
            excerpt: material.excerpt(),
            kind: material.kind.clone(),
            image_url: material.image_url.clone(),
            categories: material.categories.clone(),
        }
    }
}

/// GET /api/v1/materials - List published materials.
pub async fn list_materials(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<MaterialListQuery>,
) -> Result<Json<ApiResponse<Vec<MaterialSummary>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let materials = state.material_service.list(query.category_id).await?;
    let summaries: Vec<MaterialSummary> = materials.iter().map(MaterialSummary::from).collect();

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(summaries, request_id, elapsed)
        .with_link("self", "/api/v1/materials");
    Ok(Json(resp))
}

/// GET /api/v1/materials/{id} - Full material with content.
pub async fn get_material(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Material>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let material = state.material_service.get(id).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(material, request_id, elapsed)
        .with_link("self", &format!("/api/v1/materials/{id}"));
    Ok(Json(resp))
}

/// POST /api/v1/materials - Publish a material (psychologists only).
pub async fn create_material(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(material): Json<NewMaterial>,
) -> Result<Json<ApiResponse<Material>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let material = state.material_service.create(&user, &material).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(material, request_id, elapsed)
        .with_link("self", "/api/v1/materials");
    Ok(Json(resp))
}

/// GET /api/v1/materials/categories - List active categories.
pub async fn list_categories(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<Category>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let categories = state.material_service.list_categories().await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(categories, request_id, elapsed)
        .with_link("self", "/api/v1/materials/categories");
    Ok(Json(resp))
}

/// POST /api/v1/materials/categories - Create a category (psychologists only).
pub async fn create_category(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(category): Json<NewCategory>,
) -> Result<Json<ApiResponse<Category>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let category = state
        .material_service
        .create_category(&user, &category)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(category, request_id, elapsed)
        .with_link("self", "/api/v1/materials/categories");
    Ok(Json(resp))
}
