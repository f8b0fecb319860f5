use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde::Deserialize;

use crate::db::models::{DbListing, ListingDetail};
use crate::db::sqlite::ListingFilter;
use crate::error::DealerError;
use crate::middleware::extract::{ApiPath, ApiQuery};
use crate::middleware::listing_form::ListingForm;
use crate::server::router::DealerState;
use crate::types::api::{ApiData, ApiMessage};
use crate::types::listing::ListingFields;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub marca: Option<String>,
    pub keyword: Option<String>,
}

/// GET /api/motos?marca=&keyword=
pub async fn list_listings(
    State(state): State<DealerState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<ApiData<Vec<DbListing>>>, DealerError> {
    let filter = ListingFilter {
        brand: query.marca,
        keyword: query.keyword,
    };
    let rows = state.reader.list(filter).await?;
    Ok(Json(ApiData::success(rows)))
}

/// GET /api/motos/destaques
pub async fn featured_listings(
    State(state): State<DealerState>,
) -> Result<Json<ApiData<Vec<DbListing>>>, DealerError> {
    Ok(Json(ApiData::success(state.reader.featured().await?)))
}

/// GET /api/marcas
pub async fn list_brands(
    State(state): State<DealerState>,
) -> Result<Json<ApiData<Vec<String>>>, DealerError> {
    Ok(Json(ApiData::success(state.reader.brands().await?)))
}

/// GET /api/motos/{id}
pub async fn listing_detail(
    State(state): State<DealerState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiData<ListingDetail>>, DealerError> {
    Ok(Json(ApiData::success(state.reader.detail(id).await?)))
}

/// POST /api/motos (multipart, `imagens[]`)
pub async fn create_listing(
    State(state): State<DealerState>,
    form: ListingForm,
) -> Result<(StatusCode, Json<ApiMessage>), DealerError> {
    if form.files.is_empty() {
        return Err(DealerError::validation("Nenhum arquivo de imagem enviado."));
    }
    let fields = ListingFields::from_form(&form.fields)?;
    let id = state.writer.create(fields, form.files).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiMessage::with_id("Moto cadastrada com sucesso!", id)),
    ))
}

/// PUT /api/motos/{id} (multipart, optional `imagens[]`)
pub async fn update_listing(
    State(state): State<DealerState>,
    ApiPath(id): ApiPath<i64>,
    form: ListingForm,
) -> Result<Json<ApiMessage>, DealerError> {
    let fields = ListingFields::from_form(&form.fields)?;
    state.writer.update(id, fields, form.files).await?;
    Ok(Json(ApiMessage::new("Moto atualizada com sucesso!")))
}

/// DELETE /api/motos/{id}
pub async fn delete_listing(
    State(state): State<DealerState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiMessage>, DealerError> {
    state.writer.delete(id).await?;
    Ok(Json(ApiMessage::new("Moto excluída com sucesso!")))
}

/// DELETE /api/imagens/{id}
pub async fn delete_image(
    State(state): State<DealerState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ApiMessage>, DealerError> {
    state.writer.delete_image(id).await?;
    Ok(Json(ApiMessage::new("Imagem excluída com sucesso!")))
}
