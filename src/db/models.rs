use crate::types::price::Price;
use serde::Serialize;
use sqlx::FromRow;

/// A vehicle-for-sale row. JSON keys follow the public API.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DbListing {
    pub id: i64,
    #[serde(rename = "marca")]
    pub brand: String,
    #[serde(rename = "modelo")]
    pub model: String,
    #[serde(rename = "ano")]
    pub year: i64,
    #[serde(rename = "km")]
    pub odometer_km: i64,
    #[serde(rename = "preco")]
    pub price: Price,
    /// Cover image path, also present in the listing's image rows.
    pub imagem_url: Option<String>,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "destaque")]
    pub featured: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
pub struct DbListingImage {
    pub id: i64,
    pub moto_id: i64,
    pub imagem_url: String,
}

/// Listing expanded with every image it owns, cover included.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ListingDetail {
    #[serde(flatten)]
    pub listing: DbListing,
    pub imagens: Vec<DbListingImage>,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbUser {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}
