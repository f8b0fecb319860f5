use crate::db::models::{DbListing, ListingDetail};
use crate::db::sqlite::{ListingFilter, ListingsStorage, SqlitePool};
use crate::error::DealerError;

/// Query surface for the public catalog and the dashboard list.
#[derive(Clone)]
pub struct ListingReader {
    storage: ListingsStorage,
}

impl ListingReader {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            storage: ListingsStorage::new(pool),
        }
    }

    pub async fn list(&self, filter: ListingFilter) -> Result<Vec<DbListing>, DealerError> {
        self.storage.list(&normalize(filter)).await
    }

    pub async fn featured(&self) -> Result<Vec<DbListing>, DealerError> {
        self.storage.list_featured().await
    }

    pub async fn brands(&self) -> Result<Vec<String>, DealerError> {
        self.storage.distinct_brands().await
    }

    /// One listing with all of its images. The cover path shows up both on the
    /// listing and in `imagens`; clients merge by path.
    pub async fn detail(&self, id: i64) -> Result<ListingDetail, DealerError> {
        let listing = self
            .storage
            .get_by_id(id)
            .await?
            .ok_or_else(|| DealerError::not_found("Moto não encontrada"))?;
        let imagens = self.storage.images_for(id).await?;
        Ok(ListingDetail { listing, imagens })
    }
}

/// Empty query parameters (`?marca=&keyword=`) mean "no filter".
fn normalize(filter: ListingFilter) -> ListingFilter {
    let clean = |v: Option<String>| {
        v.map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };
    ListingFilter {
        brand: clean(filter.brand),
        keyword: clean(filter.keyword),
    }
}
