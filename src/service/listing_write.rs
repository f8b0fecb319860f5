use crate::db::sqlite::{ListingsStorage, SqlitePool};
use crate::error::DealerError;
use crate::service::image_store::{ImageStore, StoredImage};
use crate::types::listing::{ListingFields, UploadedFile};
use tracing::{info, warn};

/// Create/update/delete of listings and their image sets.
///
/// Multi-table writes run on one pooled connection inside one transaction.
/// A dropped transaction rolls back, so every early return below leaves the
/// store untouched; files ingested for that request are then discarded.
#[derive(Clone)]
pub struct ListingWriter {
    pool: SqlitePool,
    storage: ListingsStorage,
    images: ImageStore,
}

impl ListingWriter {
    pub fn new(pool: SqlitePool, images: ImageStore) -> Self {
        Self {
            storage: ListingsStorage::new(pool.clone()),
            pool,
            images,
        }
    }

    /// Insert a listing with at least one image; the first image becomes the cover.
    pub async fn create(
        &self,
        fields: ListingFields,
        files: Vec<UploadedFile>,
    ) -> Result<i64, DealerError> {
        if files.is_empty() {
            return Err(DealerError::validation("Nenhum arquivo de imagem enviado."));
        }

        let stored = self.images.ingest(&files).await?;
        match self.create_rows(&fields, &stored).await {
            Ok(id) => {
                info!(
                    id,
                    brand = %fields.brand,
                    model = %fields.model,
                    images = stored.len(),
                    "listing created"
                );
                Ok(id)
            }
            Err(e) => {
                warn!(error = %e, "listing create rolled back");
                self.images.discard(&stored).await;
                Err(e)
            }
        }
    }

    async fn create_rows(
        &self,
        fields: &ListingFields,
        stored: &[StoredImage],
    ) -> Result<i64, DealerError> {
        let cover = stored
            .first()
            .map(|img| img.path_ref.as_str())
            .ok_or_else(|| DealerError::validation("Nenhum arquivo de imagem enviado."))?;

        let mut tx = self.pool.begin().await?;
        let id = ListingsStorage::insert_listing(&mut tx, fields, cover).await?;
        for img in stored {
            ListingsStorage::insert_image(&mut tx, id, &img.path_ref).await?;
        }
        tx.commit().await?;
        Ok(id)
    }

    /// Overwrite every text field. New images, if any, are appended to the
    /// listing's set and the first of them becomes the cover.
    ///
    /// Files are written before the transaction opens so no filesystem I/O
    /// happens while the write lock is held.
    pub async fn update(
        &self,
        id: i64,
        fields: ListingFields,
        files: Vec<UploadedFile>,
    ) -> Result<(), DealerError> {
        let stored = if files.is_empty() {
            Vec::new()
        } else {
            self.images.ingest(&files).await?
        };

        match self.update_rows(id, &fields, &stored).await {
            Ok(()) => {
                info!(id, images = stored.len(), "listing updated");
                Ok(())
            }
            Err(e) => {
                warn!(id, error = %e, "listing update rolled back");
                self.images.discard(&stored).await;
                Err(e)
            }
        }
    }

    async fn update_rows(
        &self,
        id: i64,
        fields: &ListingFields,
        stored: &[StoredImage],
    ) -> Result<(), DealerError> {
        let mut tx = self.pool.begin().await?;
        if !ListingsStorage::update_fields(&mut tx, id, fields).await? {
            return Err(listing_not_found());
        }
        for img in stored {
            ListingsStorage::insert_image(&mut tx, id, &img.path_ref).await?;
        }
        if let Some(cover) = stored.first() {
            ListingsStorage::set_cover(&mut tx, id, &cover.path_ref).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Remove a listing and, through the cascade, all its image rows.
    /// Files on disk are left in place.
    pub async fn delete(&self, id: i64) -> Result<(), DealerError> {
        if !self.storage.delete_listing(id).await? {
            return Err(listing_not_found());
        }
        info!(id, "listing deleted");
        Ok(())
    }

    /// Remove a single image row. Nothing stops removing the cover's row or
    /// the last image; the listing's own `imagem_url` is left as is.
    pub async fn delete_image(&self, image_id: i64) -> Result<(), DealerError> {
        if !self.storage.delete_image(image_id).await? {
            return Err(DealerError::not_found("Imagem não encontrada"));
        }
        info!(image_id, "listing image deleted");
        Ok(())
    }
}

fn listing_not_found() -> DealerError {
    DealerError::not_found("Moto não encontrada")
}
