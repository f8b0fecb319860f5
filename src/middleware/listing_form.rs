use axum::extract::{FromRef, FromRequest, Multipart, Request};
use std::collections::HashMap;

use crate::error::DealerError;
use crate::types::listing::UploadedFile;

/// Multipart field names accepted for image uploads.
const IMAGE_FIELDS: [&str; 2] = ["imagens[]", "imagens"];

/// Per-request upload limits, taken from the router state.
#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    pub max_files: usize,
}

/// Raw multipart listing form: text fields by name plus image payloads.
#[derive(Debug, Default)]
pub struct ListingForm {
    pub fields: HashMap<String, String>,
    pub files: Vec<UploadedFile>,
}

impl<S> FromRequest<S> for ListingForm
where
    S: Send + Sync,
    UploadLimits: FromRef<S>,
{
    type Rejection = DealerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let limits = UploadLimits::from_ref(state);
        let mut multipart = Multipart::from_request(req, state).await?;
        let mut form = ListingForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            let Some(file_name) = field.file_name().map(str::to_string) else {
                let text = field.text().await?;
                form.fields.insert(name, text);
                continue;
            };

            let bytes = field.bytes().await?;
            // Browsers send an empty, nameless part for an untouched file input.
            if file_name.is_empty() && bytes.is_empty() {
                continue;
            }
            if !IMAGE_FIELDS.contains(&name.as_str()) {
                return Err(DealerError::validation(format!(
                    "campo de arquivo inesperado: `{name}`"
                )));
            }
            if form.files.len() >= limits.max_files {
                return Err(DealerError::validation(format!(
                    "no máximo {} imagens por envio",
                    limits.max_files
                )));
            }
            form.files.push(UploadedFile {
                file_name,
                bytes: bytes.to_vec(),
            });
        }

        Ok(form)
    }
}
