use super::price::Price;
use crate::error::DealerError;
use std::collections::HashMap;

const MIN_YEAR: i64 = 1900;
const MAX_YEAR: i64 = 2100;

/// Validated text fields of a listing write (create or full-overwrite update).
#[derive(Debug, Clone, PartialEq)]
pub struct ListingFields {
    pub brand: String,
    pub model: String,
    pub year: i64,
    pub odometer_km: i64,
    pub price: Price,
    pub description: Option<String>,
    pub featured: bool,
}

/// One uploaded file as received from the client.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ListingFields {
    /// Build from raw form text keyed by the wire field names
    /// (`marca`, `modelo`, `ano`, `km`, `preco`, `descricao`, `destaque`).
    pub fn from_form(form: &HashMap<String, String>) -> Result<Self, DealerError> {
        let brand = required_text(form, "marca")?;
        let model = required_text(form, "modelo")?;

        let year = required_int(form, "ano")?;
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(DealerError::validation(format!(
                "campo `ano` fora do intervalo {MIN_YEAR}-{MAX_YEAR}"
            )));
        }

        let odometer_km = required_int(form, "km")?;
        if odometer_km < 0 {
            return Err(DealerError::validation("campo `km` não pode ser negativo"));
        }

        let price = required(form, "preco")?
            .parse::<Price>()
            .map_err(|e| DealerError::validation(format!("campo `preco`: {e}")))?;

        let description = form
            .get("descricao")
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let featured = match form.get("destaque").map(|s| s.trim()) {
            None | Some("") => false,
            Some(v) => parse_flag(v).ok_or_else(|| {
                DealerError::validation(format!("campo `destaque` inválido: `{v}`"))
            })?,
        };

        Ok(Self {
            brand,
            model,
            year,
            odometer_km,
            price,
            description,
            featured,
        })
    }
}

fn required<'a>(form: &'a HashMap<String, String>, key: &str) -> Result<&'a str, DealerError> {
    form.get(key)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| DealerError::validation(format!("campo `{key}` é obrigatório")))
}

fn required_text(form: &HashMap<String, String>, key: &str) -> Result<String, DealerError> {
    required(form, key).map(str::to_string)
}

fn required_int(form: &HashMap<String, String>, key: &str) -> Result<i64, DealerError> {
    let raw = required(form, key)?;
    raw.parse::<i64>()
        .map_err(|_| DealerError::validation(format!("campo `{key}` deve ser um número inteiro")))
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" => Some(true),
        "0" | "false" | "off" => Some(false),
        _ => None,
    }
}
