use axum::{Json, extract::State};
use serde::Deserialize;

use crate::error::DealerError;
use crate::middleware::extract::ApiQuery;
use crate::server::router::DealerState;
use crate::service::financing::FinancingQuote;
use crate::types::api::ApiData;
use crate::types::price::Price;

#[derive(Debug, Deserialize)]
pub struct FinancingQuery {
    pub valor: Option<String>,
    pub entrada: Option<String>,
    pub parcelas: Option<String>,
}

/// GET /api/financiamento?valor=&entrada=&parcelas=
pub async fn simulate(
    State(state): State<DealerState>,
    ApiQuery(q): ApiQuery<FinancingQuery>,
) -> Result<Json<ApiData<FinancingQuote>>, DealerError> {
    let valor = money(q.valor.as_deref(), "valor")?;
    let entrada = match q.entrada.as_deref().map(str::trim) {
        None | Some("") => Price::ZERO,
        Some(raw) => money(Some(raw), "entrada")?,
    };
    let parcelas = installments(q.parcelas.as_deref())?;
    let quote = state.financing.quote(valor, entrada, parcelas)?;
    Ok(Json(ApiData::success(quote)))
}

fn money(raw: Option<&str>, field: &str) -> Result<Price, DealerError> {
    raw.ok_or_else(|| DealerError::validation(format!("campo `{field}` é obrigatório")))?
        .parse::<Price>()
        .map_err(|e| DealerError::validation(format!("campo `{field}`: {e}")))
}

fn installments(raw: Option<&str>) -> Result<u32, DealerError> {
    match raw.map(str::trim) {
        None | Some("") => Err(DealerError::validation("campo `parcelas` é obrigatório")),
        Some(raw) => raw.parse::<u32>().map_err(|_| {
            DealerError::validation(format!("campo `parcelas`: número inválido `{raw}`"))
        }),
    }
}
