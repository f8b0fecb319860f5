use crate::error::DealerError;
use crate::types::price::Price;
use rust_decimal::Decimal;
use serde::Serialize;

pub const MAX_INSTALLMENTS: u32 = 120;

/// Installment quote under the French ("Price") amortization table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FinancingQuote {
    pub valor: Price,
    /// Down payment after clamping to the vehicle price.
    pub entrada: Price,
    pub valor_financiado: Price,
    pub parcelas: u32,
    pub taxa_mensal: Decimal,
    pub parcela: Price,
}

#[derive(Debug, Clone, Copy)]
pub struct FinancingSimulator {
    monthly_rate: Decimal,
}

impl FinancingSimulator {
    pub fn new(monthly_rate: Decimal) -> Self {
        Self { monthly_rate }
    }

    pub fn quote(
        &self,
        price: Price,
        down_payment: Price,
        installments: u32,
    ) -> Result<FinancingQuote, DealerError> {
        if !(1..=MAX_INSTALLMENTS).contains(&installments) {
            return Err(DealerError::validation(format!(
                "campo `parcelas` deve estar entre 1 e {MAX_INSTALLMENTS}"
            )));
        }
        if self.monthly_rate.is_sign_negative() {
            return Err(DealerError::validation("taxa mensal inválida"));
        }

        let entrada = down_payment.min(price);
        let financed = Price::from_cents(price.cents() - entrada.cents());
        let amount = financed.as_decimal();
        let n = Decimal::from(installments);

        let parcela = if financed.cents() <= 0 {
            Price::ZERO
        } else if self.monthly_rate.is_zero() {
            Price::from_decimal_rounded(amount / n)
        } else {
            let i = self.monthly_rate;
            let mut growth = Decimal::ONE;
            for _ in 0..installments {
                growth = growth.checked_mul(Decimal::ONE + i).ok_or_else(out_of_range)?;
            }
            let raw = i
                .checked_mul(growth)
                .and_then(|factor| amount.checked_mul(factor))
                .and_then(|num| num.checked_div(growth - Decimal::ONE))
                .ok_or_else(out_of_range)?;
            Price::from_decimal_rounded(raw)
        };

        Ok(FinancingQuote {
            valor: price,
            entrada,
            valor_financiado: financed,
            parcelas: installments,
            taxa_mensal: self.monthly_rate,
            parcela,
        })
    }
}

fn out_of_range() -> DealerError {
    DealerError::validation("valores fora do intervalo suportado")
}
