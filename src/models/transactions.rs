// src/models/transactions.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Purchase, // Entrada de estoque
    Sale,     // Venda
}

/// Registro imutável do diário. Uma venda pode gerar vários registros,
/// um por carton tocado.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionEntry {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub product_id: String,
    pub product_name: String,
    pub carton_id: String,
    pub quantity: u32,
    #[serde(default)]
    pub purchase_price: Decimal,
    #[serde(default)]
    pub sales_price: Decimal,
    #[serde(default)]
    pub mrp: Decimal,
    #[serde(default)]
    pub purchase_value: Decimal,
    #[serde(default)]
    pub sales_value: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
}

impl TransactionEntry {
    /// Chave de agrupamento mensal (YYYY-MM).
    pub fn month(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }
}

/// Linha do resumo mensal, agrupada por (mês, produto).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummaryRow {
    pub month: String,
    pub product_id: String,
    pub product_name: String,
    pub units: u64,
    pub sales_value: Decimal,
    pub purchase_value: Decimal,
    pub profit_loss: Decimal,
    pub profit_margin_pct: Decimal,
    // Médias simples dos preços unitários dos registros do grupo.
    pub avg_sales_price: Decimal,
    pub avg_purchase_price: Decimal,
}
