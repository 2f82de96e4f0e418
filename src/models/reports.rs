// src/models/reports.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

// Visões derivadas do livro de cartons. Tudo aqui é recalculado a partir
// dos dados crus e serializável, para que exportadores externos rendam os
// relatórios sem refazer contas.

// 1. Resumo geral (os cards do topo do dashboard)
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_live: u64,
    pub total_damaged_expired: u64,
    pub total_cartons: usize,
    pub total_stock_value: Decimal,
    pub low_stock_alerts: Vec<StockAlert>,
    pub expiry_alerts: Vec<ExpiryAlert>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StockAlert {
    pub product_id: String,
    pub product_name: String,
    pub carton_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpiryAlert {
    pub product_id: String,
    pub product_name: String,
    pub carton_id: String,
    pub expiry_date: NaiveDate,
    pub days_left: i64,
}

// 2. Resumo por produto (tela de busca de estoque)
#[derive(Debug, Clone, Serialize)]
pub struct ProductSummary {
    pub product_id: String,
    pub product_name: String,
    pub mrps: Vec<Decimal>,
    pub total_live_units: u64,
    pub total_damaged_units: u64,
    pub total_expired_units: u64,
    pub locations: Vec<String>,
    pub active_cartons: Vec<CartonDetail>,
    pub outwarded_cartons: Vec<String>,
    // Candidato FIFO: carton ativo não vencido mais antigo.
    pub oldest_carton_id: Option<String>,
    pub oldest_inwarded: Option<NaiveDate>,
    // Candidato FEFO: validade futura mais próxima entre os não vencidos.
    pub nearest_expiry_carton_id: Option<String>,
    pub nearest_expiry: Option<NaiveDate>,
    pub remarks: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CartonDetail {
    pub carton_id: String,
    pub quantity_per_carton: u32,
    pub damaged_units: u32,
    pub date_inwarded: NaiveDate,
    pub expiry_date: Option<NaiveDate>,
    pub is_expired: bool,
}

// 3. Visão consolidada da empresa (uma linha por produto)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    InStock,
    OutOfStock,
    AllExpired,
    SomeDamagedOrExpired,
}

impl StockStatus {
    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::InStock => "Em estoque",
            StockStatus::OutOfStock => "Sem estoque",
            StockStatus::AllExpired => "Tudo vencido",
            StockStatus::SomeDamagedOrExpired => "Avaria/vencimento parcial",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductRollup {
    pub product_id: String,
    pub product_name: String,
    pub live_cartons: u32,
    pub live_pieces: u64,
    pub damaged_expired_units: u64,
    pub earliest_inwarded: Option<NaiveDate>,
    pub earliest_expiry: Option<NaiveDate>,
    pub latest_outwarded: Option<NaiveDate>,
    // Médias aritméticas simples por carton, sem ponderar pela quantidade.
    pub avg_mrp: Option<Decimal>,
    pub avg_purchase_price: Option<Decimal>,
    pub avg_sales_price: Option<Decimal>,
    pub locations: Vec<String>,
    pub status: StockStatus,
}
