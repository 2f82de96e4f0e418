// src/common/error.rs

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::stock::ProductMatch;

fn format_candidates(candidates: &[ProductMatch]) -> String {
    candidates
        .iter()
        .map(|c| format!("{} ({})", c.product_id, c.product_name))
        .collect::<Vec<_>>()
        .join(", ")
}

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Faltas de estoque parciais NÃO passam por aqui: são aviso dentro do
// recibo de venda, nunca erro.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Nenhum estoque encontrado para '{0}'. Tente outro nome ou ID de produto.")]
    ProductNotFound(String),

    #[error(
        "A consulta '{query}' corresponde a mais de um produto: {}. Informe o ID exato do produto.",
        format_candidates(.candidates)
    )]
    ProductAmbiguous {
        query: String,
        candidates: Vec<ProductMatch>,
    },

    #[error("Carton '{0}' não encontrado.")]
    CartonNotFound(String),

    #[error("Carton '{carton_id}' já foi baixado em {date_outwarded} e não aceita mais alterações.")]
    CartonOutwarded {
        carton_id: String,
        date_outwarded: NaiveDate,
    },

    #[error("Nenhum estoque VENDÁVEL para '{0}'. Todo o estoque atual está baixado ou vencido.")]
    NoSellableStock(String),

    #[error("Empresa '{0}' não encontrada.")]
    CompanyNotFound(String),

    #[error("O ID de produto '{product_id}' já está em uso para '{existing_name}'.")]
    ProductNameConflict {
        product_id: String,
        existing_name: String,
    },

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    // Falhas de persistência aparecem imediatamente. O estado em memória já
    // foi alterado nesse ponto, então o chamador deve avisar que a visão
    // atual pode estar à frente do disco.
    #[error("Erro de E/S na persistência")]
    Io(#[from] std::io::Error),

    #[error("Erro de serialização JSON")]
    Json(#[from] serde_json::Error),

    // Variante genérica para qualquer outro erro inesperado.
    #[error("Erro interno")]
    Internal(#[from] anyhow::Error),
}
