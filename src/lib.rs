//! Núcleo do livro de estoque por cartons de uma empresa: entrada e venda
//! com política de alocação FIFO, correções, diário de compras e vendas e
//! relatórios derivados (dashboard, resumo por produto, consolidado,
//! resumo mensal). A interface gráfica e os exportadores consomem este
//! núcleo pelo contrato de carregar/salvar e pelas visões serializáveis.

pub mod common;
pub mod config;
pub mod models;
pub mod services;
pub mod session;
pub mod store;

pub use common::AppError;
pub use config::AppState;
pub use session::CompanySession;
