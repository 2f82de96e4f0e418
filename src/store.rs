pub mod company_store;
pub mod log_store;
pub mod stock_store;

pub use company_store::CompanyStore;
pub use log_store::{LogScope, LogStore};
pub use stock_store::StockStore;

/// Estado observado ao carregar um arquivo de dados. Corrupção não
/// interrompe o carregamento (a coleção volta vazia), mas deixa de ser
/// silenciosa: o chamador recebe o marcador e decide como avisar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreHealth {
    Ok,
    /// O arquivo não existia; uma coleção vazia foi criada.
    Missing,
    /// O arquivo existia mas não pôde ser lido como JSON válido.
    Corrupted,
}
