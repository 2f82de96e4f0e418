pub mod reports;
pub mod stock;
pub mod transactions;

pub use reports::{DashboardStats, ProductRollup, ProductSummary, StockStatus};
pub use stock::{AddStockPayload, Carton, SaleReceipt, SellStockPayload, UpdateCartonPayload};
pub use transactions::{MonthlySummaryRow, TransactionEntry, TransactionKind};
