pub mod document_service;
pub mod finance_service;
pub mod report_service;
pub mod search_service;
pub mod stock_service;

pub use document_service::DocumentService;
pub use finance_service::FinanceService;
pub use report_service::ReportService;
pub use stock_service::StockService;
