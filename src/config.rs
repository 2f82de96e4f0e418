// src/config.rs

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::Context;

use crate::common::error::AppError;
use crate::services::{DocumentService, FinanceService, ReportService, StockService};
use crate::session::CompanySession;
use crate::store::{CompanyStore, LogStore, StockStore};

/// Limites padrão dos alertas de estoque.
pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 10;
pub const DEFAULT_EXPIRY_SOON_DAYS: i64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub currency_symbol: String,
    pub low_stock_threshold: u32,
    pub expiry_soon_days: i64,
    /// Empresa aberta na inicialização do binário, se definida.
    pub startup_company: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let data_dir = PathBuf::from(env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()));
        let currency_symbol =
            env::var("CURRENCY_SYMBOL").unwrap_or_else(|_| "R$".to_string());
        let low_stock_threshold = match env::var("LOW_STOCK_THRESHOLD") {
            Ok(raw) => raw
                .parse()
                .context("LOW_STOCK_THRESHOLD deve ser um número inteiro")?,
            Err(_) => DEFAULT_LOW_STOCK_THRESHOLD,
        };
        let expiry_soon_days = match env::var("EXPIRY_SOON_DAYS") {
            Ok(raw) => raw
                .parse()
                .context("EXPIRY_SOON_DAYS deve ser um número inteiro")?,
            Err(_) => DEFAULT_EXPIRY_SOON_DAYS,
        };
        let startup_company = env::var("COMPANY").ok();

        Ok(Self {
            data_dir,
            currency_symbol,
            low_stock_threshold,
            expiry_soon_days,
            startup_company,
        })
    }
}

// O estado compartilhado que será acessível em toda a aplicação.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Config,
    pub stock_store: StockStore,
    pub log_store: LogStore,
    pub company_store: CompanyStore,
    pub stock_service: StockService,
    pub report_service: ReportService,
    pub finance_service: FinanceService,
    pub document_service: DocumentService,
}

impl AppState {
    pub fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = Config::from_env()?;
        Self::with_config(config)
    }

    pub fn with_config(config: Config) -> anyhow::Result<Self> {
        fs::create_dir_all(&config.data_dir)
            .with_context(|| format!("Falha ao criar o diretório {}", config.data_dir.display()))?;
        tracing::info!("✅ Diretório de dados pronto em {}", config.data_dir.display());

        // --- Monta o gráfico de dependências ---
        let stock_store = StockStore::new();
        let log_store = LogStore::new();
        let company_store = CompanyStore::new(config.data_dir.join("company_config.json"));
        let stock_service = StockService::new(stock_store.clone(), log_store.clone());
        let report_service =
            ReportService::new(config.low_stock_threshold, config.expiry_soon_days);
        let finance_service = FinanceService::new(log_store.clone());
        let document_service = DocumentService::new(config.currency_symbol.clone());

        Ok(Self {
            config,
            stock_store,
            log_store,
            company_store,
            stock_service,
            report_service,
            finance_service,
            document_service,
        })
    }

    pub fn companies(&self) -> Result<BTreeMap<String, PathBuf>, AppError> {
        let (companies, _) = self.company_store.load()?;
        Ok(companies)
    }

    /// Cadastra uma empresa nova. Sem caminho informado, o arquivo de
    /// estoque fica em `{data_dir}/{nome_normalizado}.json`.
    pub fn add_company(
        &self,
        name: &str,
        stock_file: Option<PathBuf>,
    ) -> Result<PathBuf, AppError> {
        let stock_file = stock_file.unwrap_or_else(|| {
            let slug = name
                .trim()
                .to_lowercase()
                .chars()
                .map(|c| if c.is_alphanumeric() { c } else { '_' })
                .collect::<String>();
            self.config.data_dir.join(format!("{}.json", slug))
        });

        let (mut companies, _) = self.company_store.load()?;
        companies.insert(name.trim().to_string(), stock_file.clone());
        self.company_store.save(&companies)?;

        // Garante que o arquivo de estoque exista desde já.
        self.stock_store.load(&stock_file)?;
        Ok(stock_file)
    }

    /// Carrega o livro da empresa do zero. A sessão anterior, se houver,
    /// deve ser simplesmente descartada pelo chamador.
    pub fn open_company(&self, name: &str) -> Result<CompanySession, AppError> {
        let (companies, _) = self.company_store.load()?;
        let stock_file = companies
            .get(name.trim())
            .cloned()
            .ok_or_else(|| AppError::CompanyNotFound(name.trim().to_string()))?;

        let (ledger, health) = self.stock_store.load(&stock_file)?;
        Ok(CompanySession {
            company: name.trim().to_string(),
            stock_file,
            ledger,
            health,
        })
    }
}
