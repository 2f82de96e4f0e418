// src/store/log_store.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::common::error::AppError;
use crate::models::transactions::TransactionEntry;
use crate::store::StoreHealth;

/// Escopo do diário: cada empresa tem um arquivo de compras e um de vendas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogScope {
    Sales,
    Purchase,
}

impl LogScope {
    fn suffix(&self) -> &'static str {
        match self {
            LogScope::Sales => "sales",
            LogScope::Purchase => "purchase",
        }
    }
}

/// Caminho do diário ao lado do arquivo de estoque da empresa:
/// `{nome}_sales_log.json` / `{nome}_purchase_log.json`.
pub fn log_path(stock_file: &Path, scope: LogScope) -> PathBuf {
    let stem = stock_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = format!("{}_{}_log.json", stem, scope.suffix());
    match stock_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(file_name),
        _ => PathBuf::from(file_name),
    }
}

/// Diário append-only de compras e vendas. O arquivo é relido e regravado
/// inteiro a cada inclusão, como no armazenamento do livro.
#[derive(Debug, Clone, Default)]
pub struct LogStore;

impl LogStore {
    pub fn new() -> Self {
        Self
    }

    pub fn load(
        &self,
        stock_file: &Path,
        scope: LogScope,
    ) -> Result<(Vec<TransactionEntry>, StoreHealth), AppError> {
        let path = log_path(stock_file, scope);
        if !path.exists() {
            fs::write(&path, "[]")?;
            return Ok((Vec::new(), StoreHealth::Missing));
        }
        let raw = fs::read_to_string(&path)?;
        match serde_json::from_str::<Vec<TransactionEntry>>(&raw) {
            Ok(entries) => Ok((entries, StoreHealth::Ok)),
            Err(e) => {
                tracing::warn!(
                    "Diário corrompido em {}: {}. Continuando com diário vazio.",
                    path.display(),
                    e
                );
                Ok((Vec::new(), StoreHealth::Corrupted))
            }
        }
    }

    pub fn append(
        &self,
        stock_file: &Path,
        scope: LogScope,
        entry: &TransactionEntry,
    ) -> Result<(), AppError> {
        let (mut entries, _) = self.load(stock_file, scope)?;
        entries.push(entry.clone());
        self.save(stock_file, scope, &entries)
    }

    /// Zera o diário. Usado pela limpeza manual de relatórios.
    pub fn clear(&self, stock_file: &Path, scope: LogScope) -> Result<(), AppError> {
        self.save(stock_file, scope, &[])
    }

    fn save(
        &self,
        stock_file: &Path,
        scope: LogScope,
        entries: &[TransactionEntry],
    ) -> Result<(), AppError> {
        let path = log_path(stock_file, scope);
        let raw = serde_json::to_string_pretty(entries)?;
        fs::write(&path, raw)?;
        Ok(())
    }
}
