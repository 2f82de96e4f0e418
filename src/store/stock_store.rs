// src/store/stock_store.rs

use std::fs;
use std::path::Path;

use crate::common::error::AppError;
use crate::models::stock::Carton;
use crate::store::StoreHealth;

/// Persistência do livro de cartons de uma empresa: um arquivo JSON por
/// empresa, gravado inteiro a cada salvamento.
#[derive(Debug, Clone, Default)]
pub struct StockStore;

impl StockStore {
    pub fn new() -> Self {
        Self
    }

    /// Carrega o livro. Arquivo ausente é criado vazio; arquivo corrompido
    /// volta como livro vazio com o marcador `Corrupted`.
    pub fn load(&self, path: &Path) -> Result<(Vec<Carton>, StoreHealth), AppError> {
        if !path.exists() {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(path, "[]")?;
            return Ok((Vec::new(), StoreHealth::Missing));
        }

        let raw = fs::read_to_string(path)?;
        match serde_json::from_str::<Vec<Carton>>(&raw) {
            Ok(cartons) => Ok((cartons, StoreHealth::Ok)),
            Err(e) => {
                tracing::warn!(
                    "Arquivo de estoque corrompido em {}: {}. Continuando com livro vazio.",
                    path.display(),
                    e
                );
                Ok((Vec::new(), StoreHealth::Corrupted))
            }
        }
    }

    /// Grava o livro inteiro. Falhas aparecem imediatamente para o chamador;
    /// nesse ponto o estado em memória já pode estar à frente do disco.
    pub fn save(&self, path: &Path, cartons: &[Carton]) -> Result<(), AppError> {
        let raw = serde_json::to_string_pretty(cartons)?;
        fs::write(path, raw)?;
        Ok(())
    }
}
