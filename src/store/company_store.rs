// src/store/company_store.rs

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use crate::common::error::AppError;
use crate::store::StoreHealth;

/// Registro de empresas: um único objeto JSON mapeando nome da empresa
/// para o arquivo de estoque correspondente.
#[derive(Debug, Clone)]
pub struct CompanyStore {
    config_path: PathBuf,
}

impl CompanyStore {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub fn load(&self) -> Result<(BTreeMap<String, PathBuf>, StoreHealth), AppError> {
        if !self.config_path.exists() {
            return Ok((BTreeMap::new(), StoreHealth::Missing));
        }
        let raw = fs::read_to_string(&self.config_path)?;
        match serde_json::from_str::<BTreeMap<String, PathBuf>>(&raw) {
            Ok(companies) => Ok((companies, StoreHealth::Ok)),
            Err(e) => {
                tracing::warn!(
                    "Registro de empresas corrompido em {}: {}. Continuando com registro vazio.",
                    self.config_path.display(),
                    e
                );
                Ok((BTreeMap::new(), StoreHealth::Corrupted))
            }
        }
    }

    pub fn save(&self, companies: &BTreeMap<String, PathBuf>) -> Result<(), AppError> {
        if let Some(parent) = self.config_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string_pretty(companies)?;
        fs::write(&self.config_path, raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn registro_ausente_volta_vazio_sem_criar_arquivo() {
        let dir = tempdir().unwrap();
        let store = CompanyStore::new(dir.path().join("company_config.json"));

        let (companies, health) = store.load().unwrap();
        assert!(companies.is_empty());
        assert_eq!(health, StoreHealth::Missing);
    }

    #[test]
    fn ida_e_volta_do_registro() {
        let dir = tempdir().unwrap();
        let store = CompanyStore::new(dir.path().join("company_config.json"));

        let mut companies = BTreeMap::new();
        companies.insert("Apex".to_string(), dir.path().join("apex.json"));
        companies.insert("Tech".to_string(), dir.path().join("tech.json"));
        store.save(&companies).unwrap();

        let (loaded, health) = store.load().unwrap();
        assert_eq!(health, StoreHealth::Ok);
        assert_eq!(loaded, companies);
    }
}
