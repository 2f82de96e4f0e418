// src/session.rs

use std::path::PathBuf;

use crate::models::stock::Carton;
use crate::store::StoreHealth;

/// O livro de uma empresa carregado em memória. Só uma empresa fica
/// residente por vez; trocar de empresa descarta esta sessão e carrega
/// outra do zero.
///
/// O empréstimo exclusivo (`&mut CompanySession`) garante um único
/// escritor lógico por vez. Uma exposição como serviço precisaria envolver
/// a sessão em um mutex por empresa para manter essa garantia.
#[derive(Debug)]
pub struct CompanySession {
    pub company: String,
    pub stock_file: PathBuf,
    pub ledger: Vec<Carton>,
    /// Estado observado no carregamento. `Corrupted` indica que o arquivo
    /// existia mas foi substituído por um livro vazio.
    pub health: StoreHealth,
}
