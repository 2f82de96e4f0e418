// src/services/search_service.rs

use crate::common::error::AppError;
use crate::models::stock::{Carton, ProductMatch, Suggestion};

/// Resolve uma consulta livre para exatamente um produto do livro.
///
/// Ordem de resolução, a primeira que casar vence:
/// 1. ID de produto exato (sem diferenciar maiúsculas). Vários cartons
///    compartilham o mesmo ID, então o resultado é único por construção e
///    nunca é sombreado por casamento de nome.
/// 2. Substring bidirecional no nome: o nome contém a consulta OU a
///    consulta contém o nome. Cobre tanto consultas truncadas quanto
///    consultas com palavras a mais.
pub fn resolve_product(query: &str, ledger: &[Carton]) -> Result<ProductMatch, AppError> {
    let query_lower = query.trim().to_lowercase();

    for carton in ledger {
        if carton.product_id.to_lowercase() == query_lower {
            return Ok(ProductMatch {
                product_id: carton.product_id.clone(),
                product_name: carton.product_name.clone(),
            });
        }
    }

    let mut candidates: Vec<ProductMatch> = Vec::new();
    for carton in ledger {
        let name_lower = carton.product_name.to_lowercase();
        if name_lower.contains(&query_lower) || query_lower.contains(&name_lower) {
            if !candidates.iter().any(|c| c.product_id == carton.product_id) {
                candidates.push(ProductMatch {
                    product_id: carton.product_id.clone(),
                    product_name: carton.product_name.clone(),
                });
            }
        }
    }

    match candidates.len() {
        0 => Err(AppError::ProductNotFound(query.trim().to_string())),
        1 => Ok(candidates.remove(0)),
        _ => Err(AppError::ProductAmbiguous {
            query: query.trim().to_string(),
            candidates,
        }),
    }
}

/// Lista deduplicada de produtos para o autocomplete do chamador,
/// ordenada por ID e nome.
pub fn product_suggestions(ledger: &[Carton]) -> Vec<Suggestion> {
    let mut suggestions: Vec<Suggestion> = Vec::new();
    for carton in ledger {
        let suggestion = Suggestion {
            product_id: carton.product_id.clone(),
            product_name: carton.product_name.clone(),
            mrp: carton.mrp,
        };
        if !suggestions.contains(&suggestion) {
            suggestions.push(suggestion);
        }
    }
    suggestions.sort_by(|a, b| {
        (&a.product_id, &a.product_name, a.mrp).cmp(&(&b.product_id, &b.product_name, b.mrp))
    });
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn carton(product_id: &str, product_name: &str) -> Carton {
        Carton::new(
            format!("{}-C01", product_id),
            product_id.to_string(),
            product_name.to_string(),
            "Apex".to_string(),
            10,
            0,
            "A-01".to_string(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            None,
            Decimal::new(1000, 2),
            Decimal::new(700, 2),
            Decimal::new(900, 2),
        )
        .unwrap()
    }

    #[test]
    fn id_exato_vence_casamento_de_nome() {
        // "ABC" é ID de um produto e substring do nome de outro: o ID
        // exato precisa vencer sem ambiguidade.
        let ledger = vec![carton("ABC", "Widget"), carton("XYZ", "ABC Gadget")];
        let found = resolve_product("ABC", &ledger).unwrap();
        assert_eq!(found.product_id, "ABC");
        assert_eq!(found.product_name, "Widget");
    }

    #[test]
    fn id_exato_ignora_maiusculas() {
        let ledger = vec![carton("ABC", "Widget")];
        let found = resolve_product("abc", &ledger).unwrap();
        assert_eq!(found.product_id, "ABC");
    }

    #[test]
    fn substring_em_ambas_direcoes() {
        let ledger = vec![carton("W1", "Widget Azul")];
        // Consulta truncada: nome contém consulta.
        assert_eq!(resolve_product("widget az", &ledger).unwrap().product_id, "W1");
        // Consulta com palavras a mais: consulta contém o nome.
        assert_eq!(
            resolve_product("caixa de widget azul grande", &ledger)
                .unwrap()
                .product_id,
            "W1"
        );
    }

    #[test]
    fn duas_correspondencias_distintas_sao_ambiguas() {
        let ledger = vec![carton("W1", "Widget Azul"), carton("W2", "Widget Verde")];
        let err = resolve_product("Widget", &ledger).unwrap_err();
        match err {
            AppError::ProductAmbiguous { query, candidates } => {
                assert_eq!(query, "Widget");
                assert_eq!(candidates.len(), 2);
                assert!(candidates.iter().any(|c| c.product_id == "W1"));
                assert!(candidates.iter().any(|c| c.product_id == "W2"));
            }
            other => panic!("esperava ambiguidade, veio {other:?}"),
        }
    }

    #[test]
    fn varios_cartons_do_mesmo_produto_nao_geram_ambiguidade() {
        let mut c2 = carton("W1", "Widget Azul");
        c2.carton_id = "W1-C02".to_string();
        let ledger = vec![carton("W1", "Widget Azul"), c2];
        assert_eq!(resolve_product("widget", &ledger).unwrap().product_id, "W1");
    }

    #[test]
    fn sem_correspondencia_cita_a_consulta() {
        let ledger = vec![carton("ABC", "Widget")];
        match resolve_product("inexistente", &ledger).unwrap_err() {
            AppError::ProductNotFound(q) => assert_eq!(q, "inexistente"),
            other => panic!("esperava ProductNotFound, veio {other:?}"),
        }
    }

    #[test]
    fn sugestoes_deduplicadas_e_ordenadas() {
        let mut c2 = carton("ABC", "Widget");
        c2.carton_id = "ABC-C02".to_string();
        let ledger = vec![carton("XYZ", "Gadget"), carton("ABC", "Widget"), c2];
        let suggestions = product_suggestions(&ledger);
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].product_id, "ABC");
        assert_eq!(suggestions[1].product_id, "XYZ");
    }
}
