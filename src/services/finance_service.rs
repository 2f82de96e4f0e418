// src/services/finance_service.rs

use std::collections::BTreeMap;
use std::path::Path;

use rust_decimal::Decimal;

use crate::common::error::AppError;
use crate::models::transactions::{MonthlySummaryRow, TransactionEntry, TransactionKind};
use crate::store::{LogScope, LogStore};

/// Resumos mensais e histórico a partir dos diários de compra e venda.
#[derive(Debug, Clone)]
pub struct FinanceService {
    log_store: LogStore,
}

impl FinanceService {
    pub fn new(log_store: LogStore) -> Self {
        Self { log_store }
    }

    pub fn monthly_summary(
        &self,
        stock_file: &Path,
        scope: LogScope,
    ) -> Result<Vec<MonthlySummaryRow>, AppError> {
        let (entries, _) = self.log_store.load(stock_file, scope)?;
        let kind = match scope {
            LogScope::Sales => TransactionKind::Sale,
            LogScope::Purchase => TransactionKind::Purchase,
        };
        Ok(summarize_entries(&entries, kind))
    }

    /// Histórico combinado de compras e vendas, mais recentes primeiro.
    pub fn transaction_history(
        &self,
        stock_file: &Path,
    ) -> Result<Vec<TransactionEntry>, AppError> {
        let (purchases, _) = self.log_store.load(stock_file, LogScope::Purchase)?;
        let (sales, _) = self.log_store.load(stock_file, LogScope::Sales)?;

        let mut all: Vec<TransactionEntry> = purchases;
        all.extend(sales);
        all.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(all)
    }

    pub fn clear_log(&self, stock_file: &Path, scope: LogScope) -> Result<(), AppError> {
        self.log_store.clear(stock_file, scope)
    }
}

/// Agrupa os lançamentos por (mês, produto) e soma unidades e valores.
/// Os preços unitários informados são médias simples dos lançamentos do
/// grupo, sem ponderar pela quantidade.
pub fn summarize_entries(
    entries: &[TransactionEntry],
    kind: TransactionKind,
) -> Vec<MonthlySummaryRow> {
    #[derive(Default)]
    struct Acc {
        units: u64,
        sales_value: Decimal,
        purchase_value: Decimal,
        sales_price_sum: Decimal,
        purchase_price_sum: Decimal,
        count: u32,
    }

    let mut groups: BTreeMap<(String, String, String), Acc> = BTreeMap::new();
    for entry in entries.iter().filter(|e| e.kind == kind) {
        let key = (
            entry.month(),
            entry.product_id.clone(),
            entry.product_name.clone(),
        );
        let acc = groups.entry(key).or_default();
        acc.units += u64::from(entry.quantity);
        acc.sales_value += entry.sales_value;
        acc.purchase_value += entry.purchase_value;
        acc.sales_price_sum += entry.sales_price;
        acc.purchase_price_sum += entry.purchase_price;
        acc.count += 1;
    }

    groups
        .into_iter()
        .map(|((month, product_id, product_name), acc)| {
            let profit_loss = acc.sales_value - acc.purchase_value;
            let profit_margin_pct = if acc.purchase_value > Decimal::ZERO {
                profit_loss / acc.purchase_value * Decimal::from(100)
            } else {
                Decimal::ZERO
            };
            let count = Decimal::from(acc.count.max(1));
            MonthlySummaryRow {
                month,
                product_id,
                product_name,
                units: acc.units,
                sales_value: acc.sales_value,
                purchase_value: acc.purchase_value,
                profit_loss,
                profit_margin_pct,
                avg_sales_price: acc.sales_price_sum / count,
                avg_purchase_price: acc.purchase_price_sum / count,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;
    use uuid::Uuid;

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn sale(
        month_day: (i32, u32, u32),
        product_id: &str,
        quantity: u32,
        sales_value: &str,
        purchase_value: &str,
    ) -> TransactionEntry {
        let (y, m, d) = month_day;
        TransactionEntry {
            id: Uuid::new_v4(),
            date: Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap(),
            product_id: product_id.to_string(),
            product_name: format!("Produto {}", product_id),
            carton_id: format!("{}-C01", product_id),
            quantity,
            purchase_price: dec("8.00"),
            sales_price: dec("10.00"),
            mrp: dec("12.00"),
            purchase_value: dec(purchase_value),
            sales_value: dec(sales_value),
            kind: TransactionKind::Sale,
        }
    }

    #[test]
    fn agrupa_por_mes_e_produto_em_ordem_crescente() {
        let entries = vec![
            sale((2024, 2, 10), "ABC", 5, "50.00", "40.00"),
            sale((2024, 1, 20), "ABC", 3, "30.00", "24.00"),
            sale((2024, 1, 5), "ABC", 2, "20.00", "16.00"),
            sale((2024, 1, 7), "XYZ", 1, "15.00", "9.00"),
        ];

        let rows = summarize_entries(&entries, TransactionKind::Sale);
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].month, "2024-01");
        assert_eq!(rows[0].product_id, "ABC");
        assert_eq!(rows[0].units, 5);
        assert_eq!(rows[0].sales_value, dec("50.00"));
        assert_eq!(rows[0].profit_loss, dec("10.00"));

        assert_eq!(rows[1].month, "2024-01");
        assert_eq!(rows[1].product_id, "XYZ");

        assert_eq!(rows[2].month, "2024-02");
        assert_eq!(rows[2].units, 5);
    }

    #[test]
    fn soma_das_unidades_bate_com_os_lancamentos() {
        let entries = vec![
            sale((2024, 1, 5), "ABC", 2, "20.00", "16.00"),
            sale((2024, 1, 20), "ABC", 3, "30.00", "24.00"),
            sale((2024, 2, 10), "ABC", 5, "50.00", "40.00"),
            sale((2024, 3, 1), "XYZ", 7, "70.00", "42.00"),
        ];

        let rows = summarize_entries(&entries, TransactionKind::Sale);
        let total_agrupado: u64 = rows.iter().map(|r| r.units).sum();
        let total_lancado: u64 = entries.iter().map(|e| u64::from(e.quantity)).sum();
        assert_eq!(total_agrupado, total_lancado);
    }

    #[test]
    fn margem_com_custo_zero_e_zero() {
        let entries = vec![sale((2024, 1, 5), "ABC", 2, "20.00", "0.00")];
        let rows = summarize_entries(&entries, TransactionKind::Sale);
        assert_eq!(rows[0].profit_margin_pct, Decimal::ZERO);
    }

    #[test]
    fn margem_percentual_sobre_o_custo() {
        let entries = vec![sale((2024, 1, 5), "ABC", 2, "25.00", "20.00")];
        let rows = summarize_entries(&entries, TransactionKind::Sale);
        assert_eq!(rows[0].profit_margin_pct, dec("25.00"));
    }

    #[test]
    fn preco_medio_e_media_simples_dos_lancamentos() {
        let mut caro = sale((2024, 1, 5), "ABC", 1, "14.00", "0.00");
        caro.sales_price = dec("14.00");
        let mut barato = sale((2024, 1, 20), "ABC", 100, "600.00", "0.00");
        barato.sales_price = dec("6.00");

        let rows = summarize_entries(&[caro, barato], TransactionKind::Sale);
        // Média simples: (14 + 6) / 2, ignorando quantidades.
        assert_eq!(rows[0].avg_sales_price, dec("10.00"));
    }

    #[test]
    fn lancamentos_de_outro_tipo_ficam_de_fora() {
        let mut compra = sale((2024, 1, 5), "ABC", 2, "0.00", "16.00");
        compra.kind = TransactionKind::Purchase;
        let venda = sale((2024, 1, 7), "ABC", 3, "30.00", "24.00");

        let rows = summarize_entries(&[compra, venda], TransactionKind::Sale);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].units, 3);
    }

    #[test]
    fn historico_combina_e_ordena_do_mais_recente() {
        let dir = tempdir().unwrap();
        let stock_file = dir.path().join("apex.json");
        let store = LogStore::new();
        let service = FinanceService::new(store.clone());

        let mut compra = sale((2024, 1, 5), "ABC", 10, "0.00", "80.00");
        compra.kind = TransactionKind::Purchase;
        let venda = sale((2024, 2, 10), "ABC", 4, "40.00", "32.00");

        store
            .append(&stock_file, LogScope::Purchase, &compra)
            .unwrap();
        store.append(&stock_file, LogScope::Sales, &venda).unwrap();

        let history = service.transaction_history(&stock_file).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].kind, TransactionKind::Sale);
        assert_eq!(history[1].kind, TransactionKind::Purchase);
    }
}
