// src/services/report_service.rs

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::common::dates;
use crate::common::error::AppError;
use crate::models::reports::{
    CartonDetail, DashboardStats, ExpiryAlert, ProductRollup, ProductSummary, StockAlert,
    StockStatus,
};
use crate::models::stock::Carton;

/// Agregador de visões derivadas. Tudo recalculado do livro cru; nenhum
/// total é armazenado.
#[derive(Debug, Clone)]
pub struct ReportService {
    low_stock_threshold: u32,
    expiry_soon_days: i64,
}

impl ReportService {
    pub fn new(low_stock_threshold: u32, expiry_soon_days: i64) -> Self {
        Self {
            low_stock_threshold,
            expiry_soon_days,
        }
    }

    // --- RESUMO POR PRODUTO ---
    // Regra de classificação por carton ativo:
    //   vencido  -> soma em vencidos E em avariados (vencido é subconjunto
    //               de invendável), nunca em vivos;
    //   não vencido -> quantidade em vivos, avaria física em avariados.
    // Cartons baixados ficam de fora dos totais e aparecem só como
    // histórico informativo.
    pub fn summarize(
        &self,
        ledger: &[Carton],
        product_id: &str,
        reference: NaiveDate,
    ) -> Result<ProductSummary, AppError> {
        let found: Vec<&Carton> = ledger
            .iter()
            .filter(|c| c.product_id == product_id)
            .collect();
        if found.is_empty() {
            return Err(AppError::ProductNotFound(product_id.to_string()));
        }
        let product_name = found[0].product_name.clone();

        let mut mrps: Vec<Decimal> = Vec::new();
        let mut locations: BTreeSet<String> = BTreeSet::new();
        let mut total_live: u64 = 0;
        let mut total_damaged: u64 = 0;
        let mut total_expired: u64 = 0;
        let mut active_cartons: Vec<CartonDetail> = Vec::new();
        let mut outwarded_cartons: Vec<String> = Vec::new();

        // (data, carton_id) dos candidatos FIFO e FEFO.
        let mut oldest: Option<(NaiveDate, String)> = None;
        let mut nearest: Option<(NaiveDate, String)> = None;

        for carton in &found {
            if !carton.is_active() {
                outwarded_cartons.push(carton.carton_id.clone());
                continue;
            }

            locations.insert(carton.location.clone());
            if !mrps.contains(&carton.mrp) {
                mrps.push(carton.mrp);
            }

            let expired = carton.is_expired(reference);
            if expired {
                total_expired += u64::from(carton.quantity_per_carton);
                total_damaged += u64::from(carton.quantity_per_carton);
            } else {
                total_live += u64::from(carton.quantity_per_carton);
                total_damaged += u64::from(carton.damaged_units);

                if oldest
                    .as_ref()
                    .is_none_or(|(date, _)| carton.date_inwarded < *date)
                {
                    oldest = Some((carton.date_inwarded, carton.carton_id.clone()));
                }
                // Não vencido implica validade futura, então o rastreio FEFO
                // já exclui os que viraram contagem de vencidos.
                if let Some(expiry) = carton.expiry_date {
                    if nearest.as_ref().is_none_or(|(date, _)| expiry < *date) {
                        nearest = Some((expiry, carton.carton_id.clone()));
                    }
                }
            }

            active_cartons.push(CartonDetail {
                carton_id: carton.carton_id.clone(),
                quantity_per_carton: carton.quantity_per_carton,
                damaged_units: carton.damaged_units,
                date_inwarded: carton.date_inwarded,
                expiry_date: carton.expiry_date,
                is_expired: expired,
            });
        }

        mrps.sort();
        // Validade crescente (sem validade por último), depois entrada.
        active_cartons
            .sort_by_key(|d| (d.expiry_date.unwrap_or(NaiveDate::MAX), d.date_inwarded));

        let remarks = self.build_remarks(reference, &oldest, &nearest, &outwarded_cartons);

        Ok(ProductSummary {
            product_id: product_id.to_string(),
            product_name,
            mrps,
            total_live_units: total_live,
            total_damaged_units: total_damaged,
            total_expired_units: total_expired,
            locations: locations.into_iter().collect(),
            active_cartons,
            outwarded_cartons,
            oldest_carton_id: oldest.as_ref().map(|(_, id)| id.clone()),
            oldest_inwarded: oldest.as_ref().map(|(date, _)| *date),
            nearest_expiry_carton_id: nearest.as_ref().map(|(_, id)| id.clone()),
            nearest_expiry: nearest.as_ref().map(|(date, _)| *date),
            remarks,
        })
    }

    // Avisos FIFO e FEFO são sinais independentes e podem sair juntos.
    fn build_remarks(
        &self,
        reference: NaiveDate,
        oldest: &Option<(NaiveDate, String)>,
        nearest: &Option<(NaiveDate, String)>,
        outwarded: &[String],
    ) -> Vec<String> {
        let mut remarks = Vec::new();

        if let Some((date, carton_id)) = oldest {
            let days_old = (reference - *date).num_days();
            if days_old > 90 {
                remarks.push(format!(
                    "O carton {} (entrada em {}) é estoque antigo. Priorize a venda dele (FIFO).",
                    carton_id, date
                ));
            } else {
                remarks.push(format!(
                    "O estoque vendável mais antigo é o carton {} (entrada em {}).",
                    carton_id, date
                ));
            }
        }

        if let Some((date, carton_id)) = nearest {
            let days_to_expiry = dates::days_until(*date, reference);
            if days_to_expiry <= 0 {
                // Já contabilizado como vencido; aviso suprimido.
            } else if days_to_expiry <= 60 {
                remarks.push(format!(
                    "URGENTE! O carton {} vence em {} (daqui a {} dias). Priorize a venda dele (FEFO).",
                    carton_id, date, days_to_expiry
                ));
            } else if days_to_expiry <= 180 {
                remarks.push(format!(
                    "Atenção: o carton {} vence em {} (daqui a {} dias). Acompanhe esse estoque.",
                    carton_id, date, days_to_expiry
                ));
            } else {
                remarks.push(format!(
                    "O estoque vendável com vencimento mais próximo é o carton {} (vence em {}).",
                    carton_id, date
                ));
            }
        }

        if !outwarded.is_empty() {
            remarks.push(format!(
                "Alguns cartons deste produto ({}) já foram baixados anteriormente.",
                outwarded.join(", ")
            ));
        }

        remarks
    }

    // --- DASHBOARD ---
    // Dobra sobre o livro inteiro com a mesma regra de classificação do
    // resumo por produto. O valor de estoque considera só cartons vivos.
    pub fn dashboard_stats(&self, ledger: &[Carton], reference: NaiveDate) -> DashboardStats {
        let mut total_live: u64 = 0;
        let mut total_damaged_expired: u64 = 0;
        let mut total_stock_value = Decimal::ZERO;
        let mut low_stock_alerts: Vec<StockAlert> = Vec::new();
        let mut expiry_alerts: Vec<ExpiryAlert> = Vec::new();

        for carton in ledger.iter().filter(|c| c.is_active()) {
            if carton.is_expired(reference) {
                total_damaged_expired += u64::from(carton.quantity_per_carton);
                continue;
            }

            total_live += u64::from(carton.quantity_per_carton);
            total_damaged_expired += u64::from(carton.damaged_units);
            total_stock_value += Decimal::from(carton.quantity_per_carton) * carton.mrp;

            if carton.quantity_per_carton <= self.low_stock_threshold {
                low_stock_alerts.push(StockAlert {
                    product_id: carton.product_id.clone(),
                    product_name: carton.product_name.clone(),
                    carton_id: carton.carton_id.clone(),
                    quantity: carton.quantity_per_carton,
                });
            }

            if let Some(expiry) = carton.expiry_date {
                let days_left = dates::days_until(expiry, reference);
                // Dia zero já é vencido (contagem inclusiva), então a
                // janela de alerta começa em 1.
                if days_left > 0 && days_left <= self.expiry_soon_days {
                    expiry_alerts.push(ExpiryAlert {
                        product_id: carton.product_id.clone(),
                        product_name: carton.product_name.clone(),
                        carton_id: carton.carton_id.clone(),
                        expiry_date: expiry,
                        days_left,
                    });
                }
            }
        }

        DashboardStats {
            total_live,
            total_damaged_expired,
            total_cartons: ledger.len(),
            total_stock_value,
            low_stock_alerts,
            expiry_alerts,
        }
    }

    // --- VISÃO CONSOLIDADA DA EMPRESA ---
    // Uma linha por produto, ordenada pelo ID. Médias de preço são
    // aritméticas simples por carton, sem ponderar pela quantidade.
    pub fn aggregate_by_product(
        &self,
        ledger: &[Carton],
        reference: NaiveDate,
    ) -> Vec<ProductRollup> {
        #[derive(Default)]
        struct Acc {
            product_name: String,
            locations: BTreeSet<String>,
            live_cartons: u32,
            live_pieces: u64,
            damaged_expired: u64,
            earliest_inwarded: Option<NaiveDate>,
            earliest_expiry: Option<NaiveDate>,
            latest_outwarded: Option<NaiveDate>,
            has_expired: bool,
            has_damaged: bool,
            mrp_sum: Decimal,
            mrp_count: u32,
            purchase_sum: Decimal,
            purchase_count: u32,
            sales_sum: Decimal,
            sales_count: u32,
        }

        let mut groups: BTreeMap<String, Acc> = BTreeMap::new();

        for carton in ledger {
            let acc = groups.entry(carton.product_id.clone()).or_default();
            if acc.product_name.is_empty() {
                acc.product_name = carton.product_name.clone();
            }
            acc.locations.insert(carton.location.clone());

            if !carton.is_active() {
                if let Some(date) = carton.date_outwarded {
                    if acc.latest_outwarded.is_none_or(|latest| date > latest) {
                        acc.latest_outwarded = Some(date);
                    }
                }
                continue;
            }

            if carton.is_expired(reference) {
                acc.has_expired = true;
                acc.damaged_expired += u64::from(carton.quantity_per_carton);
                continue;
            }

            acc.live_cartons += 1;
            acc.live_pieces += u64::from(carton.quantity_per_carton);
            acc.damaged_expired += u64::from(carton.damaged_units);
            if carton.damaged_units > 0 {
                acc.has_damaged = true;
            }
            if acc
                .earliest_inwarded
                .is_none_or(|earliest| carton.date_inwarded < earliest)
            {
                acc.earliest_inwarded = Some(carton.date_inwarded);
            }
            if let Some(expiry) = carton.expiry_date {
                if acc.earliest_expiry.is_none_or(|earliest| expiry < earliest) {
                    acc.earliest_expiry = Some(expiry);
                }
            }

            if carton.mrp > Decimal::ZERO {
                acc.mrp_sum += carton.mrp;
                acc.mrp_count += 1;
            }
            if carton.purchase_price > Decimal::ZERO {
                acc.purchase_sum += carton.purchase_price;
                acc.purchase_count += 1;
            }
            if carton.sales_price > Decimal::ZERO {
                acc.sales_sum += carton.sales_price;
                acc.sales_count += 1;
            }
        }

        groups
            .into_iter()
            .map(|(product_id, acc)| {
                // Prioridade: sem estoque > tudo vencido > avaria parcial.
                let status = if acc.live_pieces == 0 && acc.damaged_expired == 0 {
                    StockStatus::OutOfStock
                } else if acc.has_expired && acc.live_pieces == 0 {
                    StockStatus::AllExpired
                } else if acc.has_expired || acc.has_damaged {
                    StockStatus::SomeDamagedOrExpired
                } else {
                    StockStatus::InStock
                };

                let avg = |sum: Decimal, count: u32| {
                    (count > 0).then(|| sum / Decimal::from(count))
                };

                ProductRollup {
                    product_id,
                    product_name: acc.product_name,
                    live_cartons: acc.live_cartons,
                    live_pieces: acc.live_pieces,
                    damaged_expired_units: acc.damaged_expired,
                    earliest_inwarded: acc.earliest_inwarded,
                    earliest_expiry: acc.earliest_expiry,
                    latest_outwarded: acc.latest_outwarded,
                    avg_mrp: avg(acc.mrp_sum, acc.mrp_count),
                    avg_purchase_price: avg(acc.purchase_sum, acc.purchase_count),
                    avg_sales_price: avg(acc.sales_sum, acc.sales_count),
                    locations: acc.locations.into_iter().collect(),
                    status,
                }
            })
            .collect()
    }
}
