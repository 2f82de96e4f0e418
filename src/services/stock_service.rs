// src/services/stock_service.rs

use std::path::Path;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::common::error::AppError;
use crate::models::stock::{
    AddReceipt, AddStockPayload, Carton, CartonTouch, SaleMode, SaleReceipt, SellStockPayload,
    Shortfall, UpdateCartonPayload,
};
use crate::models::transactions::{TransactionEntry, TransactionKind};
use crate::store::{LogScope, LogStore, StockStore};

// Converte uma regra de consistência violada no mesmo formato dos erros do
// Validator, para o chamador tratar tudo igual.
fn consistency_error(field: &'static str, err: ValidationError) -> AppError {
    let mut errors = ValidationErrors::new();
    errors.add(field, err);
    AppError::ValidationError(errors)
}

/// Próximo número de sequência de carton para um produto: maior sequência
/// já vista + 1. O diário de compras entra na conta para que números de
/// cartons apagados nunca sejam reaproveitados.
fn next_sequence(ledger: &[Carton], purchase_log: &[TransactionEntry], product_id: &str) -> u32 {
    let mut max_seq = 0u32;
    for carton in ledger.iter().filter(|c| c.product_id == product_id) {
        if let Some(seq) = carton.sequence_number() {
            max_seq = max_seq.max(seq);
        }
    }
    for entry in purchase_log.iter().filter(|e| e.product_id == product_id) {
        if let Some((_, seq)) = entry.carton_id.rsplit_once("-C") {
            if let Ok(seq) = seq.parse::<u32>() {
                max_seq = max_seq.max(seq);
            }
        }
    }
    max_seq + 1
}

#[derive(Debug, Clone)]
pub struct StockService {
    stock_store: StockStore,
    log_store: LogStore,
}

impl StockService {
    pub fn new(stock_store: StockStore, log_store: LogStore) -> Self {
        Self {
            stock_store,
            log_store,
        }
    }

    // --- ENTRADA DE ESTOQUE ---
    // Cada detalhe do payload vira um carton novo com ID sequencial e um
    // registro de compra no diário. O livro é gravado uma única vez ao final.
    pub fn add_cartons(
        &self,
        ledger: &mut Vec<Carton>,
        stock_file: &Path,
        company: &str,
        payload: &AddStockPayload,
    ) -> Result<AddReceipt, AppError> {
        payload.validate()?;
        payload
            .validate_consistency()
            .map_err(|e| consistency_error("cartons", e))?;

        let product_id = payload.product_id.trim().to_uppercase();
        let product_name = payload.product_name.trim().to_string();
        let location = payload.location.trim().to_uppercase();

        // Mesmo ID com outro nome exige confirmação explícita do chamador.
        if !payload.allow_name_mismatch {
            if let Some(existing) = ledger.iter().find(|c| {
                c.product_id == product_id && !c.product_name.eq_ignore_ascii_case(&product_name)
            }) {
                return Err(AppError::ProductNameConflict {
                    product_id,
                    existing_name: existing.product_name.clone(),
                });
            }
        }

        let (purchase_log, _) = self.log_store.load(stock_file, LogScope::Purchase)?;

        let mut carton_ids = Vec::with_capacity(payload.cartons.len());
        let mut entries = Vec::with_capacity(payload.cartons.len());
        for detail in &payload.cartons {
            let seq = next_sequence(ledger, &purchase_log, &product_id);
            let carton_id = format!("{}-C{:02}", product_id, seq);

            let carton = Carton::new(
                carton_id.clone(),
                product_id.clone(),
                product_name.clone(),
                company.to_string(),
                detail.quantity,
                detail.damaged,
                location.clone(),
                payload.date_inwarded,
                payload.expiry_date,
                detail.mrp,
                detail.purchase_price,
                detail.sales_price,
            )?;

            entries.push(TransactionEntry {
                id: Uuid::new_v4(),
                date: Utc::now(),
                product_id: product_id.clone(),
                product_name: product_name.clone(),
                carton_id: carton_id.clone(),
                quantity: detail.quantity,
                purchase_price: detail.purchase_price,
                sales_price: detail.sales_price,
                mrp: detail.mrp,
                purchase_value: Decimal::from(detail.quantity) * detail.purchase_price,
                sales_value: Decimal::ZERO,
                kind: TransactionKind::Purchase,
            });

            ledger.push(carton);
            carton_ids.push(carton_id);
        }

        // Persiste o livro uma vez e só então registra as compras.
        self.stock_store.save(stock_file, ledger)?;
        for entry in &entries {
            self.log_store.append(stock_file, LogScope::Purchase, entry)?;
        }

        Ok(AddReceipt {
            product_id,
            product_name,
            carton_ids,
        })
    }

    // --- VENDA (SAÍDA) ---
    // Consome cartons vendáveis em ordem FIFO pela data de entrada, em duas
    // fases: cartons inteiros primeiro, depois peças avulsas. "1 carton
    // inteiro" significa o que restar no próximo candidato, não um tamanho
    // fixo. Se os candidatos acabarem antes do pedido, a parte atendida é
    // confirmada e a falta volta como aviso no recibo.
    //
    // A ordem de consumo é FIFO por entrada, enquanto os avisos do resumo
    // recomendam FEFO por validade. Incoerência herdada do comportamento
    // observado; mantida de propósito.
    pub fn sell(
        &self,
        ledger: &mut Vec<Carton>,
        stock_file: &Path,
        product_id: &str,
        payload: &SellStockPayload,
        reference: NaiveDate,
    ) -> Result<SaleReceipt, AppError> {
        payload.validate()?;
        payload
            .validate_consistency()
            .map_err(|e| consistency_error("quantities", e))?;

        // 1. Candidatos: ativos e não vencidos, em ordem FIFO de entrada.
        let mut order: Vec<usize> = ledger
            .iter()
            .enumerate()
            .filter(|(_, c)| c.product_id == product_id && c.is_sellable(reference))
            .map(|(i, _)| i)
            .collect();
        if order.is_empty() {
            return Err(AppError::NoSellableStock(product_id.to_string()));
        }
        order.sort_by_key(|&i| ledger[i].date_inwarded);

        let mut touched: Vec<CartonTouch> = Vec::new();
        let mut entries: Vec<TransactionEntry> = Vec::new();
        let mut total_units: u64 = 0;
        let mut total_sales_value = Decimal::ZERO;

        let mut record = |carton: &Carton, units: u32, mode: SaleMode| {
            let sales_value = Decimal::from(units) * carton.sales_price;
            entries.push(TransactionEntry {
                id: Uuid::new_v4(),
                date: Utc::now(),
                product_id: carton.product_id.clone(),
                product_name: carton.product_name.clone(),
                carton_id: carton.carton_id.clone(),
                quantity: units,
                purchase_price: carton.purchase_price,
                sales_price: carton.sales_price,
                mrp: carton.mrp,
                purchase_value: Decimal::from(units) * carton.purchase_price,
                sales_value,
                kind: TransactionKind::Sale,
            });
            touched.push(CartonTouch {
                carton_id: carton.carton_id.clone(),
                units,
                mode,
            });
            sales_value
        };

        // 2. Fase de cartons inteiros.
        let mut full_done = 0u32;
        let mut pos = 0usize;
        while full_done < payload.full_cartons && pos < order.len() {
            let carton = &mut ledger[order[pos]];
            if carton.quantity_per_carton > 0 {
                let units = carton.quantity_per_carton;
                carton.quantity_per_carton = 0;
                carton.damaged_units = 0;
                carton.date_outwarded = Some(reference);
                carton.touch();
                total_units += u64::from(units);
                total_sales_value += record(carton, units, SaleMode::Full);
                full_done += 1;
            }
            pos += 1;
        }

        // 3. Fase de peças avulsas, continuando de onde a fase 1 parou.
        let mut loose_left = payload.loose_pieces;
        while loose_left > 0 && pos < order.len() {
            let carton = &mut ledger[order[pos]];
            if carton.quantity_per_carton > 0 {
                let take = loose_left.min(carton.quantity_per_carton);
                carton.quantity_per_carton -= take;
                loose_left -= take;
                if carton.quantity_per_carton == 0 {
                    carton.date_outwarded = Some(reference);
                    carton.damaged_units = 0;
                }
                carton.touch();
                total_units += u64::from(take);
                total_sales_value += record(carton, take, SaleMode::Loose);
            }
            pos += 1;
        }

        // 4. Persiste o livro uma única vez para a venda toda e registra um
        // lançamento por carton tocado.
        self.stock_store.save(stock_file, ledger)?;
        for entry in &entries {
            self.log_store.append(stock_file, LogScope::Sales, entry)?;
        }

        let shortfall = if full_done < payload.full_cartons || loose_left > 0 {
            Some(Shortfall {
                cartons_needed: payload.full_cartons - full_done,
                pieces_needed: loose_left,
            })
        } else {
            None
        };

        Ok(SaleReceipt {
            product_id: product_id.to_string(),
            total_units_deducted: total_units,
            total_sales_value,
            cartons_touched: touched,
            shortfall,
        })
    }

    // --- CORREÇÃO DE CARTON ---
    pub fn update_carton(
        &self,
        ledger: &mut Vec<Carton>,
        stock_file: &Path,
        carton_id: &str,
        payload: &UpdateCartonPayload,
        today: NaiveDate,
    ) -> Result<Carton, AppError> {
        let idx = ledger
            .iter()
            .position(|c| c.carton_id.eq_ignore_ascii_case(carton_id.trim()))
            .ok_or_else(|| AppError::CartonNotFound(carton_id.trim().to_string()))?;

        if let Some(date_outwarded) = ledger[idx].date_outwarded {
            return Err(AppError::CartonOutwarded {
                carton_id: ledger[idx].carton_id.clone(),
                date_outwarded,
            });
        }

        // Rejeita antes de qualquer mutação.
        payload.validate()?;
        payload
            .validate_consistency()
            .map_err(|e| consistency_error("new_damaged", e))?;

        let carton = &mut ledger[idx];
        carton.quantity_per_carton = payload.new_quantity;
        carton.damaged_units = payload.new_damaged;
        if payload.new_quantity == 0 {
            // Carton esvaziado não pode continuar ativo.
            carton.date_outwarded = Some(today);
        }
        carton.touch();

        let updated = carton.clone();
        self.stock_store.save(stock_file, ledger)?;
        Ok(updated)
    }

    // --- EXCLUSÃO PERMANENTE ---
    // Remove o carton do livro de vez, sem registro no diário. A sequência
    // dele nunca volta a ser usada (ver next_sequence).
    pub fn delete_carton(
        &self,
        ledger: &mut Vec<Carton>,
        stock_file: &Path,
        carton_id: &str,
    ) -> Result<Carton, AppError> {
        let idx = ledger
            .iter()
            .position(|c| c.carton_id.eq_ignore_ascii_case(carton_id.trim()))
            .ok_or_else(|| AppError::CartonNotFound(carton_id.trim().to_string()))?;

        let removed = ledger.remove(idx);
        self.stock_store.save(stock_file, ledger)?;
        Ok(removed)
    }
}
