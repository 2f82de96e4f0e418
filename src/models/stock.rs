// src/models/stock.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::common::dates;
use crate::common::error::AppError;

// --- Carton: a unidade atômica de estoque ---
// Um carton é um lote físico de um produto, com quantidade, datas e preços
// próprios. "Produto" não é entidade armazenada: é só a chave `product_id`
// que agrupa cartons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Carton {
    pub carton_id: String,
    pub product_id: String,
    pub product_name: String,
    pub company: String,
    pub quantity_per_carton: u32,
    #[serde(default)]
    pub damaged_units: u32,
    pub location: String,
    pub date_inwarded: NaiveDate,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub date_outwarded: Option<NaiveDate>,
    #[serde(default)]
    pub mrp: Decimal,
    #[serde(default)]
    pub purchase_price: Decimal,
    #[serde(default)]
    pub sales_price: Decimal,
    #[serde(default = "Utc::now")]
    pub last_updated: DateTime<Utc>,
}

impl Carton {
    /// Construtor validado: as invariantes valem desde a criação, em vez de
    /// serem reconferidas em cada ponto de uso.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        carton_id: String,
        product_id: String,
        product_name: String,
        company: String,
        quantity_per_carton: u32,
        damaged_units: u32,
        location: String,
        date_inwarded: NaiveDate,
        expiry_date: Option<NaiveDate>,
        mrp: Decimal,
        purchase_price: Decimal,
        sales_price: Decimal,
    ) -> Result<Self, AppError> {
        if quantity_per_carton == 0 {
            let mut errors = ValidationErrors::new();
            let mut err = ValidationError::new("range");
            err.message = Some("Um carton ativo precisa ter ao menos uma unidade.".into());
            errors.add("quantity_per_carton", err);
            return Err(AppError::ValidationError(errors));
        }
        if damaged_units > quantity_per_carton {
            let mut errors = ValidationErrors::new();
            let mut err = ValidationError::new("damaged_bound");
            err.message =
                Some("As unidades avariadas não podem exceder a quantidade do carton.".into());
            errors.add("damaged_units", err);
            return Err(AppError::ValidationError(errors));
        }
        if mrp.is_sign_negative()
            || purchase_price.is_sign_negative()
            || sales_price.is_sign_negative()
        {
            let mut errors = ValidationErrors::new();
            let mut err = ValidationError::new("range");
            err.message = Some("Os preços não podem ser negativos.".into());
            errors.add("prices", err);
            return Err(AppError::ValidationError(errors));
        }
        Ok(Self {
            carton_id,
            product_id,
            product_name,
            company,
            quantity_per_carton,
            damaged_units,
            location,
            date_inwarded,
            expiry_date,
            date_outwarded: None,
            mrp,
            purchase_price,
            sales_price,
            last_updated: Utc::now(),
        })
    }

    /// Carton ainda no livro (não baixado).
    pub fn is_active(&self) -> bool {
        self.date_outwarded.is_none()
    }

    pub fn is_expired(&self, reference: NaiveDate) -> bool {
        dates::is_expired(self.expiry_date, reference)
    }

    /// Vendável: ativo e não vencido na data de referência.
    pub fn is_sellable(&self, reference: NaiveDate) -> bool {
        self.is_active() && !self.is_expired(reference)
    }

    /// Número de sequência extraído de um ID no formato `{PID}-C{NN}`.
    /// IDs fora do padrão são ignorados, como no carregamento tolerante de
    /// dados antigos.
    pub fn sequence_number(&self) -> Option<u32> {
        let (_, seq) = self.carton_id.rsplit_once("-C")?;
        seq.parse().ok()
    }

    pub fn touch(&mut self) {
        self.last_updated = Utc::now();
    }
}

/// Identidade de produto resolvida a partir de uma consulta livre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductMatch {
    pub product_id: String,
    pub product_name: String,
}

/// Entrada da lista de sugestões (autocomplete do chamador).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub product_id: String,
    pub product_name: String,
    pub mrp: Decimal,
}

// ---
// Validação customizada
// ---
fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Payload: AddStock
// ---
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewCartonDetail {
    #[validate(range(min = 1, message = "A quantidade deve ser um número positivo."))]
    pub quantity: u32,

    #[serde(default)]
    pub damaged: u32,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub mrp: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub purchase_price: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub sales_price: Decimal,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddStockPayload {
    #[validate(length(min = 1, message = "O ID do produto é obrigatório."))]
    pub product_id: String,

    #[validate(length(min = 1, message = "O nome do produto é obrigatório."))]
    pub product_name: String,

    #[validate(length(min = 1, message = "A localização é obrigatória."))]
    pub location: String,

    pub date_inwarded: NaiveDate,

    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,

    #[validate(nested, length(min = 1, message = "Informe ao menos um carton."))]
    pub cartons: Vec<NewCartonDetail>,

    // O mesmo product_id com outro nome exige confirmação explícita.
    #[serde(default)]
    pub allow_name_mismatch: bool,
}

impl AddStockPayload {
    /// Regras entre campos que o Validator não cobre sozinho.
    pub fn validate_consistency(&self) -> Result<(), ValidationError> {
        for carton in &self.cartons {
            if carton.damaged > carton.quantity {
                let mut err = ValidationError::new("damaged_bound");
                err.message = Some(
                    "As unidades avariadas não podem exceder a quantidade do carton.".into(),
                );
                return Err(err);
            }
        }
        Ok(())
    }
}

// ---
// Payload: SellStock
// ---
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SellStockPayload {
    #[serde(default)]
    pub full_cartons: u32,

    #[serde(default)]
    pub loose_pieces: u32,
}

impl SellStockPayload {
    pub fn validate_consistency(&self) -> Result<(), ValidationError> {
        if self.full_cartons == 0 && self.loose_pieces == 0 {
            let mut err = ValidationError::new("empty_sale");
            err.message = Some("Informe uma quantidade para vender.".into());
            return Err(err);
        }
        Ok(())
    }
}

// ---
// Payload: UpdateCarton
// ---
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCartonPayload {
    pub new_quantity: u32,
    pub new_damaged: u32,
}

impl UpdateCartonPayload {
    pub fn validate_consistency(&self) -> Result<(), ValidationError> {
        if self.new_damaged > self.new_quantity {
            let mut err = ValidationError::new("damaged_bound");
            err.message =
                Some("As unidades avariadas não podem exceder a quantidade do carton.".into());
            return Err(err);
        }
        Ok(())
    }
}

// ---
// Recibos de mutação
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleMode {
    Full,
    Loose,
}

#[derive(Debug, Clone, Serialize)]
pub struct CartonTouch {
    pub carton_id: String,
    pub units: u32,
    pub mode: SaleMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Shortfall {
    pub cartons_needed: u32,
    pub pieces_needed: u32,
}

/// Resultado de uma venda. Uma falta após atendimento parcial é aviso
/// dentro do recibo, não erro: a parte atendida já está confirmada.
#[derive(Debug, Clone, Serialize)]
pub struct SaleReceipt {
    pub product_id: String,
    pub total_units_deducted: u64,
    pub total_sales_value: Decimal,
    pub cartons_touched: Vec<CartonTouch>,
    pub shortfall: Option<Shortfall>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddReceipt {
    pub product_id: String,
    pub product_name: String,
    pub carton_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn base_carton() -> Result<Carton, AppError> {
        Carton::new(
            "ABC-C01".to_string(),
            "ABC".to_string(),
            "Widget".to_string(),
            "Apex".to_string(),
            10,
            2,
            "A-01".to_string(),
            d("2024-01-01"),
            None,
            dec("120.00"),
            dec("80.00"),
            dec("100.00"),
        )
    }

    #[test]
    fn construtor_aceita_carton_valido() {
        let carton = base_carton().unwrap();
        assert!(carton.is_active());
        assert_eq!(carton.sequence_number(), Some(1));
    }

    #[test]
    fn construtor_rejeita_avaria_maior_que_quantidade() {
        let result = Carton::new(
            "ABC-C01".into(),
            "ABC".into(),
            "Widget".into(),
            "Apex".into(),
            5,
            6,
            "A-01".into(),
            d("2024-01-01"),
            None,
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
        );
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn construtor_rejeita_carton_ativo_vazio() {
        let result = Carton::new(
            "ABC-C01".into(),
            "ABC".into(),
            "Widget".into(),
            "Apex".into(),
            0,
            0,
            "A-01".into(),
            d("2024-01-01"),
            None,
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
        );
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn sequencia_ignora_ids_fora_do_padrao() {
        let mut carton = base_carton().unwrap();
        carton.carton_id = "SEM-PADRAO".to_string();
        assert_eq!(carton.sequence_number(), None);
        carton.carton_id = "XYZ-C17".to_string();
        assert_eq!(carton.sequence_number(), Some(17));
    }

    #[test]
    fn vendavel_considera_baixa_e_validade() {
        let mut carton = base_carton().unwrap();
        let hoje = d("2024-06-15");
        assert!(carton.is_sellable(hoje));

        carton.expiry_date = Some(hoje);
        assert!(!carton.is_sellable(hoje));

        carton.expiry_date = Some(d("2024-12-31"));
        carton.date_outwarded = Some(hoje);
        assert!(!carton.is_sellable(hoje));
    }

    #[test]
    fn payload_de_venda_rejeita_tudo_zero() {
        let payload = SellStockPayload {
            full_cartons: 0,
            loose_pieces: 0,
        };
        assert!(payload.validate_consistency().is_err());

        let payload = SellStockPayload {
            full_cartons: 0,
            loose_pieces: 3,
        };
        assert!(payload.validate_consistency().is_ok());
    }

    #[test]
    fn payload_de_update_rejeita_avaria_excedente() {
        let payload = UpdateCartonPayload {
            new_quantity: 4,
            new_damaged: 5,
        };
        assert!(payload.validate_consistency().is_err());
    }

    #[test]
    fn payload_de_entrada_valida_campos_e_consistencia() {
        let payload = AddStockPayload {
            product_id: "ABC".into(),
            product_name: "Widget".into(),
            location: "A-01".into(),
            date_inwarded: d("2024-01-01"),
            expiry_date: None,
            cartons: vec![NewCartonDetail {
                quantity: 10,
                damaged: 11,
                mrp: dec("10.00"),
                purchase_price: dec("6.00"),
                sales_price: dec("8.00"),
            }],
            allow_name_mismatch: false,
        };
        assert!(payload.validate().is_ok());
        assert!(payload.validate_consistency().is_err());
    }

    #[test]
    fn payload_de_entrada_rejeita_preco_negativo() {
        let payload = AddStockPayload {
            product_id: "ABC".into(),
            product_name: "Widget".into(),
            location: "A-01".into(),
            date_inwarded: d("2024-01-01"),
            expiry_date: None,
            cartons: vec![NewCartonDetail {
                quantity: 10,
                damaged: 0,
                mrp: dec("-1.00"),
                purchase_price: dec("6.00"),
                sales_price: dec("8.00"),
            }],
            allow_name_mismatch: false,
        };
        assert!(payload.validate().is_err());
    }
}
