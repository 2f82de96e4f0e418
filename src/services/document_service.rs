// src/services/document_service.rs

use chrono::{DateTime, Utc};
use genpdf::{Element, elements, style};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::common::error::AppError;
use crate::models::transactions::MonthlySummaryRow;

/// Renderiza os agregados em PDF e CSV. Só apresentação: os números vêm
/// prontos dos serviços de relatório, nada é recalculado aqui.
#[derive(Debug, Clone)]
pub struct DocumentService {
    currency_symbol: String,
}

impl DocumentService {
    pub fn new(currency_symbol: String) -> Self {
        Self { currency_symbol }
    }

    fn money(&self, value: Decimal) -> String {
        format!("{} {:.2}", self.currency_symbol, value)
    }

    /// Gera o PDF do resumo mensal de vendas em memória.
    pub fn sales_summary_pdf(
        &self,
        company: &str,
        rows: &[MonthlySummaryRow],
        generated_at: DateTime<Utc>,
    ) -> Result<Vec<u8>, AppError> {
        // Carrega a fonte da pasta 'fonts/'
        let font_family = genpdf::fonts::from_files("./fonts", "Roboto", None)
            .map_err(|_| AppError::FontNotFound("Fonte não encontrada na pasta ./fonts".to_string()))?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("Resumo de Vendas - {}", company));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO ---
        doc.push(
            elements::Paragraph::new("Resumo Mensal de Vendas")
                .styled(style::Style::new().bold().with_font_size(18)),
        );
        doc.push(elements::Paragraph::new(format!("Empresa: {}", company)));
        doc.push(elements::Paragraph::new(format!(
            "Data: {}",
            generated_at.format("%d/%m/%Y %H:%M")
        )));
        doc.push(elements::Break::new(1.5));

        // --- TABELA ---
        // Pesos das colunas: Mês (2), ID (2), Produto (4), Qtde (1),
        // Vendas (2), Lucro (2)
        let mut table = elements::TableLayout::new(vec![2, 2, 4, 1, 2, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let style_bold = style::Style::new().bold();
        table
            .row()
            .element(elements::Paragraph::new("Mês").styled(style_bold))
            .element(elements::Paragraph::new("ID").styled(style_bold))
            .element(elements::Paragraph::new("Produto").styled(style_bold))
            .element(elements::Paragraph::new("Qtde").styled(style_bold))
            .element(elements::Paragraph::new("Vendas").styled(style_bold))
            .element(elements::Paragraph::new("Lucro").styled(style_bold))
            .push()
            .expect("Table error");

        for row in rows {
            table
                .row()
                .element(elements::Paragraph::new(row.month.clone()))
                .element(elements::Paragraph::new(row.product_id.clone()))
                .element(elements::Paragraph::new(row.product_name.clone()))
                .element(elements::Paragraph::new(format!("{}", row.units)))
                .element(elements::Paragraph::new(self.money(row.sales_value)))
                .element(elements::Paragraph::new(self.money(row.profit_loss)))
                .push()
                .expect("Table row error");
        }

        doc.push(table);
        doc.push(elements::Break::new(2));

        // --- TOTAIS ---
        let total_units: u64 = rows.iter().map(|r| r.units).sum();
        let total_sales: Decimal = rows.iter().map(|r| r.sales_value).sum();
        let total_profit: Decimal = rows.iter().map(|r| r.profit_loss).sum();

        doc.push(elements::Paragraph::new(format!(
            "Total de unidades vendidas: {}",
            total_units
        )));

        let mut total_paragraph = elements::Paragraph::new(format!(
            "TOTAL GERAL: {} (lucro {})",
            self.money(total_sales),
            self.money(total_profit)
        ));
        total_paragraph.set_alignment(genpdf::Alignment::Right);
        doc.push(total_paragraph.styled(style::Style::new().bold().with_font_size(12)));

        // Renderiza para buffer em memória
        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| AppError::Internal(anyhow::Error::msg(e.to_string())))?;

        Ok(buffer)
    }

    /// Exporta qualquer lista de linhas serializáveis como CSV.
    pub fn export_csv<T: Serialize>(&self, rows: &[T]) -> Result<String, AppError> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for row in rows {
            wtr.serialize(row)
                .map_err(|e| AppError::Internal(anyhow::Error::msg(e.to_string())))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| AppError::Internal(anyhow::Error::msg(e.to_string())))?;
        String::from_utf8(bytes).map_err(|e| AppError::Internal(anyhow::Error::msg(e.to_string())))
    }
}
