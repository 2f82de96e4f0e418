// src/main.rs

use estoque::common::dates::format_date;
use estoque::config::AppState;
use estoque::store::{LogScope, StoreHealth};

fn main() {
    // Inicializa o logger.
    tracing_subscriber::fmt().with_target(false).compact().init();

    let app_state = AppState::new().expect("Falha ao inicializar o estado da aplicação.");

    let companies = app_state
        .companies()
        .expect("Falha ao carregar o registro de empresas.");
    if companies.is_empty() {
        tracing::info!(
            "Nenhuma empresa cadastrada ainda. Cadastre uma empresa e adicione estoque para começar."
        );
        return;
    }

    // Abre a empresa definida em COMPANY, ou a primeira do registro.
    let company = app_state
        .config
        .startup_company
        .clone()
        .unwrap_or_else(|| companies.keys().next().cloned().unwrap_or_default());
    let session = app_state
        .open_company(&company)
        .expect("Falha ao abrir a empresa selecionada.");
    if session.health == StoreHealth::Corrupted {
        tracing::warn!(
            "O arquivo de estoque de {} estava corrompido. Continuando com livro vazio; a visão atual pode não refletir os dados antigos.",
            session.company
        );
    }
    tracing::info!("🚀 Gerenciando o estoque de: {}", session.company);

    let moeda = app_state.config.currency_symbol.clone();
    let today = chrono::Local::now().date_naive();

    // --- Dashboard ---
    let stats = app_state
        .report_service
        .dashboard_stats(&session.ledger, today);
    println!("\n=== Dashboard: {} ===", session.company);
    println!("Estoque vivo vendável:    {} unidades", stats.total_live);
    println!("Avariado/vencido:         {} unidades", stats.total_damaged_expired);
    println!("Total de cartons:         {}", stats.total_cartons);
    println!("Valor do estoque (MRP):   {} {:.2}", moeda, stats.total_stock_value);
    for alert in &stats.low_stock_alerts {
        println!(
            "  [estoque baixo] {} ({}) - carton {} com {} unidades",
            alert.product_name, alert.product_id, alert.carton_id, alert.quantity
        );
    }
    for alert in &stats.expiry_alerts {
        println!(
            "  [vence logo] {} ({}) - carton {} vence em {} ({} dias)",
            alert.product_name, alert.product_id, alert.carton_id, alert.expiry_date, alert.days_left
        );
    }

    // --- Consolidado por produto ---
    let rollups = app_state
        .report_service
        .aggregate_by_product(&session.ledger, today);
    if !rollups.is_empty() {
        println!("\n=== Estoque por produto ===");
        for r in &rollups {
            println!(
                "{:<12} {:<24} cartons: {:<3} peças: {:<5} avaria/vencido: {:<5} validade: {:<10} [{}]",
                r.product_id,
                r.product_name,
                r.live_cartons,
                r.live_pieces,
                r.damaged_expired_units,
                format_date(r.earliest_expiry),
                r.status.label()
            );
        }
    }

    // --- Resumo mensal de vendas ---
    let summary = app_state
        .finance_service
        .monthly_summary(&session.stock_file, LogScope::Sales)
        .expect("Falha ao montar o resumo mensal de vendas.");
    if !summary.is_empty() {
        println!("\n=== Resumo mensal de vendas ===");
        for row in &summary {
            println!(
                "{} {:<12} {:<24} {:>5} un  vendas {} {:.2}  lucro {} {:.2} ({:.1}%)",
                row.month,
                row.product_id,
                row.product_name,
                row.units,
                moeda,
                row.sales_value,
                moeda,
                row.profit_loss,
                row.profit_margin_pct
            );
        }
    }
}
