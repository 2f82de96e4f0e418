// src/common/dates.rs

use chrono::NaiveDate;

/// Um item vence no próprio dia de validade (comparação inclusiva).
/// Sem data de validade, nunca vence.
pub fn is_expired(expiry: Option<NaiveDate>, reference: NaiveDate) -> bool {
    matches!(expiry, Some(d) if d <= reference)
}

/// Dias até a data informada. Pode ser negativo se a data já passou.
pub fn days_until(date: NaiveDate, reference: NaiveDate) -> i64 {
    (date - reference).num_days()
}

/// Datas em texto no formato YYYY-MM-DD. Vazio ou inválido vira None,
/// igual ao comportamento tolerante do carregamento de dados antigos.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

pub fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn vencimento_no_proprio_dia_conta_como_vencido() {
        let hoje = d("2024-06-15");
        assert!(is_expired(Some(hoje), hoje));
        assert!(is_expired(Some(d("2024-06-14")), hoje));
        assert!(!is_expired(Some(d("2024-06-16")), hoje));
    }

    #[test]
    fn sem_validade_nunca_vence() {
        assert!(!is_expired(None, d("2024-06-15")));
        assert!(!is_expired(None, d("9999-12-31")));
    }

    #[test]
    fn dias_ate_pode_ser_negativo() {
        let hoje = d("2024-06-15");
        assert_eq!(days_until(d("2024-06-20"), hoje), 5);
        assert_eq!(days_until(hoje, hoje), 0);
        assert_eq!(days_until(d("2024-06-10"), hoje), -5);
    }

    #[test]
    fn parse_tolerante() {
        assert_eq!(parse_date("2024-01-31"), Some(d("2024-01-31")));
        assert_eq!(parse_date("  2024-01-31  "), Some(d("2024-01-31")));
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("31/01/2024"), None);
    }

    #[test]
    fn formatacao() {
        assert_eq!(format_date(Some(d("2024-01-31"))), "2024-01-31");
        assert_eq!(format_date(None), "N/A");
    }
}
