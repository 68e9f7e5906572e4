use clap::ValueEnum;
use rust_decimal::{Decimal, RoundingStrategy};

/// Thousands / decimal separator convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Grouping {
    /// 1,234.56
    Comma,
    /// 1.234,56
    Dot,
}

/// Render an amount for display: two decimals, grouped thousands, currency
/// symbol prefix. Display only; never feed the result back into a
/// computation.
pub fn format_local_currency(amount: Decimal, symbol: &str, grouping: Grouping) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let (thousands, decimal) = match grouping {
        Grouping::Comma => (',', '.'),
        Grouping::Dot => ('.', ','),
    };

    let digits = int_part.len();
    let mut grouped = String::with_capacity(digits + digits / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            grouped.push(thousands);
        }
        grouped.push(ch);
    }

    format!(
        "{}{} {}{}{}",
        if negative { "-" } else { "" },
        symbol,
        grouped,
        decimal,
        frac_part
    )
}

/// Whether a result field holds a local-currency amount (as opposed to a
/// rate, share, percentage, count or foreign-currency amount).
pub fn is_local_money_field(key: &str) -> bool {
    let leaf = key.rsplit('.').next().unwrap_or(key);
    if leaf.ends_with("_share")
        || leaf.ends_with("_rate")
        || leaf.ends_with("_pct")
        || leaf.ends_with("_foreign")
        || leaf == "quantity"
    {
        return false;
    }
    // The foreign subtotal group is priced in the foreign currency
    !key.starts_with("foreign.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_comma_grouping() {
        assert_eq!(
            format_local_currency(d("435786.3690845808"), "R$", Grouping::Comma),
            "R$ 435,786.37"
        );
        assert_eq!(format_local_currency(d("105.466"), "R$", Grouping::Comma), "R$ 105.47");
    }

    #[test]
    fn test_dot_grouping() {
        assert_eq!(
            format_local_currency(d("1234567.891"), "R$", Grouping::Dot),
            "R$ 1.234.567,89"
        );
    }

    #[test]
    fn test_small_and_negative_amounts() {
        assert_eq!(format_local_currency(Decimal::ZERO, "$", Grouping::Comma), "$ 0.00");
        assert_eq!(format_local_currency(d("999.995"), "$", Grouping::Comma), "$ 1,000.00");
        assert_eq!(format_local_currency(d("-1500"), "$", Grouping::Comma), "-$ 1,500.00");
    }

    #[test]
    fn test_money_field_detection() {
        assert!(is_local_money_field("unit_cost"));
        assert!(is_local_money_field("cascade.duty"));
        assert!(is_local_money_field("conversion.cif_local"));
        assert!(!is_local_money_field("foreign.fob_total"));
        assert!(!is_local_money_field("composition.tax_share"));
        assert!(!is_local_money_field("composition.effective_tax_rate"));
        assert!(!is_local_money_field("cargo_value_foreign"));
        assert!(!is_local_money_field("low_pct"));
    }
}
