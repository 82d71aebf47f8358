use rust_decimal::Decimal;

/// Format a decimal as a Brazilian real amount: R$ 1.234,56
pub fn money(val: Decimal) -> String {
    let negative = val < Decimal::ZERO;
    let abs = val.abs();
    let cents = format!("{abs:.2}");
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut with_dots = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_dots.push('.');
        }
        with_dots.push(c);
    }
    let with_dots: String = with_dots.chars().rev().collect();

    if negative {
        format!("-R$ {with_dots},{dec_part}")
    } else {
        format!("R$ {with_dots},{dec_part}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(dec!(1234.56)), "R$ 1.234,56");
        assert_eq!(money(dec!(-500.00)), "-R$ 500,00");
        assert_eq!(money(dec!(0)), "R$ 0,00");
        assert_eq!(money(dec!(1000000.99)), "R$ 1.000.000,99");
        assert_eq!(money(dec!(42.1)), "R$ 42,10");
    }
}
