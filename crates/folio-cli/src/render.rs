//! 콘솔 테이블 렌더링 헬퍼.

use rust_decimal::Decimal;

/// 소수점 dp자리로 반올림한 문자열을 반환합니다.
pub fn fmt_dec(value: Decimal, dp: u32) -> String {
    value
        .round_dp_with_strategy(dp, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
        .to_string()
}

/// 수익률 셀을 렌더링합니다. 값이 없으면 "-".
pub fn fmt_pct_cell(value: Option<Decimal>) -> String {
    match value {
        Some(v) => format!("{:>10}", fmt_dec(v, 2)),
        None => format!("{:>10}", "-"),
    }
}

/// 금액을 천 단위 구분 기호와 함께 렌더링합니다.
pub fn fmt_money(value: Decimal) -> String {
    let rounded = fmt_dec(value, 2);
    let (int_part, frac_part) = match rounded.split_once('.') {
        Some((i, f)) => (i.to_string(), f.to_string()),
        None => (rounded, "00".to_string()),
    };

    let negative = int_part.starts_with('-');
    let digits: Vec<char> = int_part.trim_start_matches('-').chars().collect();

    let mut grouped = String::new();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    format!(
        "{}{}.{}",
        if negative { "-" } else { "" },
        grouped,
        frac_part
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fmt_dec() {
        assert_eq!(fmt_dec(dec!(1.005), 2), "1.01");
        assert_eq!(fmt_dec(dec!(-3.14159), 2), "-3.14");
    }

    #[test]
    fn test_fmt_money() {
        assert_eq!(fmt_money(dec!(1234567.891)), "1,234,567.89");
        assert_eq!(fmt_money(dec!(-1234.5)), "-1,234.5");
        assert_eq!(fmt_money(dec!(999)), "999.00");
    }

    #[test]
    fn test_fmt_pct_cell() {
        assert_eq!(fmt_pct_cell(None).trim(), "-");
        assert_eq!(fmt_pct_cell(Some(dec!(12.345))).trim(), "12.35");
    }
}
