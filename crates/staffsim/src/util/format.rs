/// Add thousands separators to a whole number
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut result = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a currency value without cents (e.g. $4,430)
pub fn format_currency(value: f64) -> String {
    let dollars = group_thousands(value.abs().round() as u64);
    if value < 0.0 {
        format!("-${}", dollars)
    } else {
        format!("${}", dollars)
    }
}

/// Format a value already on the 0-100 scale
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Format a relative change with an explicit sign, or "n/a" when undefined
pub fn format_change(change: Option<f64>) -> String {
    match change {
        Some(c) => format!("{:+.1}%", c),
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(999.4), "$999");
        assert_eq!(format_currency(4430.4), "$4,430");
        assert_eq!(format_currency(1_234_567.0), "$1,234,567");
        assert_eq!(format_currency(-2500.0), "-$2,500");
    }

    #[test]
    fn test_format_percent_and_change() {
        assert_eq!(format_percent(87.24), "87.2%");
        assert_eq!(format_change(Some(12.5)), "+12.5%");
        assert_eq!(format_change(Some(-3.0)), "-3.0%");
        assert_eq!(format_change(None), "n/a");
    }
}
