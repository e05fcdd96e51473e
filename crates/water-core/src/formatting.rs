use chrono::NaiveDate;

use crate::models::SavingsVerdict;
use crate::targets::DeviceLabel;

/// Format a number with thousands separators and a fixed number of decimals.
///
/// # Examples
///
/// ```
/// use water_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5, 1), "1,234.5");
/// assert_eq!(format_number(18000.0, 0), "18,000");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-2000.0, 2), "-2,000.00");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let negative = value < 0.0;
    // `{:.N}` already rounds; only the integer part needs grouping.
    let fixed = format!("{:.prec$}", value.abs(), prec = decimals as usize);
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::new();
    if negative && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(f) = frac_part {
        out.push('.');
        out.push_str(f);
    }
    out
}

/// Insert `,` between every group of three digits, counting from the right.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format a volume in liters with two decimals.
///
/// ```
/// use water_core::formatting::format_liters;
///
/// assert_eq!(format_liters(2000.0), "2,000.00 liters");
/// ```
pub fn format_liters(volume: f64) -> String {
    format!("{} liters", format_number(volume, 2))
}

/// Status line for a savings verdict.
///
/// Excess usage is appended only when it is strictly positive.
///
/// ```
/// use water_core::formatting::verdict_text;
/// use water_core::models::SavingsVerdict;
///
/// let ok = SavingsVerdict { is_efficient: true, excess_total: 0.0 };
/// assert_eq!(verdict_text(&ok), "Efficient savings");
///
/// let bad = SavingsVerdict { is_efficient: false, excess_total: 2000.0 };
/// assert_eq!(verdict_text(&bad), "No savings (extra usage: 2,000.00 liters)");
/// ```
pub fn verdict_text(verdict: &SavingsVerdict) -> String {
    let head = if verdict.is_efficient {
        "Efficient savings"
    } else {
        "No savings"
    };
    if verdict.excess_total > 0.0 {
        format!("{} (extra usage: {})", head, format_liters(verdict.excess_total))
    } else {
        head.to_string()
    }
}

/// Report heading: `Data for DD/MM/YYYY of <source>`.
///
/// The date part is omitted when no date is selected; known device tags are
/// shown with their readable name.
pub fn report_title(date: Option<NaiveDate>, label: Option<&str>) -> String {
    let source = match label {
        Some(tag) => match DeviceLabel::from_tag(tag) {
            Some(device) => format!("{} ({})", tag, device.display_name()),
            None => tag.to_string(),
        },
        None => "all sources".to_string(),
    };
    match date {
        Some(d) => format!("Data for {} of {}", d.format("%d/%m/%Y"), source),
        None => format!("Data for all dates of {}", source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_rounding() {
        assert_eq!(format_number(999.999, 2), "1,000.00");
        assert_eq!(format_number(1_234_567.0, 0), "1,234,567");
        assert_eq!(format_number(12.0, 0), "12");
    }

    #[test]
    fn test_format_number_negative_zero_has_no_sign() {
        assert_eq!(format_number(-0.001, 2), "0.00");
    }

    #[test]
    fn test_verdict_text_efficient_without_excess() {
        let v = SavingsVerdict {
            is_efficient: true,
            excess_total: 0.0,
        };
        assert_eq!(verdict_text(&v), "Efficient savings");
    }

    #[test]
    fn test_report_title_with_date_and_label() {
        let d = NaiveDate::from_ymd_opt(2024, 5, 1);
        assert_eq!(
            report_title(d, Some("toaleta")),
            "Data for 01/05/2024 of toaleta (toilet)"
        );
    }

    #[test]
    fn test_report_title_unknown_label_and_no_date() {
        assert_eq!(
            report_title(None, Some("garden")),
            "Data for all dates of garden"
        );
        assert_eq!(report_title(None, None), "Data for all dates of all sources");
    }
}
