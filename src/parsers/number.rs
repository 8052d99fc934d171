/// Characters removed before a fragment is read as a number
const STRIPPED_CHARS: [char; 9] = ['¥', '￥', ',', '，', '.', '-', '−', '%', '％'];

/// Turns a price or percentage fragment such as `"￥1,980"` or `"-15%"` into an integer.
///
/// Currency glyphs, separators, minus signs and percent signs are removed, and
/// full-width digits are folded to ASCII. A leading label (`"参考価格: "`) is
/// tolerated, but anything after the first digit must be a digit. Returns 0
/// when nothing numeric is left; a zero always means "not found".
pub fn clean_number(text: Option<&str>) -> u64 {
    let Some(text) = text else {
        return 0;
    };

    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| !STRIPPED_CHARS.contains(c))
        .map(fold_full_width_digit)
        .collect();

    // Drop a label prefix, then the rest must be all digits
    let digits = cleaned.trim_start_matches(|c: char| !c.is_ascii_digit());
    let digits = digits.trim_end();

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return 0;
    }

    digits.parse::<u64>().unwrap_or(0)
}

fn fold_full_width_digit(c: char) -> char {
    match c {
        '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c),
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_or_empty_input() {
        assert_eq!(clean_number(None), 0);
        assert_eq!(clean_number(Some("")), 0);
        assert_eq!(clean_number(Some("   ")), 0);
    }

    #[test]
    fn test_no_digits() {
        assert_eq!(clean_number(Some("在庫なし")), 0);
        assert_eq!(clean_number(Some("----")), 0);
        assert_eq!(clean_number(Some("%")), 0);
    }

    #[test]
    fn test_prices() {
        assert_eq!(clean_number(Some("¥1,980")), 1980);
        assert_eq!(clean_number(Some("￥1,980")), 1980);
        assert_eq!(clean_number(Some("2,500")), 2500);
        assert_eq!(clean_number(Some("  12,800.  ")), 12800);
    }

    #[test]
    fn test_discount_percentages() {
        assert_eq!(clean_number(Some("-15%")), 15);
        assert_eq!(clean_number(Some("−32%")), 32);
        assert_eq!(clean_number(Some("0%")), 0);
    }

    #[test]
    fn test_label_prefix() {
        assert_eq!(clean_number(Some("参考価格: ¥5,000")), 5000);
        assert_eq!(clean_number(Some("参考価格: ￥5,000")), 5000);
    }

    #[test]
    fn test_trailing_text_is_rejected() {
        assert_eq!(clean_number(Some("1,980円")), 0);
        assert_eq!(clean_number(Some("2個で1,000")), 0);
    }

    #[test]
    fn test_full_width_digits() {
        assert_eq!(clean_number(Some("￥１，９８０")), 1980);
        assert_eq!(clean_number(Some("-２０％")), 20);
        assert_eq!(clean_number(Some("￥１９８０")), 1980);
    }

    #[test]
    fn test_overflow_is_zero() {
        assert_eq!(clean_number(Some("99999999999999999999999")), 0);
    }
}
