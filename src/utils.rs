use crate::config::DelayRange;
use rand::Rng;
use std::time::Duration;
use url::Url;

/// Pick a wait uniformly from the range.
///
/// A range outside `0..=MAX_DELAY_SECS` (or not finite) yields no wait.
pub fn random_delay(range: DelayRange) -> Duration {
    if !range.is_valid() {
        ::log::warn!(
            "Ignoring delay range {}..{}; waiting 0 seconds",
            range.min_secs,
            range.max_secs
        );
        return Duration::ZERO;
    }

    let secs = if range.max_secs > range.min_secs {
        rand::thread_rng().gen_range(range.min_secs..range.max_secs)
    } else {
        range.min_secs
    };
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO)
}

/// First `words` whitespace-separated words of a product name
pub fn shorten_name(name: &str, words: usize) -> String {
    name.split_whitespace()
        .take(words)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Formats an integer with `,` thousands grouping, e.g. `12,800`
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Product URL with the affiliate tag as a `tag=` query pair.
///
/// Without a tag, or if the URL does not parse, it comes back unchanged.
pub fn affiliate_url(product_url: &str, tag: Option<&str>) -> String {
    let Some(tag) = tag.filter(|t| !t.is_empty()) else {
        return product_url.to_string();
    };

    match Url::parse(product_url) {
        Ok(mut url) => {
            url.query_pairs_mut().append_pair("tag", tag);
            url.to_string()
        }
        Err(e) => {
            ::log::warn!("Cannot add affiliate tag to {}: {}", product_url, e);
            product_url.to_string()
        }
    }
}

/// Detail page URL for a product identifier
pub fn product_url(base_url: &str, identifier: &str) -> String {
    format!("{}/dp/{}", base_url.trim_end_matches('/'), identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_delay_in_range() {
        let range = DelayRange::new(0.01, 0.02);
        for _ in 0..20 {
            let d = random_delay(range);
            assert!(d >= Duration::from_secs_f64(0.01) && d < Duration::from_secs_f64(0.02));
        }
        assert_eq!(random_delay(DelayRange::NONE), Duration::ZERO);
    }

    #[test]
    fn test_random_delay_out_of_bounds_is_zero() {
        assert_eq!(random_delay(DelayRange::new(1e20, 2e20)), Duration::ZERO);
        assert_eq!(random_delay(DelayRange::new(f64::NAN, 1.0)), Duration::ZERO);
        assert_eq!(random_delay(DelayRange::new(0.0, f64::INFINITY)), Duration::ZERO);
        assert_eq!(random_delay(DelayRange::new(-3.0, -1.0)), Duration::ZERO);
    }

    #[test]
    fn test_shorten_name() {
        assert_eq!(
            shorten_name("Logicool G PRO X SUPERLIGHT ワイヤレス ゲーミングマウス", 5),
            "Logicool G PRO X SUPERLIGHT"
        );
        assert_eq!(shorten_name("  短い  名前 ", 5), "短い 名前");
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(980), "980");
        assert_eq!(format_thousands(1980), "1,980");
        assert_eq!(format_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_affiliate_url() {
        assert_eq!(
            affiliate_url("https://www.amazon.co.jp/dp/B0AAAAAAAA", Some("hunter-22")),
            "https://www.amazon.co.jp/dp/B0AAAAAAAA?tag=hunter-22"
        );
        assert_eq!(
            affiliate_url("https://www.amazon.co.jp/dp/B0AAAAAAAA", None),
            "https://www.amazon.co.jp/dp/B0AAAAAAAA"
        );
        assert_eq!(
            affiliate_url("https://www.amazon.co.jp/dp/B0AAAAAAAA", Some("")),
            "https://www.amazon.co.jp/dp/B0AAAAAAAA"
        );
    }

    #[test]
    fn test_product_url() {
        assert_eq!(
            product_url("https://www.amazon.co.jp/", "B0AAAAAAAA"),
            "https://www.amazon.co.jp/dp/B0AAAAAAAA"
        );
    }
}
