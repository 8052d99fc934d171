use regex::Regex;
use std::collections::HashSet;

/// Default pattern for product detail paths, capturing the 10-character product code
pub const DEFAULT_PRODUCT_PATTERN: &str = r"/(?:dp|gp/product)/([A-Z0-9]{10})";

/// Picks product identifiers out of listing-page links
#[derive(Debug, Clone)]
pub struct IdentifierFilter {
    pattern: Regex,
}

impl Default for IdentifierFilter {
    fn default() -> Self {
        Self::new(DEFAULT_PRODUCT_PATTERN).expect("Default product pattern should be valid")
    }
}

impl IdentifierFilter {
    /// Create a filter from a regex whose first capture group is the identifier
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    /// Identifier contained in a single link, if it points at a product page
    pub fn identifier<'a>(&self, href: &'a str) -> Option<&'a str> {
        self.pattern
            .captures(href)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Unique identifiers in link order, stopping as soon as `limit` are collected
    pub fn extract_identifiers<S: AsRef<str>>(&self, links: &[S], limit: usize) -> Vec<String> {
        let mut identifiers = Vec::new();
        let mut seen = HashSet::new();

        if limit == 0 {
            return identifiers;
        }

        for link in links {
            let Some(id) = self.identifier(link.as_ref()) else {
                continue;
            };

            if seen.insert(id.to_string()) {
                identifiers.push(id.to_string());
                ::log::trace!("Found product identifier {}", id);
            }

            if identifiers.len() >= limit {
                break;
            }
        }

        identifiers
    }
}
