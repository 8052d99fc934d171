use scraper::{Html, Selector};

/// Title used when a product page has no `#productTitle`
pub const UNKNOWN_TITLE: &str = "商品名不明";

/// Collects every `href` of `<a>` elements in document order
pub fn links(doc: &Html) -> Vec<String> {
    let link_selector = Selector::parse("a[href]").unwrap();
    let links = doc
        .select(&link_selector)
        .filter_map(|e| e.value().attr("href"))
        .map(|s| s.to_string())
        .collect::<Vec<String>>();

    ::log::debug!("HTML parser found {} links", links.len());
    if !links.is_empty() {
        ::log::trace!(
            "First few links: {:?}",
            links.iter().take(5).collect::<Vec<_>>()
        );
    }

    links
}

/// Trimmed text of `#productTitle`, or [`UNKNOWN_TITLE`] when the element is missing.
///
/// An element that is present but empty gives an empty title.
pub fn product_title(doc: &Html) -> String {
    let title_selector = Selector::parse("#productTitle").unwrap();

    doc.select(&title_selector)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string())
}

/// Body text with whitespace collapsed, cut to at most `max_chars` characters
pub fn page_text(doc: &Html, max_chars: usize) -> String {
    let content_selector = Selector::parse("body").unwrap();
    let text = doc
        .select(&content_selector)
        .flat_map(|body| body.descendants())
        .filter(|node| {
            node.parent()
                .and_then(|parent| parent.value().as_element())
                .is_none_or(|e| !matches!(e.name(), "script" | "style" | "noscript"))
        })
        .filter_map(|node| node.value().as_text().map(|t| &**t))
        .flat_map(|t| t.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ");

    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text,
    }
}
