use anyhow::{Result, anyhow, bail};
use scraper::{Html, Selector};
use url::Url;

/// Text of every `<p>` element, trimmed, empty ones dropped, in document order.
///
/// ```
/// let html = "<html><body><p> First </p><div><p></p><p>Second <b>bold</b></p></div></body></html>";
/// assert_eq!(precis_web::paragraphs(html), vec!["First", "Second bold"]);
/// ```
pub fn paragraphs(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let Ok(sel) = Selector::parse("p") else {
        return Vec::new();
    };
    let blocks: Vec<String> = doc
        .select(&sel)
        .map(|p| p.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect();
    tracing::debug!(paragraphs = blocks.len(), html_len = html.len(), "web.extract.paragraphs");
    blocks
}

/// Contents of the first `<title>`, whitespace collapsed.
pub fn title(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let sel = Selector::parse("title").ok()?;
    let raw = doc.select(&sel).next()?.text().collect::<String>();
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    (!collapsed.is_empty()).then_some(collapsed)
}

/// Parse a user-supplied page URL. Only `http` and `https` are accepted.
pub fn validate_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| anyhow!("invalid url {raw:?}: {e}"))?;
    match url.scheme() {
        "http" | "https" => {}
        other => bail!("unsupported url scheme {other:?}"),
    }
    if url.host_str().is_none() {
        bail!("url {raw:?} has no host");
    }
    Ok(url)
}
