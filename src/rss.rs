//! Just enough RSS reading for the feed screens: the `<item>` elements of a channel and
//! their four text fields. Not a general XML parser.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{ScreenError, ScreenResult};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub description: String,
    pub pub_date: String,
}

impl FeedItem {
    /// Substitute `{title}`, `{link}`, `{description}` and `{pubDate}` in `format`.
    pub fn render(&self, format: &str) -> String {
        format
            .replace("{title}", &self.title)
            .replace("{link}", &self.link)
            .replace("{description}", &self.description)
            .replace("{pubDate}", &self.pub_date)
    }
}

fn item_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<item\b[^>]*>(.*?)</item>").expect("valid item regex"))
}

fn cdata_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<!\[CDATA\[(.*?)\]\]>").expect("valid cdata regex"))
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag regex"))
}

fn br_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<br\s*/?>").expect("valid br regex"))
}

/// Extract the items of an RSS document. `source` names the document in errors.
pub fn parse_items(source: &str, xml: &str) -> ScreenResult<Vec<FeedItem>> {
    if !xml.contains("<rss") && !xml.contains("<channel") && !xml.contains("<rdf:RDF") {
        return Err(ScreenError::parse(source, "The document is not an RSS feed."));
    }

    let items: Vec<FeedItem> = item_re()
        .captures_iter(xml)
        .map(|caps| {
            let body = caps.get(1).map_or("", |m| m.as_str());
            FeedItem {
                title: field(body, "title"),
                link: field(body, "link"),
                description: field(body, "description"),
                pub_date: field(body, "pubDate"),
            }
        })
        .collect();

    if items.is_empty() {
        return Err(ScreenError::parse(source, "The feed has no items."));
    }
    Ok(items)
}

/// Text of the first `<name>` child, CDATA unwrapped and entities decoded.
fn field(body: &str, name: &str) -> String {
    let open = format!("<{name}");
    let close = format!("</{name}>");

    let Some(start) = body.find(&open) else {
        return String::new();
    };
    let after_open = &body[start..];
    let Some(gt) = after_open.find('>') else {
        return String::new();
    };
    if after_open[..gt].ends_with('/') {
        return String::new();
    }
    let inner = &after_open[gt + 1..];
    let raw = match inner.find(&close) {
        Some(end) => &inner[..end],
        None => return String::new(),
    };

    let text = cdata_re().replace_all(raw, "$1");
    html_escape::decode_html_entities(text.trim()).into_owned()
}

/// Decode HTML entities and turn `<br>` variants into newlines.
pub fn unescape(text: &str) -> String {
    let decoded = html_escape::decode_html_entities(text);
    br_re().replace_all(&decoded, "\n").into_owned()
}

/// Remove every markup tag, keeping the text between them.
pub fn strip_html(text: &str) -> String {
    tag_re().replace_all(text, "").into_owned()
}

/// Interpret `\n`, `\t` and `\\` typed literally on the command line.
pub fn unescape_format(format: &str) -> String {
    let mut out = String::with_capacity(format.len());
    let mut chars = format.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
