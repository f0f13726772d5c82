//! HTML cleaning for everything sent to the article endpoints.

use std::collections::{HashMap, HashSet};

use ammonia::Builder;

/// Markup an article body may keep.
const CONTENT_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "p", "a", "ul", "ol", "li", "b", "i",
    "strong", "em", "strike", "code", "hr", "br", "div", "table", "thead", "tbody", "tr", "th",
    "td", "pre", "img", "iframe",
];

const CONTENT_ATTRIBUTES: &[&str] = &[
    "href", "name", "target", "src", "alt", "class", "style", "width", "height",
];

/// Embedded players need these on top of the generic set.
const IFRAME_ATTRIBUTES: &[&str] = &["frameborder", "allowfullscreen"];

const URL_SCHEMES: &[&str] = &["http", "https", "ftp", "mailto", "tel"];

/// Dropped together with their text, not just unwrapped.
const DROP_WITH_CONTENT: &[&str] = &["script", "style"];

/// Clean an article body down to the allowed tags and attributes.
/// Event handlers and `javascript:` URLs never survive.
pub fn sanitize_html(input: &str) -> String {
    let mut builder = Builder::default();
    builder
        .tags(CONTENT_TAGS.iter().copied().collect())
        .generic_attributes(CONTENT_ATTRIBUTES.iter().copied().collect())
        .tag_attributes(HashMap::new())
        .add_tag_attributes("iframe", IFRAME_ATTRIBUTES.iter())
        .url_schemes(URL_SCHEMES.iter().copied().collect())
        .clean_content_tags(DROP_WITH_CONTENT.iter().copied().collect());
    builder.clean(input).to_string()
}

/// Reduce a title to text. Markup is removed and the result trimmed.
pub fn plain_text(input: &str) -> String {
    let mut builder = Builder::empty();
    builder.clean_content_tags(DROP_WITH_CONTENT.iter().copied().collect::<HashSet<_>>());
    builder.clean(input).to_string().trim().to_string()
}
