//! Line codec for article records.
//!
//! ```text
//! <id>|<title>|<contributors>|<year>|<payload_key>
//! ```
//!
//! Field values are not escaped. A value containing `|` produces a line that
//! no longer splits into five fields and is dropped on the next load; callers
//! should reject such values before they reach the table.

use arx_types::{Article, ArticleId, FIELD_DELIMITER};

/// Number of fields in an encoded line.
pub const FIELD_COUNT: usize = 5;

/// Encode an article as a single line (without a trailing newline).
pub fn encode(article: &Article) -> String {
    let sep = FIELD_DELIMITER.to_string();
    [
        article.id.as_str(),
        article.title.as_str(),
        article.contributors.as_str(),
        article.year.as_str(),
        article.payload_key.as_str(),
    ]
    .join(&sep)
}

/// Decode a line into an article.
///
/// Surrounding whitespace (including `\r`) is ignored. Lines that do not
/// split into exactly five fields, blank lines included, yield `None`.
pub fn decode(line: &str) -> Option<Article> {
    let parts: Vec<&str> = line.trim().split(FIELD_DELIMITER).collect();
    let [id, title, contributors, year, payload_key] = parts.as_slice() else {
        return None;
    };
    Some(Article::new(
        ArticleId::new(*id),
        *title,
        *contributors,
        *year,
        *payload_key,
    ))
}
