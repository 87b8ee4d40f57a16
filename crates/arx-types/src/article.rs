//! The article record and its partial-update type.

use serde::{Deserialize, Serialize};

use crate::identity::ArticleId;

/// Separator between fields in the persisted line format. Also the forbidden
/// character in field values, since lines are not escaped.
pub const FIELD_DELIMITER: char = '|';

/// Separator between names in the `contributors` field.
pub const CONTRIBUTOR_SEPARATOR: char = ',';

/// A catalog record.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Article {
    /// Content digest of the payload. Primary key.
    pub id: ArticleId,
    /// Free-text title.
    pub title: String,
    /// Comma-separated contributor names, stored as entered.
    pub contributors: String,
    /// Publication year. An opaque token, not validated as numeric.
    pub year: String,
    /// Name of the payload blob in the blob store.
    pub payload_key: String,
}

impl Article {
    /// Create a new article record.
    pub fn new(
        id: ArticleId,
        title: impl Into<String>,
        contributors: impl Into<String>,
        year: impl Into<String>,
        payload_key: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            contributors: contributors.into(),
            year: year.into(),
            payload_key: payload_key.into(),
        }
    }

    /// Contributor names as indexed: comma-split, trimmed, empties dropped.
    pub fn contributor_names(&self) -> Vec<&str> {
        contributor_names(&self.contributors)
    }

    /// The year as indexed.
    pub fn year_key(&self) -> &str {
        normalize_token(&self.year)
    }

    /// Returns `true` if any field contains [`FIELD_DELIMITER`] or a line
    /// break, which the line format cannot represent.
    pub fn has_delimiter(&self) -> bool {
        [
            self.id.as_str(),
            self.title.as_str(),
            self.contributors.as_str(),
            self.year.as_str(),
            self.payload_key.as_str(),
        ]
        .iter()
        .any(|field| field.contains([FIELD_DELIMITER, '\n', '\r']))
    }

    /// Apply a partial update in place. The id is never changed.
    pub fn apply(&mut self, edit: &ArticleEdit) {
        if let Some(title) = &edit.title {
            self.title = title.trim().to_string();
        }
        if let Some(contributors) = &edit.contributors {
            self.contributors = contributors.trim().to_string();
        }
        if let Some(year) = &edit.year {
            self.year = year.trim().to_string();
        }
    }
}

/// A partial update of an article. `None` fields keep their current value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleEdit {
    pub title: Option<String>,
    pub contributors: Option<String>,
    pub year: Option<String>,
}

impl ArticleEdit {
    /// An edit that changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn contributors(mut self, contributors: impl Into<String>) -> Self {
        self.contributors = Some(contributors.into());
        self
    }

    pub fn year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }

    /// Returns `true` if no field would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.contributors.is_none() && self.year.is_none()
    }
}

/// Split a contributor list into index keys.
pub fn contributor_names(contributors: &str) -> Vec<&str> {
    contributors
        .split(CONTRIBUTOR_SEPARATOR)
        .map(normalize_token)
        .filter(|name| !name.is_empty())
        .collect()
}

/// Normalize an index key or query token.
pub fn normalize_token(token: &str) -> &str {
    token.trim()
}
