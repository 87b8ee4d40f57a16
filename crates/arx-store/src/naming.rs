use arx_types::{ArticleId, FIELD_DELIMITER};

use crate::error::{BlobError, BlobResult};

/// Default payload file extension.
pub const DEFAULT_PAYLOAD_EXTENSION: &str = "txt";

/// Policy mapping an article id to its payload blob key: `<id>.<extension>`.
///
/// The key is stored on the record, so changing the policy only affects
/// articles registered afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PayloadNaming {
    extension: String,
}

impl PayloadNaming {
    /// A policy using the given extension. A leading dot is ignored; an
    /// empty extension yields bare ids as keys.
    ///
    /// The extension ends up in file names and in database lines, so path
    /// separators, NUL, [`FIELD_DELIMITER`] and line breaks are rejected.
    pub fn new(extension: impl Into<String>) -> BlobResult<Self> {
        let extension = extension.into();
        let extension = extension.trim().trim_start_matches('.');
        if extension.contains(['/', '\\', '\0', FIELD_DELIMITER, '\n', '\r']) {
            return Err(BlobError::InvalidKey(format!("payload extension {extension:?}")));
        }
        Ok(Self {
            extension: extension.to_string(),
        })
    }

    /// The extension, without a leading dot.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Blob key for an article id.
    pub fn key_for(&self, id: &ArticleId) -> String {
        if self.extension.is_empty() {
            id.to_string()
        } else {
            format!("{id}.{}", self.extension)
        }
    }
}

impl Default for PayloadNaming {
    fn default() -> Self {
        Self {
            extension: DEFAULT_PAYLOAD_EXTENSION.to_string(),
        }
    }
}
