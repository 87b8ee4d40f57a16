use std::path::{Path, PathBuf};

use arx_crypto::ContentHasher;
use arx_index::{load_file, save_file, ArticleIndex};
use arx_store::{BlobStore, FsBlobStore, InMemoryBlobStore, PayloadNaming};
use arx_types::{Article, ArticleEdit, ArticleId, FIELD_DELIMITER};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::CatalogConfig;
use crate::error::{CatalogError, CatalogResult};

/// Input for registering a new article.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewArticle {
    pub title: String,
    pub contributors: String,
    pub year: String,
    /// The payload, hashed in full to derive the article id.
    pub content: Vec<u8>,
}

impl NewArticle {
    pub fn new(
        title: impl Into<String>,
        contributors: impl Into<String>,
        year: impl Into<String>,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            title: title.into(),
            contributors: contributors.into(),
            year: year.into(),
            content: content.into(),
        }
    }
}

/// Outcome of [`Catalog::register`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "article", rename_all = "snake_case")]
pub enum Registration {
    /// A new article was stored.
    Created(Article),
    /// An article with the same content already exists; nothing was changed.
    Duplicate(Article),
}

impl Registration {
    /// The created or pre-existing article.
    pub fn article(&self) -> &Article {
        match self {
            Self::Created(article) | Self::Duplicate(article) => article,
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate(_))
    }
}

/// Listing order for [`Catalog::list`]. Both orders compare
/// case-insensitively.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Title,
    Contributors,
}

/// Result of [`Catalog::fsck`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FsckReport {
    /// Disagreements between the table and its secondary indexes.
    pub inconsistencies: Vec<String>,
    /// Articles whose payload blob is missing.
    pub missing_payloads: Vec<ArticleId>,
    /// Articles whose payload no longer hashes to their id.
    pub mismatched_payloads: Vec<ArticleId>,
}

impl FsckReport {
    /// Returns `true` if no problem was found.
    pub fn is_clean(&self) -> bool {
        self.inconsistencies.is_empty()
            && self.missing_payloads.is_empty()
            && self.mismatched_payloads.is_empty()
    }
}

/// An article catalog: the indexed table, its payload blobs, and the
/// database file they are saved to.
///
/// Mutations write a full snapshot of the table after every change. If that
/// write fails, the in-memory table is rolled back so it keeps matching
/// the file.
pub struct Catalog {
    index: ArticleIndex,
    blobs: Box<dyn BlobStore>,
    naming: PayloadNaming,
    database: Option<PathBuf>,
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("articles", &self.index.len())
            .field("naming", &self.naming)
            .field("database", &self.database)
            .finish()
    }
}

impl Catalog {
    /// Open the catalog described by `config`, loading its database.
    ///
    /// A missing database file opens an empty catalog.
    pub fn open(config: &CatalogConfig) -> CatalogResult<Self> {
        let naming = config.payload_naming()?;
        let index = load_file(&config.database)?;
        Ok(Self::with_parts(
            index,
            Box::new(FsBlobStore::new(&config.articles_dir)),
            naming,
            Some(config.database.clone()),
        ))
    }

    /// An empty catalog with in-memory payloads and no database file.
    pub fn in_memory() -> Self {
        Self::with_parts(
            ArticleIndex::new(),
            Box::new(InMemoryBlobStore::new()),
            PayloadNaming::default(),
            None,
        )
    }

    /// Assemble a catalog from its parts. With no database path, `save` is
    /// a no-op.
    pub fn with_parts(
        index: ArticleIndex,
        blobs: Box<dyn BlobStore>,
        naming: PayloadNaming,
        database: Option<PathBuf>,
    ) -> Self {
        Self {
            index,
            blobs,
            naming,
            database,
        }
    }

    /// The underlying table.
    pub fn index(&self) -> &ArticleIndex {
        &self.index
    }

    /// The database file, if any.
    pub fn database(&self) -> Option<&Path> {
        self.database.as_deref()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // ---- Mutations ----

    /// Register new content.
    ///
    /// The content is hashed; if an article with that id already exists it
    /// is returned as [`Registration::Duplicate`] and nothing changes.
    /// Otherwise the payload is stored, the article indexed, and the
    /// database saved.
    pub fn register(&mut self, new: NewArticle) -> CatalogResult<Registration> {
        let title = require_field("title", &new.title)?;
        let contributors = require_field("contributors", &new.contributors)?;
        let year = require_field("year", &new.year)?;

        let id = ContentHasher::hash_content(&new.content);
        if let Some(existing) = self.index.lookup(id.as_str()) {
            debug!(%id, "content already registered");
            return Ok(Registration::Duplicate(existing.clone()));
        }

        let payload_key = self.naming.key_for(&id);
        let article = Article::new(id, title, contributors, year, payload_key);
        if article.has_delimiter() {
            return Err(CatalogError::Validation(format!(
                "record {} cannot be stored as a single line",
                article.id
            )));
        }
        self.blobs.put(&article.payload_key, &new.content)?;

        self.index.insert(article.clone());
        if let Err(e) = self.save() {
            self.index.delete(article.id.as_str());
            self.discard_blob(&article);
            return Err(e);
        }

        info!(id = %article.id, title = %article.title, "article registered");
        Ok(Registration::Created(article))
    }

    /// Edit an article's title, contributors or year.
    ///
    /// Returns the updated article, or `None` if the id is unknown.
    pub fn edit(&mut self, id: &str, edit: &ArticleEdit) -> CatalogResult<Option<Article>> {
        for (name, value) in [
            ("title", &edit.title),
            ("contributors", &edit.contributors),
            ("year", &edit.year),
        ] {
            if let Some(value) = value {
                require_field(name, value)?;
            }
        }

        let Some(previous) = self.index.lookup(id).cloned() else {
            return Ok(None);
        };
        if edit.is_empty() {
            return Ok(Some(previous));
        }

        let updated = self.index.update(id, edit);
        if let Err(e) = self.save() {
            self.index.insert(previous);
            return Err(e);
        }

        info!(id, "article updated");
        Ok(updated)
    }

    /// Delete an article and its payload.
    ///
    /// Returns the removed article, or `None` if the id is unknown. The
    /// payload is removed only after the database has been saved; failure to
    /// remove it is logged and does not fail the operation.
    pub fn remove(&mut self, id: &str) -> CatalogResult<Option<Article>> {
        let Some(article) = self.index.delete(id) else {
            return Ok(None);
        };
        if let Err(e) = self.save() {
            self.index.insert(article);
            return Err(e);
        }

        self.discard_blob(&article);
        info!(id, "article removed");
        Ok(Some(article))
    }

    fn discard_blob(&self, article: &Article) {
        match self.blobs.remove(&article.payload_key) {
            Ok(true) => {}
            Ok(false) => debug!(key = %article.payload_key, "payload already absent"),
            Err(e) => warn!(key = %article.payload_key, error = %e, "failed to remove payload"),
        }
    }

    /// Write the full table to the database file.
    pub fn save(&self) -> CatalogResult<()> {
        if let Some(path) = &self.database {
            save_file(path, &self.index)?;
        }
        Ok(())
    }

    // ---- Queries ----

    pub fn get(&self, id: &str) -> Option<&Article> {
        self.index.lookup(id)
    }

    /// Every article, sorted case-insensitively by `sort`. Ties are broken
    /// by id.
    pub fn list(&self, sort: SortKey) -> Vec<&Article> {
        let mut articles = self.index.all();
        match sort {
            SortKey::Title => articles.sort_by_cached_key(|a| (a.title.to_lowercase(), a.id.clone())),
            SortKey::Contributors => {
                articles.sort_by_cached_key(|a| (a.contributors.to_lowercase(), a.id.clone()));
            }
        }
        articles
    }

    pub fn by_contributor(&self, name: &str) -> Vec<&Article> {
        self.index.by_contributor(name)
    }

    pub fn by_year(&self, year: &str) -> Vec<&Article> {
        self.index.by_year(year)
    }

    /// The stored payload of an article. `None` if the article is unknown.
    /// A known article with a missing blob is an error.
    pub fn payload(&self, id: &str) -> CatalogResult<Option<Vec<u8>>> {
        let Some(article) = self.index.lookup(id) else {
            return Ok(None);
        };
        match self.blobs.get(&article.payload_key)? {
            Some(data) => Ok(Some(data)),
            None => Err(CatalogError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("payload {} of article {id} is missing", article.payload_key),
            ))),
        }
    }

    /// Check the table's indexes and every article's payload.
    pub fn fsck(&self) -> CatalogResult<FsckReport> {
        let mut report = FsckReport {
            inconsistencies: self.index.inconsistencies(),
            ..FsckReport::default()
        };
        for article in self.index.iter() {
            match self.blobs.get(&article.payload_key)? {
                None => report.missing_payloads.push(article.id.clone()),
                Some(data) if !ContentHasher::verify(&data, &article.id) => {
                    report.mismatched_payloads.push(article.id.clone());
                }
                Some(_) => {}
            }
        }
        Ok(report)
    }
}

/// Trim a required text field, rejecting empty values and values the line
/// format cannot hold.
fn require_field(name: &str, value: &str) -> CatalogResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CatalogError::Validation(format!("{name} must not be empty")));
    }
    if value.contains([FIELD_DELIMITER, '\n', '\r']) {
        return Err(CatalogError::Validation(format!(
            "{name} must not contain {FIELD_DELIMITER:?} or line breaks"
        )));
    }
    Ok(value.to_string())
}
