//! The in-memory article table and its secondary indexes.
//!
//! The [`ArticleIndex`] keeps a `BTreeMap<ArticleId, Article>` as the primary
//! table and two `BTreeMap<String, Vec<ArticleId>>` bucket maps, one keyed by
//! contributor name and one by year. All operations are in-memory; reading
//! and writing the backing file is done by [`crate::persist`].

use std::collections::BTreeMap;

use arx_types::{normalize_token, Article, ArticleEdit, ArticleId};
use tracing::debug;

use crate::error::{IndexError, IndexResult};

type Buckets = BTreeMap<String, Vec<ArticleId>>;

/// Primary table plus contributor and year indexes.
#[derive(Clone, Default)]
pub struct ArticleIndex {
    /// All articles, keyed by id.
    table: BTreeMap<ArticleId, Article>,
    /// Contributor name -> ids of the articles listing that name.
    by_contributor: Buckets,
    /// Year -> ids of the articles from that year.
    by_year: Buckets,
}

// Buckets are derived from the table; their member order only reflects
// insertion history.
impl PartialEq for ArticleIndex {
    fn eq(&self, other: &Self) -> bool {
        self.table == other.table
    }
}

impl Eq for ArticleIndex {}

impl std::fmt::Debug for ArticleIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArticleIndex")
            .field("articles", &self.table.len())
            .field("contributors", &self.by_contributor.len())
            .field("years", &self.by_year.len())
            .finish()
    }
}

impl ArticleIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of articles.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if there are no articles.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Remove every article.
    pub fn clear(&mut self) {
        self.table.clear();
        self.by_contributor.clear();
        self.by_year.clear();
    }

    // ---------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------

    /// Insert an article, replacing any article with the same id.
    ///
    /// A replaced article is evicted from its old buckets before the new one
    /// is indexed, so changing contributors or year through a re-insert
    /// leaves no stale memberships. Returns the replaced article.
    pub fn insert(&mut self, article: Article) -> Option<Article> {
        let previous = self.table.remove(&article.id);
        if let Some(prev) = &previous {
            self.unindex(prev);
        }

        self.index(&article);
        debug!(id = %article.id, replaced = previous.is_some(), "article indexed");
        self.table.insert(article.id.clone(), article);
        previous
    }

    /// Delete an article and all its bucket memberships.
    ///
    /// Unknown ids are a no-op and return `None`.
    pub fn delete(&mut self, id: &str) -> Option<Article> {
        let article = self.table.remove(id)?;
        self.unindex(&article);
        debug!(id = %article.id, "article deleted");
        Some(article)
    }

    /// Apply a partial edit to an article. Returns the updated article, or
    /// `None` if the id is unknown.
    pub fn update(&mut self, id: &str, edit: &ArticleEdit) -> Option<Article> {
        self.update_with(id, |article| article.apply(edit))
    }

    /// Mutate an article in place with full index maintenance.
    ///
    /// The id is part of the table key and cannot be changed here; if the
    /// mutator changes it, the original id is restored.
    pub fn update_with<F>(&mut self, id: &str, mutate: F) -> Option<Article>
    where
        F: FnOnce(&mut Article),
    {
        let mut article = self.delete(id)?;
        let original_id = article.id.clone();
        mutate(&mut article);
        article.id = original_id;
        self.insert(article.clone());
        Some(article)
    }

    fn index(&mut self, article: &Article) {
        for name in article.contributor_names() {
            add_member(&mut self.by_contributor, name, &article.id);
        }
        add_member(&mut self.by_year, article.year_key(), &article.id);
    }

    fn unindex(&mut self, article: &Article) {
        for name in article.contributor_names() {
            remove_member(&mut self.by_contributor, name, &article.id);
        }
        remove_member(&mut self.by_year, article.year_key(), &article.id);
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    /// Point lookup by id.
    pub fn lookup(&self, id: &str) -> Option<&Article> {
        self.table.get(id)
    }

    /// Returns `true` if an article with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.table.contains_key(id)
    }

    /// Articles listing `name` as a contributor (exact match after trimming).
    pub fn by_contributor(&self, name: &str) -> Vec<&Article> {
        self.resolve(self.by_contributor.get(normalize_token(name)))
    }

    /// Articles from `year` (exact match after trimming).
    pub fn by_year(&self, year: &str) -> Vec<&Article> {
        self.resolve(self.by_year.get(normalize_token(year)))
    }

    fn resolve(&self, bucket: Option<&Vec<ArticleId>>) -> Vec<&Article> {
        bucket
            .map(|ids| ids.iter().filter_map(|id| self.table.get(id)).collect())
            .unwrap_or_default()
    }

    /// Every article, in id order.
    pub fn all(&self) -> Vec<&Article> {
        self.table.values().collect()
    }

    /// Iterate over every article, in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Article> {
        self.table.values()
    }

    /// Indexed contributor names, sorted.
    pub fn contributors(&self) -> Vec<&str> {
        self.by_contributor.keys().map(String::as_str).collect()
    }

    /// Indexed years, sorted.
    pub fn years(&self) -> Vec<&str> {
        self.by_year.keys().map(String::as_str).collect()
    }

    // ---------------------------------------------------------------
    // Consistency
    // ---------------------------------------------------------------

    /// Describe every disagreement between the table and its indexes.
    pub fn inconsistencies(&self) -> Vec<String> {
        let mut problems = Vec::new();

        for article in self.table.values() {
            for name in article.contributor_names() {
                if !has_member(&self.by_contributor, name, &article.id) {
                    problems.push(format!("{} missing from contributor bucket {name:?}", article.id));
                }
            }
            let year = article.year_key();
            if !year.is_empty() && !has_member(&self.by_year, year, &article.id) {
                problems.push(format!("{} missing from year bucket {year:?}", article.id));
            }
        }

        check_buckets(&self.table, &self.by_contributor, "contributor", &mut problems, |article, key| {
            article.contributor_names().contains(&key)
        });
        check_buckets(&self.table, &self.by_year, "year", &mut problems, |article, key| {
            article.year_key() == key
        });

        problems
    }

    /// Verify that the table and its indexes agree.
    pub fn check_consistency(&self) -> IndexResult<()> {
        let problems = self.inconsistencies();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(IndexError::Inconsistent(problems.join("; ")))
        }
    }
}

impl Extend<Article> for ArticleIndex {
    fn extend<I: IntoIterator<Item = Article>>(&mut self, iter: I) {
        for article in iter {
            self.insert(article);
        }
    }
}

impl FromIterator<Article> for ArticleIndex {
    fn from_iter<I: IntoIterator<Item = Article>>(iter: I) -> Self {
        let mut index = Self::new();
        index.extend(iter);
        index
    }
}

fn add_member(buckets: &mut Buckets, key: &str, id: &ArticleId) {
    if key.is_empty() {
        return;
    }
    let bucket = buckets.entry(key.to_string()).or_default();
    if !bucket.contains(id) {
        bucket.push(id.clone());
    }
}

fn remove_member(buckets: &mut Buckets, key: &str, id: &ArticleId) {
    if let Some(bucket) = buckets.get_mut(key) {
        bucket.retain(|member| member != id);
        if bucket.is_empty() {
            buckets.remove(key);
        }
    }
}

fn has_member(buckets: &Buckets, key: &str, id: &ArticleId) -> bool {
    buckets.get(key).is_some_and(|bucket| bucket.contains(id))
}

fn check_buckets<F>(
    table: &BTreeMap<ArticleId, Article>,
    buckets: &Buckets,
    kind: &str,
    problems: &mut Vec<String>,
    belongs: F,
) where
    F: Fn(&Article, &str) -> bool,
{
    for (key, ids) in buckets {
        if ids.is_empty() {
            problems.push(format!("empty {kind} bucket {key:?}"));
        }
        for (pos, id) in ids.iter().enumerate() {
            if ids[..pos].contains(id) {
                problems.push(format!("{id} listed twice in {kind} bucket {key:?}"));
            }
            match table.get(id) {
                None => problems.push(format!("{kind} bucket {key:?} references missing {id}")),
                Some(article) if !belongs(article, key) => {
                    problems.push(format!("{id} is stale in {kind} bucket {key:?}"));
                }
                Some(_) => {}
            }
        }
    }
}
