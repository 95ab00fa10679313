//! Query-parameter builder for the `cdn/stories` endpoints.
//!
//! Every blog operation is a fixed template over these parameters. Filters
//! encode as nested keys, e.g. `filter_query[category.full_slug][in]=categories/news`.

use crate::config::ContentVersion;

/// One `filter_query[field][op]=value` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterClause {
    pub field: String,
    pub op: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoryQuery {
    pub starts_with: Option<String>,
    pub resolve_relations: Vec<String>,
    pub sort_by: Option<String>,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
    pub version: Option<ContentVersion>,
    pub search_term: Option<String>,
    pub excluding_ids: Vec<u64>,
    pub filters: Vec<FilterClause>,
}

impl StoryQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starts_with(mut self, prefix: impl Into<String>) -> Self {
        self.starts_with = Some(prefix.into());
        self
    }

    pub fn resolve_relations<I, S>(mut self, relations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resolve_relations = relations.into_iter().map(Into::into).collect();
        self
    }

    pub fn sort_by(mut self, key: impl Into<String>) -> Self {
        self.sort_by = Some(key.into());
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn version(mut self, version: ContentVersion) -> Self {
        self.version = Some(version);
        self
    }

    pub fn search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    pub fn excluding_id(mut self, id: u64) -> Self {
        self.excluding_ids.push(id);
        self
    }

    pub fn filter(
        mut self,
        field: impl Into<String>,
        op: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.filters.push(FilterClause {
            field: field.into(),
            op: op.into(),
            value: value.into(),
        });
        self
    }

    /// Flatten into `(key, value)` pairs in a stable order. The pairs are
    /// also the cache key, so ordering must not depend on insertion history
    /// beyond the filter list itself.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(prefix) = &self.starts_with {
            pairs.push(("starts_with".to_string(), prefix.clone()));
        }
        for clause in &self.filters {
            pairs.push((
                format!("filter_query[{}][{}]", clause.field, clause.op),
                clause.value.clone(),
            ));
        }
        if !self.excluding_ids.is_empty() {
            let ids: Vec<String> = self.excluding_ids.iter().map(u64::to_string).collect();
            pairs.push(("excluding_ids".to_string(), ids.join(",")));
        }
        if let Some(term) = &self.search_term {
            pairs.push(("search_term".to_string(), term.clone()));
        }
        if !self.resolve_relations.is_empty() {
            pairs.push(("resolve_relations".to_string(), self.resolve_relations.join(",")));
        }
        if let Some(sort) = &self.sort_by {
            pairs.push(("sort_by".to_string(), sort.clone()));
        }
        if let Some(per_page) = self.per_page {
            pairs.push(("per_page".to_string(), per_page.to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(version) = self.version {
            pairs.push(("version".to_string(), version.as_str().to_string()));
        }
        pairs
    }

    /// Look up an encoded parameter by key. Mostly useful in tests.
    pub fn param(&self, key: &str) -> Option<String> {
        self.to_pairs().into_iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}
