//! Queue filter
//!
//! A derived, never persisted projection over the item collection. All
//! predicates are optional and combine with AND.

use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use super::item::{ContentType, ModerationQueueItem, ModerationStatus};

/// Ordering by creation time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "newest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            _ => Err(format!("Unknown sort order: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationFilter {
    /// `None` means "all"
    #[serde(default, deserialize_with = "all_or_parse")]
    pub status: Option<ModerationStatus>,
    #[serde(default, deserialize_with = "all_or_parse")]
    pub content_type: Option<ContentType>,
    #[serde(default, deserialize_with = "all_or_parse")]
    pub category: Option<String>,
    /// Inclusive lower bound on `createdAt`
    #[serde(default, deserialize_with = "all_or_parse")]
    pub created_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `createdAt`
    #[serde(default, deserialize_with = "all_or_parse")]
    pub created_to: Option<DateTime<Utc>>,
    /// Case-insensitive substring of content or creator name
    #[serde(default, deserialize_with = "non_blank")]
    pub search: Option<String>,
    #[serde(default)]
    pub sort: SortOrder,
}

impl ModerationFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: ModerationStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = Some(content_type);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_date_range(
        mut self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Self {
        self.created_from = from;
        self.created_to = to;
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = Some(search.trim().to_string()).filter(|s| !s.is_empty());
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Check every predicate against a single item
    pub fn matches(&self, item: &ModerationQueueItem) -> bool {
        if self.status.is_some_and(|s| s != item.status) {
            return false;
        }
        if self.content_type.is_some_and(|t| t != item.content_type) {
            return false;
        }
        if let Some(ref category) = self.category {
            let same = item
                .category
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(category.trim()));
            if !same {
                return false;
            }
        }
        if self.created_from.is_some_and(|from| item.created_at < from) {
            return false;
        }
        if self.created_to.is_some_and(|to| item.created_at > to) {
            return false;
        }
        if let Some(ref search) = self.search {
            let needle = search.to_lowercase();
            if !item.content.to_lowercase().contains(&needle)
                && !item.creator_name.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }

    /// Project the matching items into a new, ordered list
    pub fn apply<'a, I>(&self, items: I) -> Vec<ModerationQueueItem>
    where
        I: IntoIterator<Item = &'a ModerationQueueItem>,
    {
        let mut matched: Vec<ModerationQueueItem> = items
            .into_iter()
            .filter(|item| self.matches(item))
            .cloned()
            .collect();

        match self.sort {
            SortOrder::Newest => matched.sort_by(|a, b| {
                b.created_at
                    .cmp(&a.created_at)
                    .then_with(|| a.id.cmp(&b.id))
            }),
            SortOrder::Oldest => matched.sort_by(|a, b| {
                a.created_at
                    .cmp(&b.created_at)
                    .then_with(|| a.id.cmp(&b.id))
            }),
        }
        matched
    }
}

/// Treat a missing, blank or "all" value as no constraint
fn all_or_parse<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) if s.eq_ignore_ascii_case("all") => Ok(None),
        Some(s) => s.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}

fn non_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
}
