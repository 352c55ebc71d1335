//! Domain models exchanged with the knowledge-base backend
//!
//! Records read from the backend (`KnowledgeEntry`, `QueryResult`,
//! `RetrievedEntry`) are pass-through: they hold the JSON object exactly as
//! received, explicit `null`s and unknown keys included, and expose typed
//! accessors. A null or mistyped field reads as `None` instead of failing
//! the whole response.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Role assumed when no profile is cached
pub const GUEST_ROLE: &str = "guest";

/// Role granting administrative views
pub const ADMIN_ROLE: &str = "admin";

/// Client-held proof of authentication plus cached profile data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Opaque bearer token; empty when anonymous
    #[serde(default)]
    pub token: String,

    /// Cached profile record
    #[serde(default)]
    pub user_info: Option<UserInfo>,

    /// Username kept separately for quick access
    #[serde(default)]
    pub username: String,
}

impl Session {
    pub fn is_logged_in(&self) -> bool {
        !self.token.is_empty()
    }

    /// Role from the cached profile, or `"guest"`
    pub fn role(&self) -> &str {
        self.user_info
            .as_ref()
            .and_then(|info| info.role.as_deref())
            .unwrap_or(GUEST_ROLE)
    }

    pub fn is_admin(&self) -> bool {
        self.role() == ADMIN_ROLE
    }

    /// True when nothing is held in memory
    pub fn is_empty(&self) -> bool {
        self.token.is_empty()
            && self.username.is_empty()
            && self.user_info.as_ref().is_none_or(UserInfo::is_empty)
    }
}

/// Cached user profile (`id`, `username`, `role`, `email`, ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Any other profile fields the backend sends
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserInfo {
    /// Profile holding only a username
    pub fn with_username(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.username.is_none()
            && self.email.is_none()
            && self.full_name.is_none()
            && self.role.is_none()
            && self.extra.is_empty()
    }
}

/// One page of a paginated listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    #[serde(default = "Vec::new")]
    pub records: Vec<T>,

    #[serde(default)]
    pub total: u64,

    #[serde(default)]
    pub current: u64,

    #[serde(default)]
    pub size: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<u64>,
}

impl<T> PageResult<T> {
    /// Total page count, derived from `total` and `size` when the backend omits it
    pub fn page_count(&self) -> u64 {
        match self.pages {
            Some(pages) => pages,
            None if self.size == 0 => 0,
            None => self.total.div_ceil(self.size),
        }
    }
}

/// A knowledge-base entry as stored by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnowledgeEntry(Map<String, Value>);

impl KnowledgeEntry {
    pub fn id(&self) -> Option<i64> {
        int_field(&self.0, "id")
    }

    pub fn title(&self) -> Option<&str> {
        str_field(&self.0, "title")
    }

    pub fn content(&self) -> Option<&str> {
        str_field(&self.0, "content")
    }

    pub fn summary(&self) -> Option<&str> {
        str_field(&self.0, "summary")
    }

    pub fn source_name(&self) -> Option<&str> {
        str_field(&self.0, "sourceName")
    }

    pub fn source_url(&self) -> Option<&str> {
        str_field(&self.0, "sourceUrl")
    }

    pub fn author(&self) -> Option<&str> {
        str_field(&self.0, "author")
    }

    pub fn published_at(&self) -> Option<&str> {
        str_field(&self.0, "publishedAt")
    }

    /// Either a JSON-encoded string or an array, depending on the endpoint
    pub fn tags(&self) -> Option<&Value> {
        self.get("tags")
    }

    pub fn content_type(&self) -> Option<&str> {
        str_field(&self.0, "contentType")
    }

    pub fn view_count(&self) -> Option<i64> {
        int_field(&self.0, "viewCount")
    }

    pub fn created_at(&self) -> Option<&str> {
        str_field(&self.0, "createdAt")
    }

    pub fn updated_at(&self) -> Option<&str> {
        str_field(&self.0, "updatedAt")
    }

    /// Raw field, `null`s included
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for KnowledgeEntry {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Answer and retrieval trace for a question
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryResult(Map<String, Value>);

impl QueryResult {
    pub fn query(&self) -> Option<&str> {
        str_field(&self.0, "query")
    }

    /// Generated answer; `None` when no answer was requested or produced
    pub fn answer(&self) -> Option<&str> {
        str_field(&self.0, "answer")
    }

    /// Entries in retrieval order; non-object items are skipped
    pub fn retrieved_entries(&self) -> Vec<RetrievedEntry> {
        self.get("retrievedEntries")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| entry.as_object().cloned().map(RetrievedEntry))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// `processingTimeMs`, or `responseTimeMs` on older backends
    pub fn processing_time_ms(&self) -> Option<u64> {
        self.get("processingTimeMs")
            .filter(|v| !v.is_null())
            .or_else(|| self.get("responseTimeMs"))
            .and_then(Value::as_u64)
    }

    pub fn query_id(&self) -> Option<i64> {
        int_field(&self.0, "queryId")
    }

    pub fn session_id(&self) -> Option<&str> {
        str_field(&self.0, "sessionId")
    }

    /// Raw field, `null`s included
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for QueryResult {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// A knowledge entry matched by retrieval
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RetrievedEntry(Map<String, Value>);

impl RetrievedEntry {
    pub fn id(&self) -> Option<i64> {
        int_field(&self.0, "id")
    }

    pub fn title(&self) -> Option<&str> {
        str_field(&self.0, "title")
    }

    /// `score`, or `similarityScore` as the query service names it
    pub fn score(&self) -> Option<f64> {
        self.get("score")
            .filter(|v| !v.is_null())
            .or_else(|| self.get("similarityScore"))
            .and_then(Value::as_f64)
    }

    pub fn summary(&self) -> Option<&str> {
        str_field(&self.0, "summary")
    }

    pub fn source_name(&self) -> Option<&str> {
        str_field(&self.0, "sourceName")
    }

    pub fn source_url(&self) -> Option<&str> {
        str_field(&self.0, "sourceUrl")
    }

    pub fn published_at(&self) -> Option<&str> {
        str_field(&self.0, "publishedAt")
    }

    /// String tags; other items are skipped
    pub fn tags(&self) -> Vec<&str> {
        self.get("tags")
            .and_then(Value::as_array)
            .map(|tags| tags.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Raw field, `null`s included
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for RetrievedEntry {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn str_field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key).and_then(Value::as_str)
}

fn int_field(map: &Map<String, Value>, key: &str) -> Option<i64> {
    map.get(key).and_then(Value::as_i64)
}
