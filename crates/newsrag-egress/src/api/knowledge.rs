//! `/knowledge` endpoints

use crate::Gateway;
use crate::request::{ApiRequest, UploadFile};
use newsrag_core::Result;
use newsrag_core::models::{KnowledgeEntry, PageResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Query parameters for `GET /knowledge/list`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeListParams {
    pub page: u32,
    pub size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl Default for KnowledgeListParams {
    fn default() -> Self {
        Self {
            page: 1,
            size: 10,
            keyword: None,
            content_type: None,
            start_date: None,
            end_date: None,
        }
    }
}

/// Body for `POST /knowledge/search`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeSearch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    /// `keyword`, `semantic` or `hybrid`
    pub search_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_ids: Vec<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// `relevance`, `time` or `views`
    pub sort_by: String,
    /// `asc` or `desc`
    pub sort_order: String,
    pub current: u64,
    pub size: u64,
}

impl Default for KnowledgeSearch {
    fn default() -> Self {
        Self {
            keyword: None,
            search_type: "hybrid".to_string(),
            source_ids: Vec::new(),
            tags: Vec::new(),
            start_date: None,
            end_date: None,
            sort_by: "relevance".to_string(),
            sort_order: "desc".to_string(),
            current: 1,
            size: 20,
        }
    }
}

impl KnowledgeSearch {
    pub fn keyword(keyword: impl Into<String>) -> Self {
        Self {
            keyword: Some(keyword.into()),
            ..Self::default()
        }
    }
}

/// Body for `POST /knowledge`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewKnowledgeEntry {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Value>,
}

/// Body for `PUT /knowledge/{id}`; only the fields set are changed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// Outcome of `POST /knowledge/batch-delete`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDeleteResult {
    #[serde(default)]
    pub success_count: u64,
    #[serde(default)]
    pub fail_count: u64,
    #[serde(default)]
    pub total: u64,
}

#[derive(Serialize)]
struct BatchDeleteBody<'a> {
    ids: &'a [i64],
}

#[derive(Debug, Clone)]
pub struct KnowledgeApi {
    gateway: Arc<Gateway>,
}

impl KnowledgeApi {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    pub async fn list(&self, params: &KnowledgeListParams) -> Result<PageResult<KnowledgeEntry>> {
        self.gateway
            .send(ApiRequest::get("/knowledge/list").with_query(params)?)
            .await
    }

    pub async fn get(&self, id: i64) -> Result<KnowledgeEntry> {
        self.gateway
            .send(ApiRequest::get(format!("/knowledge/{}", id)))
            .await
    }

    pub async fn create(&self, entry: &NewKnowledgeEntry) -> Result<KnowledgeEntry> {
        self.gateway
            .send(ApiRequest::post("/knowledge").with_json(entry)?)
            .await
    }

    pub async fn update(&self, id: i64, update: &KnowledgeUpdate) -> Result<KnowledgeEntry> {
        self.gateway
            .send(ApiRequest::put(format!("/knowledge/{}", id)).with_json(update)?)
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.gateway
            .send_value(ApiRequest::delete(format!("/knowledge/{}", id)))
            .await
            .map(|_| ())
    }

    pub async fn search(&self, search: &KnowledgeSearch) -> Result<PageResult<KnowledgeEntry>> {
        self.gateway
            .send(ApiRequest::post("/knowledge/search").with_json(search)?)
            .await
    }

    pub async fn batch_delete(&self, ids: &[i64]) -> Result<BatchDeleteResult> {
        self.gateway
            .send(ApiRequest::post("/knowledge/batch-delete").with_json(&BatchDeleteBody { ids })?)
            .await
    }

    /// Upload a document; the backend extracts its text into a new entry
    pub async fn upload(&self, file: UploadFile) -> Result<KnowledgeEntry> {
        self.gateway
            .send(ApiRequest::post("/knowledge/upload").with_multipart(file))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{gateway_expecting, gateway_returning};
    use crate::request::RequestBody;
    use reqwest::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_sends_exact_query_and_returns_records() {
        let records = json!([{"id": 1, "title": "AI相关知识", "content": "内容"}]);
        let (gateway, _) = gateway_expecting(
            |req| {
                req.method == Method::GET
                    && req.path == "/knowledge/list"
                    && req.query.as_deref() == Some("page=1&size=10&keyword=AI")
            },
            json!({"records": records.clone(), "total": 1, "current": 1, "size": 10}),
        );

        let page = KnowledgeApi::new(gateway)
            .list(&KnowledgeListParams {
                keyword: Some("AI".to_string()),
                ..KnowledgeListParams::default()
            })
            .await
            .unwrap();

        assert_eq!(serde_json::to_value(&page.records).unwrap(), records);
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let (gateway, _) = gateway_expecting(
            |req| req.method == Method::GET && req.path == "/knowledge/1",
            json!({"id": 1, "title": "知识条目", "content": "详细内容", "viewCount": 10}),
        );

        let entry = KnowledgeApi::new(gateway).get(1).await.unwrap();
        assert_eq!(entry.id(), Some(1));
        assert_eq!(entry.view_count(), Some(10));
    }

    #[tokio::test]
    async fn test_create_posts_entry() {
        let (gateway, _) = gateway_expecting(
            |req| {
                req.method == Method::POST
                    && req.path == "/knowledge"
                    && req.body
                        == RequestBody::Json(json!({
                            "title": "新知识",
                            "content": "新内容",
                            "contentType": "article"
                        }))
            },
            json!({"id": 1, "title": "新知识", "content": "新内容"}),
        );

        let entry = KnowledgeApi::new(gateway)
            .create(&NewKnowledgeEntry {
                title: "新知识".to_string(),
                content: "新内容".to_string(),
                content_type: Some("article".to_string()),
                ..NewKnowledgeEntry::default()
            })
            .await
            .unwrap();
        assert_eq!(entry.title(), Some("新知识"));
    }

    #[tokio::test]
    async fn test_update_sends_only_changed_fields() {
        let (gateway, _) = gateway_expecting(
            |req| {
                req.method == Method::PUT
                    && req.path == "/knowledge/1"
                    && req.body == RequestBody::Json(json!({"title": "更新的标题"}))
            },
            json!({"id": 1, "title": "更新的标题"}),
        );

        let entry = KnowledgeApi::new(gateway)
            .update(
                1,
                &KnowledgeUpdate {
                    title: Some("更新的标题".to_string()),
                    ..KnowledgeUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(entry.title(), Some("更新的标题"));
    }

    #[tokio::test]
    async fn test_delete() {
        let (gateway, _) = gateway_expecting(
            |req| req.method == Method::DELETE && req.path == "/knowledge/1",
            serde_json::Value::Null,
        );

        assert!(KnowledgeApi::new(gateway).delete(1).await.is_ok());
    }

    #[tokio::test]
    async fn test_search_defaults() {
        let (gateway, _) = gateway_expecting(
            |req| {
                req.path == "/knowledge/search"
                    && req.body
                        == RequestBody::Json(json!({
                            "keyword": "深度学习",
                            "searchType": "hybrid",
                            "sortBy": "relevance",
                            "sortOrder": "desc",
                            "current": 1,
                            "size": 20
                        }))
            },
            json!({"records": [], "total": 0, "current": 1, "size": 20}),
        );

        let page = KnowledgeApi::new(gateway)
            .search(&KnowledgeSearch::keyword("深度学习"))
            .await
            .unwrap();
        assert!(page.records.is_empty());
    }

    #[tokio::test]
    async fn test_batch_delete() {
        let (gateway, _) = gateway_expecting(
            |req| {
                req.path == "/knowledge/batch-delete"
                    && req.body == RequestBody::Json(json!({"ids": [1, 2, 3]}))
            },
            json!({"successCount": 2, "failCount": 1, "total": 3}),
        );

        let result = KnowledgeApi::new(gateway)
            .batch_delete(&[1, 2, 3])
            .await
            .unwrap();
        assert_eq!(
            result,
            BatchDeleteResult {
                success_count: 2,
                fail_count: 1,
                total: 3
            }
        );
    }

    #[tokio::test]
    async fn test_upload_is_multipart() {
        let (gateway, _) = gateway_expecting(
            |req| {
                req.path == "/knowledge/upload"
                    && matches!(&req.body, RequestBody::Multipart(file) if file.file_name == "report.pdf")
            },
            json!({"id": 9, "title": "report"}),
        );

        let entry = KnowledgeApi::new(gateway)
            .upload(UploadFile::new("report.pdf", b"%PDF-1.4".to_vec()))
            .await
            .unwrap();
        assert_eq!(entry.id(), Some(9));
    }

    #[tokio::test]
    async fn test_entry_passes_through_unchanged() {
        let raw = json!({
            "id": 3,
            "title": "t",
            "summary": null,
            "author": null,
            "vectorId": 77,
            "status": 1,
            "tags": "[\"ai\"]"
        });
        let (gateway, _) = gateway_returning(raw.clone());

        let entry = KnowledgeApi::new(gateway).get(3).await.unwrap();
        assert_eq!(serde_json::to_value(&entry).unwrap(), raw);
    }
}
