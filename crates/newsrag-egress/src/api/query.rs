//! `/query` endpoints: question answering and semantic search

use crate::Gateway;
use crate::request::ApiRequest;
use newsrag_core::Result;
use newsrag_core::models::QueryResult;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Number of entries retrieved when the caller does not say
pub const DEFAULT_TOP_K: u32 = 5;

/// Body for `POST /query/ask`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskRequest {
    pub query: String,
    pub top_k: u32,
    pub need_answer: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity_threshold: Option<f64>,
    /// `semantic`, `keyword` or `hybrid`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_type: Option<String>,
    /// Conversation id for follow-up questions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl AskRequest {
    /// Question with `topK = 5` and an answer requested
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            top_k: DEFAULT_TOP_K,
            need_answer: true,
            similarity_threshold: None,
            query_type: None,
            session_id: None,
        }
    }

    pub fn top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn need_answer(mut self, need_answer: bool) -> Self {
        self.need_answer = need_answer;
        self
    }

    pub fn similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = Some(threshold);
        self
    }
}

/// Body for `POST /query/search`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub query: String,
    pub top_k: u32,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k;
        self
    }
}

#[derive(Debug, Clone)]
pub struct QueryApi {
    gateway: Arc<Gateway>,
}

impl QueryApi {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    pub async fn ask(&self, request: &AskRequest) -> Result<QueryResult> {
        self.gateway
            .send(ApiRequest::post("/query/ask").with_json(request)?)
            .await
    }

    pub async fn semantic_search(&self, query: &SearchQuery) -> Result<QueryResult> {
        self.gateway
            .send(ApiRequest::post("/query/search").with_json(query)?)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{gateway_expecting, gateway_returning};
    use crate::request::RequestBody;
    use serde_json::json;

    #[test]
    fn test_ask_defaults() {
        let request = AskRequest::new("什么是人工智能？");
        assert_eq!(request.top_k, 5);
        assert!(request.need_answer);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"query": "什么是人工智能？", "topK": 5, "needAnswer": true})
        );
    }

    #[tokio::test]
    async fn test_ask_returns_answer() {
        let (gateway, _) = gateway_expecting(
            |req| {
                req.path == "/query/ask"
                    && req.body
                        == RequestBody::Json(
                            json!({"query": "什么是人工智能？", "topK": 5, "needAnswer": true}),
                        )
            },
            json!({
                "answer": "这是AI生成的答案",
                "query": "什么是人工智能？",
                "retrievedEntries": [{"id": 1, "title": "AI简介", "score": 0.95}],
                "processingTimeMs": 150
            }),
        );

        let result = QueryApi::new(gateway)
            .ask(&AskRequest::new("什么是人工智能？"))
            .await
            .unwrap();

        assert_eq!(result.answer(), Some("这是AI生成的答案"));
        assert_eq!(result.processing_time_ms(), Some(150));
    }

    #[tokio::test]
    async fn test_ask_without_answer() {
        let (gateway, _) = gateway_expecting(
            |req| matches!(&req.body, RequestBody::Json(body) if body["needAnswer"] == false),
            json!({
                "answer": null,
                "query": "什么是机器学习？",
                "retrievedEntries": [{"id": 1, "title": "ML基础", "score": 0.92}],
                "processingTimeMs": 80
            }),
        );

        let result = QueryApi::new(gateway)
            .ask(&AskRequest::new("什么是机器学习？").need_answer(false))
            .await
            .unwrap();

        assert_eq!(result.answer(), None);
        assert_eq!(result.retrieved_entries().len(), 1);
    }

    #[tokio::test]
    async fn test_ask_tolerates_null_entry_fields() {
        let raw = json!({
            "answer": "答案",
            "retrievedEntries": [{"id": 1, "title": null, "score": 0.9, "summary": null}]
        });
        let (gateway, _) = gateway_returning(raw.clone());

        let result = QueryApi::new(gateway)
            .ask(&AskRequest::new("q"))
            .await
            .unwrap();

        let entries = result.retrieved_entries();
        assert_eq!(entries[0].id(), Some(1));
        assert_eq!(entries[0].title(), None);
        assert_eq!(serde_json::to_value(&result).unwrap(), raw);
    }

    #[tokio::test]
    async fn test_semantic_search_preserves_order() {
        let (gateway, _) = gateway_expecting(
            |req| {
                req.path == "/query/search"
                    && req.body == RequestBody::Json(json!({"query": "深度学习", "topK": 10}))
            },
            json!({
                "query": "深度学习",
                "retrievedEntries": [
                    {"id": 1, "title": "深度学习入门", "score": 0.98},
                    {"id": 2, "title": "神经网络基础", "score": 0.85}
                ],
                "processingTimeMs": 60
            }),
        );

        let result = QueryApi::new(gateway)
            .semantic_search(&SearchQuery::new("深度学习").top_k(10))
            .await
            .unwrap();

        let ids: Vec<Option<i64>> = result.retrieved_entries().iter().map(|e| e.id()).collect();
        assert_eq!(ids, vec![Some(1), Some(2)]);
    }

    #[tokio::test]
    async fn test_semantic_search_no_matches() {
        let (gateway, _) = gateway_returning(json!({
            "query": "不存在的内容",
            "retrievedEntries": [],
            "processingTimeMs": 45
        }));

        let result = QueryApi::new(gateway)
            .semantic_search(&SearchQuery::new("不存在的内容"))
            .await
            .unwrap();
        assert!(result.retrieved_entries().is_empty());
    }
}
