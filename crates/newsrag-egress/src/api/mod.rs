//! Resource API wrappers
//!
//! One thin function per backend endpoint. Wrappers only shape a method,
//! path and payload and hand it to the `Gateway`; they hold no state and
//! validate nothing the backend does not.

pub mod auth;
pub mod knowledge;
pub mod query;
pub mod statistics;

pub use auth::{AuthApi, AuthService, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
pub use knowledge::{
    BatchDeleteResult, KnowledgeApi, KnowledgeListParams, KnowledgeSearch, KnowledgeUpdate,
    NewKnowledgeEntry,
};
pub use query::{AskRequest, QueryApi, SearchQuery};
pub use statistics::StatisticsApi;

use crate::Gateway;
use std::sync::Arc;

/// Every resource wrapper over one shared gateway
#[derive(Debug, Clone)]
pub struct Api {
    pub auth: AuthApi,
    pub knowledge: KnowledgeApi,
    pub query: QueryApi,
    pub statistics: StatisticsApi,
}

impl Api {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self {
            auth: AuthApi::new(gateway.clone()),
            knowledge: KnowledgeApi::new(gateway.clone()),
            query: QueryApi::new(gateway.clone()),
            statistics: StatisticsApi::new(gateway),
        }
    }
}
