pub mod cohort;
pub mod compute;
pub mod overview;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::storage::Storage;

pub struct AnalyticsService {
    storage: Option<Arc<dyn Storage>>,
}

impl AnalyticsService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    /// 班期学习分析
    pub async fn cohort_analytics(
        &self,
        cohort_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        cohort::cohort_analytics(self, cohort_id, request).await
    }

    /// 平台概览
    pub async fn platform_overview(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        overview::platform_overview(self, request).await
    }
}
