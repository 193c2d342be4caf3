pub mod facilitator;
pub mod student;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::storage::Storage;

/// 仪表盘列表条数上限
pub(crate) const DASHBOARD_LIST_LIMIT: usize = 10;

pub struct DashboardService {
    storage: Option<Arc<dyn Storage>>,
}

impl DashboardService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn student_dashboard(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        student::student_dashboard(self, request).await
    }

    pub async fn facilitator_dashboard(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        facilitator::facilitator_dashboard(self, request).await
    }
}
