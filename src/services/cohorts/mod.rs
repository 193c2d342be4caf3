pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod members;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::cohorts::requests::{
    AddMemberRequest, CohortListParams, CreateCohortRequest, UpdateCohortRequest,
};
use crate::storage::Storage;

pub struct CohortService {
    storage: Option<Arc<dyn Storage>>,
}

impl CohortService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 班期列表，非管理员只看到自己所在的班期
    pub async fn list_cohorts(
        &self,
        query: CohortListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_cohorts(self, query, request).await
    }

    pub async fn create_cohort(
        &self,
        cohort_data: CreateCohortRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_cohort(self, cohort_data, request).await
    }

    pub async fn get_cohort(
        &self,
        cohort_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_cohort(self, cohort_id, request).await
    }

    pub async fn update_cohort(
        &self,
        cohort_id: i64,
        update_data: UpdateCohortRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_cohort(self, cohort_id, update_data, request).await
    }

    pub async fn delete_cohort(
        &self,
        cohort_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_cohort(self, cohort_id, request).await
    }

    pub async fn list_members(
        &self,
        cohort_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        members::list_members(self, cohort_id, request).await
    }

    pub async fn add_member(
        &self,
        cohort_id: i64,
        member_data: AddMemberRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        members::add_member(self, cohort_id, member_data, request).await
    }

    pub async fn remove_member(
        &self,
        cohort_id: i64,
        user_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        members::remove_member(self, cohort_id, user_id, request).await
    }
}

/// 开始日期不晚于结束日期
pub(crate) fn validate_date_range(
    start: Option<chrono::DateTime<chrono::Utc>>,
    end: Option<chrono::DateTime<chrono::Utc>>,
) -> Result<(), &'static str> {
    match (start, end) {
        (Some(start), Some(end)) if start > end => {
            Err("Cohort start date must not be later than its end date")
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_validate_date_range() {
        let early = chrono::Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let late = chrono::Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        assert!(validate_date_range(Some(early), Some(late)).is_ok());
        assert!(validate_date_range(Some(early), Some(early)).is_ok());
        assert!(validate_date_range(Some(late), Some(early)).is_err());
        assert!(validate_date_range(None, Some(early)).is_ok());
    }
}
