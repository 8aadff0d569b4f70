pub mod averages;
pub mod listings;
pub mod students;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::errors::{AppError, Result};
use crate::models::reports::entities::Report;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct ReportService {
    storage: Option<Arc<dyn Storage>>,
}

impl ReportService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 平均分前 5 名学生
    pub async fn top_students(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        students::top_students(self, request).await
    }

    // 科目最佳学生
    pub async fn best_student_in_subject(
        &self,
        request: &HttpRequest,
        subject: String,
    ) -> ActixResult<HttpResponse> {
        students::best_student_in_subject(self, request, subject).await
    }

    // 分组学生名单
    pub async fn students_in_group(
        &self,
        request: &HttpRequest,
        group: String,
    ) -> ActixResult<HttpResponse> {
        students::students_in_group(self, request, group).await
    }

    // 科目下各分组平均分
    pub async fn group_averages(
        &self,
        request: &HttpRequest,
        subject: String,
    ) -> ActixResult<HttpResponse> {
        averages::group_averages(self, request, subject).await
    }

    // 全部成绩平均分
    pub async fn overall_average(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        averages::overall_average(self, request).await
    }

    // 教师所授科目
    pub async fn courses_by_teacher(
        &self,
        request: &HttpRequest,
        teacher: String,
    ) -> ActixResult<HttpResponse> {
        listings::courses_by_teacher(self, request, teacher).await
    }

    // 分组学生在科目中的成绩
    pub async fn grades_in_group_for_subject(
        &self,
        request: &HttpRequest,
        group: String,
        subject: String,
    ) -> ActixResult<HttpResponse> {
        listings::grades_in_group_for_subject(self, request, group, subject).await
    }
}

/// 空结果记录到调试日志
pub(crate) fn log_missing<T>(report: &str, result: &Result<Report<T>>) {
    if let Ok(found) = result {
        if let Some(sentinel) = found.sentinel() {
            debug!("{} report is empty: {}", report, sentinel);
        }
    }
}

/// 查询结果转换为 HTTP 响应
///
/// 空结果（提示语）照常以 200 返回，只有错误才映射为非 2xx 状态码。
pub(crate) fn report_response<T: Serialize>(
    result: Result<T>,
    message: &str,
) -> ActixResult<HttpResponse> {
    match result {
        Ok(data) => Ok(HttpResponse::Ok().json(ApiResponse::success(data, message))),
        Err(e) => Ok(error_response(&e)),
    }
}

fn error_response(error: &AppError) -> HttpResponse {
    match error {
        AppError::InvalidArgument(msg) => HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::InvalidArgument, msg)),
        AppError::DatabaseConnection(msg) => {
            warn!("Report query failed, store unreachable: {}", msg);
            HttpResponse::ServiceUnavailable().json(ApiResponse::error_empty(
                ErrorCode::DatabaseUnavailable,
                format!("Database unavailable: {msg}"),
            ))
        }
        AppError::QueryTimeout(msg) => HttpResponse::GatewayTimeout()
            .json(ApiResponse::error_empty(ErrorCode::QueryTimeout, msg)),
        other => HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::InternalServerError,
            format!("Report query failed: {other}"),
        )),
    }
}
