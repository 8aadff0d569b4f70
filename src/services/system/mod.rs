use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use serde::Serialize;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub system_name: String,
    pub environment: String,
    pub database: &'static str,
}

pub struct SystemService;

impl SystemService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    /// 健康检查：确认数据库可达
    pub async fn health(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let config = self.get_config();
        let storage = request
            .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
            .expect("Storage not found in app data")
            .get_ref()
            .clone();

        match storage.ping().await {
            Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                HealthResponse {
                    system_name: config.app.system_name.clone(),
                    environment: config.app.environment.clone(),
                    database: "up",
                },
                "Service is healthy",
            ))),
            Err(e) => Ok(
                HttpResponse::ServiceUnavailable().json(ApiResponse::error_empty(
                    ErrorCode::DatabaseUnavailable,
                    format!("Database unreachable: {e}"),
                )),
            ),
        }
    }
}
