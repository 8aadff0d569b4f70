use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ReportService, log_missing, report_response};

pub async fn group_averages(
    service: &ReportService,
    request: &HttpRequest,
    subject: String,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    report_response(
        storage.select_average_grade_by_group(&subject).await,
        "Group averages retrieved successfully",
    )
}

pub async fn overall_average(
    service: &ReportService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let result = storage.select_overall_average_grade().await;
    log_missing("Overall average", &result);

    report_response(result, "Overall average retrieved successfully")
}
