use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ReportService, log_missing, report_response};

pub async fn top_students(
    service: &ReportService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    report_response(
        storage.select_top_students().await,
        "Top students retrieved successfully",
    )
}

pub async fn best_student_in_subject(
    service: &ReportService,
    request: &HttpRequest,
    subject: String,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let result = storage.select_highest_student_in_subject(&subject).await;
    log_missing("Best student", &result);

    report_response(result, "Best student retrieved successfully")
}

pub async fn students_in_group(
    service: &ReportService,
    request: &HttpRequest,
    group: String,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let result = storage.select_students_in_group(&group).await;
    log_missing("Group students", &result);

    report_response(result, "Group students retrieved successfully")
}
