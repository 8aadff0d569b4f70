use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ReportService, log_missing, report_response};

pub async fn courses_by_teacher(
    service: &ReportService,
    request: &HttpRequest,
    teacher: String,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let result = storage.select_courses_by_teacher(&teacher).await;
    log_missing("Teacher courses", &result);

    report_response(result, "Teacher courses retrieved successfully")
}

pub async fn grades_in_group_for_subject(
    service: &ReportService,
    request: &HttpRequest,
    group: String,
    subject: String,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let result = storage
        .select_grades_in_group_for_subject(&group, &subject)
        .await;
    log_missing("Group grades", &result);

    report_response(result, "Group grades retrieved successfully")
}
