use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::services::ReportService;

// 懒加载的全局 REPORT_SERVICE 实例
static REPORT_SERVICE: Lazy<ReportService> = Lazy::new(ReportService::new_lazy);

// HTTP处理程序
pub async fn top_students(req: HttpRequest) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.top_students(&req).await
}

pub async fn best_student_in_subject(
    req: HttpRequest,
    subject: web::Path<String>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE
        .best_student_in_subject(&req, subject.into_inner())
        .await
}

pub async fn group_averages(
    req: HttpRequest,
    subject: web::Path<String>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE
        .group_averages(&req, subject.into_inner())
        .await
}

pub async fn overall_average(req: HttpRequest) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.overall_average(&req).await
}

pub async fn courses_by_teacher(
    req: HttpRequest,
    teacher: web::Path<String>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE
        .courses_by_teacher(&req, teacher.into_inner())
        .await
}

pub async fn students_in_group(
    req: HttpRequest,
    group: web::Path<String>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE
        .students_in_group(&req, group.into_inner())
        .await
}

pub async fn grades_in_group_for_subject(
    req: HttpRequest,
    path: web::Path<(String, String)>,
) -> ActixResult<HttpResponse> {
    let (group, subject) = path.into_inner();
    REPORT_SERVICE
        .grades_in_group_for_subject(&req, group, subject)
        .await
}

// 配置路由
pub fn configure_report_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/reports")
            .route("/top-students", web::get().to(top_students))
            .route("/grades/average", web::get().to(overall_average))
            .service(
                web::scope("/subjects/{subject}")
                    .route("/best-student", web::get().to(best_student_in_subject))
                    .route("/group-averages", web::get().to(group_averages)),
            )
            .route(
                "/teachers/{teacher}/subjects",
                web::get().to(courses_by_teacher),
            )
            .route("/groups/{group}/students", web::get().to(students_in_group))
            .route(
                "/groups/{group}/subjects/{subject}/grades",
                web::get().to(grades_in_group_for_subject),
            ),
    );
}
