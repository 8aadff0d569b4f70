//! 命令行报表
//!
//! 依次执行全部报表查询，每个报表渲染为标题加若干文本行。

use serde::Serialize;

use crate::errors::Result;
use crate::models::reports::entities::ReportLines;
use crate::storage::Storage;

/// 报表使用的名称过滤条件
#[derive(Debug, Clone)]
pub struct ReportFilters {
    pub subject: String,
    pub teacher: String,
    pub group: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSection {
    pub title: String,
    pub lines: Vec<String>,
}

impl ReportSection {
    fn new(title: impl Into<String>, data: &impl ReportLines) -> Self {
        Self {
            title: title.into(),
            lines: data.lines(),
        }
    }

    /// 纯文本渲染，没有数据行时输出 "No results found."
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.title);
        out.push('\n');
        if self.lines.is_empty() {
            out.push_str("No results found.\n");
        }
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out.push_str(&"-".repeat(50));
        out
    }
}

/// 执行全部报表查询
pub async fn collect_reports(
    storage: &dyn Storage,
    filters: &ReportFilters,
) -> Result<Vec<ReportSection>> {
    let ReportFilters {
        subject,
        teacher,
        group,
    } = filters;

    Ok(vec![
        ReportSection::new(
            "1. Top 5 Students with Highest Average Grades:",
            &storage.select_top_students().await?,
        ),
        ReportSection::new(
            format!("2. Student with Highest Average Grade in '{subject}':"),
            &storage.select_highest_student_in_subject(subject).await?,
        ),
        ReportSection::new(
            format!("3. Average Grades by Group for '{subject}':"),
            &storage.select_average_grade_by_group(subject).await?,
        ),
        ReportSection::new(
            "4. Overall Average Grade Across All Grades:",
            &storage.select_overall_average_grade().await?,
        ),
        ReportSection::new(
            format!("5. Courses Taught by '{teacher}':"),
            &storage.select_courses_by_teacher(teacher).await?,
        ),
        ReportSection::new(
            format!("6. List of Students in '{group}':"),
            &storage.select_students_in_group(group).await?,
        ),
        ReportSection::new(
            format!("7. Grades of Students in '{group}' for '{subject}':"),
            &storage
                .select_grades_in_group_for_subject(group, subject)
                .await?,
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::{PlannedGrade, PlannedStudent, PlannedSubject, SeedPlan};
    use crate::storage::sea_orm_storage::tests::memory_storage;
    use chrono::NaiveDate;

    fn filters() -> ReportFilters {
        ReportFilters {
            subject: "consider".to_string(),
            teacher: "Prof. Johnson".to_string(),
            group: "Group 2".to_string(),
        }
    }

    #[tokio::test]
    async fn test_collect_reports_on_empty_store() {
        let storage = memory_storage().await;
        let sections = collect_reports(&storage, &filters()).await.unwrap();

        assert_eq!(sections.len(), 7);
        assert!(sections[0].lines.is_empty());
        assert_eq!(sections[1].lines, vec!["No student found"]);
        assert!(sections[2].lines.is_empty());
        assert_eq!(sections[3].lines, vec!["No grades available"]);
        assert_eq!(sections[4].lines, vec!["No courses found"]);
        assert_eq!(sections[5].lines, vec!["No students found"]);
        assert_eq!(sections[6].lines, vec!["No grades found"]);
        assert!(sections[0].render().contains("No results found."));
    }

    #[tokio::test]
    async fn test_collect_reports_with_data() {
        let storage = memory_storage().await;
        storage
            .seed_impl(SeedPlan {
                groups: vec!["Group 1".to_string(), "Group 2".to_string()],
                teachers: vec!["Prof. Johnson".to_string()],
                subjects: vec![PlannedSubject {
                    name: "Consider".to_string(),
                    teacher: Some(0),
                }],
                students: vec![PlannedStudent {
                    name: "Ada Clark".to_string(),
                    group: Some(1),
                }],
                grades: vec![PlannedGrade {
                    student: 0,
                    subject: 0,
                    score: 73,
                    date_received: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
                }],
            })
            .await
            .unwrap();

        let sections = collect_reports(&storage, &filters()).await.unwrap();
        assert_eq!(sections[0].lines, vec!["Ada Clark: 73.00"]);
        assert_eq!(sections[2].lines, vec!["Group 2: 73.00"]);
        assert_eq!(sections[4].lines, vec!["Consider"]);
        assert_eq!(sections[6].lines, vec!["Ada Clark: 73"]);
        assert!(sections[6].render().starts_with("7. Grades of Students in 'Group 2'"));
    }
}
