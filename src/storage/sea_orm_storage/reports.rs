//! 报表查询
//!
//! 七个只读聚合查询。名称过滤统一比较 `name_key` 列与参数的小写形式，
//! 平均分由数据库计算后转换为双精度，再统一保留两位小数。

use super::SeaOrmStorage;
use crate::entity::{grades, groups, students, subjects, teachers};
use crate::errors::{AppError, Result};
use crate::models::reports::entities::{
    GroupAverage, NO_COURSES_FOUND, NO_GRADES_AVAILABLE, NO_GRADES_FOUND, NO_STUDENT_FOUND,
    NO_STUDENTS_FOUND, Report, StudentAverage, StudentScore, round_average,
};
use crate::utils::{name_key, validate_filter_name};
use sea_orm::sea_query::{Alias, Expr, ExprTrait, Func, IntoColumnRef, SimpleExpr};
use sea_orm::{
    ConnectionTrait, DbBackend, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait,
};
use tracing::debug;

/// 成绩到科目的连接路径别名，与直接连接的 subjects 表区分
const GRADE_SUBJECT: &str = "grade_subject";

/// 各数据库的双精度类型名
fn double_type(backend: DbBackend) -> &'static str {
    match backend {
        DbBackend::Postgres => "double precision",
        DbBackend::MySql => "DOUBLE",
        _ => "REAL",
    }
}

/// AVG(grades.score)，转换为双精度
fn average_score(backend: DbBackend) -> SimpleExpr {
    Func::cast_as(
        Func::avg(Expr::col((grades::Entity, grades::Column::Score))),
        Alias::new(double_type(backend)),
    )
    .into()
}

/// name_key 列 = 名称的小写形式
///
/// 数据库的 `LOWER` 在 SQLite 上只处理 ASCII，归一化统一在 Rust 中完成。
fn name_matches<C>(key_column: C, name: &str) -> SimpleExpr
where
    C: IntoColumnRef,
{
    Expr::col(key_column).eq(name_key(name))
}

/// 校验过滤名称
fn check_name(field: &str, name: &str) -> Result<()> {
    validate_filter_name(name).map_err(|msg| AppError::invalid_argument(format!("{field}: {msg}")))
}

fn to_student_averages(rows: Vec<(String, f64)>) -> Vec<StudentAverage> {
    rows.into_iter()
        .map(|(name, average)| StudentAverage {
            name,
            average: round_average(average),
        })
        .collect()
}

impl SeaOrmStorage {
    /// 平均分最高的前 N 名学生，没有成绩的学生不参与排名
    pub async fn select_top_students_impl(&self, limit: u64) -> Result<Vec<StudentAverage>> {
        let average = average_score(self.db.get_database_backend());

        let query = students::Entity::find()
            .select_only()
            .column(students::Column::Name)
            .column_as(average.clone(), "average")
            .join(JoinType::InnerJoin, students::Relation::Grades.def())
            .group_by(students::Column::Id)
            .group_by(students::Column::Name)
            // 平均分相同时按学生 ID 排序，保证结果稳定
            .order_by_desc(average)
            .order_by_asc(students::Column::Id)
            .limit(limit)
            .into_tuple::<(String, f64)>();

        let rows = self
            .bounded("查询学生排行失败", query.all(&self.db))
            .await?;
        debug!("学生排行查询返回 {} 行", rows.len());

        Ok(to_student_averages(rows))
    }

    /// 指定科目中平均分最高的学生
    pub async fn select_highest_student_in_subject_impl(
        &self,
        subject_name: &str,
    ) -> Result<Report<StudentAverage>> {
        check_name("subject", subject_name)?;
        let average = average_score(self.db.get_database_backend());

        let query = students::Entity::find()
            .select_only()
            .column(students::Column::Name)
            .column_as(average.clone(), "average")
            .join(JoinType::InnerJoin, students::Relation::Grades.def())
            .join(JoinType::InnerJoin, grades::Relation::Subject.def())
            .filter(name_matches(
                (subjects::Entity, subjects::Column::NameKey),
                subject_name,
            ))
            .group_by(students::Column::Id)
            .group_by(students::Column::Name)
            .order_by_desc(average)
            .order_by_asc(students::Column::Id)
            .into_tuple::<(String, f64)>();

        let row = self
            .bounded("查询科目最佳学生失败", query.one(&self.db))
            .await?;

        Ok(match row {
            Some((name, average)) => Report::Found(StudentAverage {
                name,
                average: round_average(average),
            }),
            None => Report::Missing(NO_STUDENT_FOUND),
        })
    }

    /// 指定科目下各分组的平均分，只包含有成绩的分组
    pub async fn select_average_grade_by_group_impl(
        &self,
        subject_name: &str,
    ) -> Result<Vec<GroupAverage>> {
        check_name("subject", subject_name)?;
        let average = average_score(self.db.get_database_backend());

        // 分组 -> 学生 -> 成绩 -> 科目（命名连接路径）
        let query = groups::Entity::find()
            .select_only()
            .column(groups::Column::Name)
            .column_as(average, "average")
            .join(JoinType::InnerJoin, groups::Relation::Students.def())
            .join(JoinType::InnerJoin, students::Relation::Grades.def())
            .join_as(
                JoinType::InnerJoin,
                grades::Relation::Subject.def(),
                Alias::new(GRADE_SUBJECT),
            )
            .filter(name_matches(
                (Alias::new(GRADE_SUBJECT), subjects::Column::NameKey),
                subject_name,
            ))
            .group_by(groups::Column::Id)
            .group_by(groups::Column::Name)
            .order_by_asc(groups::Column::Name)
            .into_tuple::<(String, f64)>();

        let rows = self
            .bounded("查询分组平均分失败", query.all(&self.db))
            .await?;

        Ok(rows
            .into_iter()
            .map(|(group, average)| GroupAverage {
                group,
                average: round_average(average),
            })
            .collect())
    }

    /// 全部成绩的平均分
    pub async fn select_overall_average_grade_impl(&self) -> Result<Report<f64>> {
        let average = average_score(self.db.get_database_backend());

        let query = grades::Entity::find()
            .select_only()
            .column_as(average, "average")
            .into_tuple::<Option<f64>>();

        // 没有成绩时 AVG 为 NULL
        let average = self
            .bounded("查询总平均分失败", query.one(&self.db))
            .await?
            .flatten();

        Ok(match average {
            Some(value) => Report::Found(round_average(value)),
            None => Report::Missing(NO_GRADES_AVAILABLE),
        })
    }

    /// 指定教师所授科目
    pub async fn select_courses_by_teacher_impl(
        &self,
        teacher_name: &str,
    ) -> Result<Report<Vec<String>>> {
        check_name("teacher", teacher_name)?;

        let query = subjects::Entity::find()
            .select_only()
            .column(subjects::Column::Name)
            .join(JoinType::InnerJoin, subjects::Relation::Teacher.def())
            .filter(name_matches(
                (teachers::Entity, teachers::Column::NameKey),
                teacher_name,
            ))
            .order_by_asc(subjects::Column::Id)
            .into_tuple::<String>();

        let rows = self
            .bounded("查询教师科目失败", query.all(&self.db))
            .await?;

        Ok(Report::from_rows(rows, NO_COURSES_FOUND))
    }

    /// 指定分组的学生
    pub async fn select_students_in_group_impl(
        &self,
        group_name: &str,
    ) -> Result<Report<Vec<String>>> {
        check_name("group", group_name)?;

        let query = students::Entity::find()
            .select_only()
            .column(students::Column::Name)
            .join(JoinType::InnerJoin, students::Relation::Group.def())
            .filter(name_matches(
                (groups::Entity, groups::Column::NameKey),
                group_name,
            ))
            .order_by_asc(students::Column::Id)
            .into_tuple::<String>();

        let rows = self
            .bounded("查询分组学生失败", query.all(&self.db))
            .await?;

        Ok(Report::from_rows(rows, NO_STUDENTS_FOUND))
    }

    /// 指定分组学生在指定科目中的成绩
    pub async fn select_grades_in_group_for_subject_impl(
        &self,
        group_name: &str,
        subject_name: &str,
    ) -> Result<Report<Vec<StudentScore>>> {
        check_name("group", group_name)?;
        check_name("subject", subject_name)?;

        let query = grades::Entity::find()
            .select_only()
            .column(students::Column::Name)
            .column(grades::Column::Score)
            .join(JoinType::InnerJoin, grades::Relation::Student.def())
            .join(JoinType::InnerJoin, students::Relation::Group.def())
            .join(JoinType::InnerJoin, grades::Relation::Subject.def())
            .filter(name_matches(
                (groups::Entity, groups::Column::NameKey),
                group_name,
            ))
            .filter(name_matches(
                (subjects::Entity, subjects::Column::NameKey),
                subject_name,
            ))
            .order_by_asc(students::Column::Name)
            .order_by_asc(grades::Column::Id)
            .into_tuple::<(String, i32)>();

        let rows = self
            .bounded("查询分组科目成绩失败", query.all(&self.db))
            .await?;

        let scores = rows
            .into_iter()
            .map(|(name, score)| StudentScore { name, score })
            .collect();

        Ok(Report::from_rows(scores, NO_GRADES_FOUND))
    }
}
