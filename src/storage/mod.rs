use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::errors::Result;
use crate::models::{
    reports::entities::{GroupAverage, Report, StudentAverage, StudentScore, TOP_STUDENTS_LIMIT},
    seed::entities::SeedSummary,
};
use crate::seed::SeedPlan;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 报表查询方法
    // 平均分最高的前 5 名学生
    async fn select_top_students(&self) -> Result<Vec<StudentAverage>> {
        self.select_top_students_limited(TOP_STUDENTS_LIMIT).await
    }
    // 平均分最高的前 N 名学生
    async fn select_top_students_limited(&self, limit: u64) -> Result<Vec<StudentAverage>>;
    // 指定科目中平均分最高的学生
    async fn select_highest_student_in_subject(
        &self,
        subject_name: &str,
    ) -> Result<Report<StudentAverage>>;
    // 指定科目下各分组的平均分
    async fn select_average_grade_by_group(
        &self,
        subject_name: &str,
    ) -> Result<Vec<GroupAverage>>;
    // 全部成绩的平均分
    async fn select_overall_average_grade(&self) -> Result<Report<f64>>;
    // 指定教师所授科目
    async fn select_courses_by_teacher(&self, teacher_name: &str) -> Result<Report<Vec<String>>>;
    // 指定分组的学生
    async fn select_students_in_group(&self, group_name: &str) -> Result<Report<Vec<String>>>;
    // 指定分组学生在指定科目中的成绩
    async fn select_grades_in_group_for_subject(
        &self,
        group_name: &str,
        subject_name: &str,
    ) -> Result<Report<Vec<StudentScore>>>;

    /// 数据填充方法
    // 清空全部数据
    async fn clear_all(&self) -> Result<()>;
    // 清空后按计划写入数据
    async fn seed(&self, plan: SeedPlan) -> Result<SeedSummary>;

    /// 健康检查
    async fn ping(&self) -> Result<()>;
}

/// 连接数据库并返回存储实例，按配置执行迁移
pub async fn create_storage(config: &DatabaseConfig) -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::connect(config).await?;
    if config.run_migrations {
        storage.migrate().await?;
    }
    Ok(Arc::new(storage))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::errors::AppError;

    /// 所有调用都返回连接错误的存储
    pub(crate) struct UnreachableStorage;

    fn down<T>() -> Result<T> {
        Err(AppError::database_connection("connection refused"))
    }

    #[async_trait::async_trait]
    impl Storage for UnreachableStorage {
        async fn select_top_students_limited(&self, _limit: u64) -> Result<Vec<StudentAverage>> {
            down()
        }

        async fn select_highest_student_in_subject(
            &self,
            _subject_name: &str,
        ) -> Result<Report<StudentAverage>> {
            down()
        }

        async fn select_average_grade_by_group(
            &self,
            _subject_name: &str,
        ) -> Result<Vec<GroupAverage>> {
            down()
        }

        async fn select_overall_average_grade(&self) -> Result<Report<f64>> {
            down()
        }

        async fn select_courses_by_teacher(
            &self,
            _teacher_name: &str,
        ) -> Result<Report<Vec<String>>> {
            down()
        }

        async fn select_students_in_group(
            &self,
            _group_name: &str,
        ) -> Result<Report<Vec<String>>> {
            down()
        }

        async fn select_grades_in_group_for_subject(
            &self,
            _group_name: &str,
            _subject_name: &str,
        ) -> Result<Report<Vec<StudentScore>>> {
            down()
        }

        async fn clear_all(&self) -> Result<()> {
            down()
        }

        async fn seed(&self, _plan: SeedPlan) -> Result<SeedSummary> {
            down()
        }

        async fn ping(&self) -> Result<()> {
            down()
        }
    }
}
