//! 数据填充存储操作

use super::{SeaOrmStorage, map_db_err};
use crate::entity::prelude::*;
use crate::errors::Result;
use crate::models::seed::entities::SeedSummary;
use crate::seed::SeedPlan;
use crate::utils::name_key;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseTransaction, EntityTrait, Set, TransactionTrait,
};
use tracing::info;

/// 批量插入成绩时每批的行数
const GRADE_BATCH_SIZE: usize = 500;

/// 按依赖顺序清空全部表
async fn clear_tables<C: ConnectionTrait>(conn: &C) -> Result<()> {
    Grades::delete_many()
        .exec(conn)
        .await
        .map_err(|e| map_db_err("清空成绩失败", e))?;
    Students::delete_many()
        .exec(conn)
        .await
        .map_err(|e| map_db_err("清空学生失败", e))?;
    Subjects::delete_many()
        .exec(conn)
        .await
        .map_err(|e| map_db_err("清空科目失败", e))?;
    Teachers::delete_many()
        .exec(conn)
        .await
        .map_err(|e| map_db_err("清空教师失败", e))?;
    Groups::delete_many()
        .exec(conn)
        .await
        .map_err(|e| map_db_err("清空分组失败", e))?;
    Ok(())
}

impl SeaOrmStorage {
    /// 清空全部数据
    pub async fn clear_all_impl(&self) -> Result<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| map_db_err("开启事务失败", e))?;
        clear_tables(&txn).await?;
        txn.commit()
            .await
            .map_err(|e| map_db_err("提交事务失败", e))?;
        info!("已清空全部数据");
        Ok(())
    }

    /// 清空后按计划写入数据，整体在一个事务中完成
    pub async fn seed_impl(&self, plan: SeedPlan) -> Result<SeedSummary> {
        plan.validate()?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| map_db_err("开启事务失败", e))?;

        // 任一步骤失败时 txn 被丢弃并回滚
        clear_tables(&txn).await?;
        let summary = insert_plan(&txn, plan).await?;

        txn.commit()
            .await
            .map_err(|e| map_db_err("提交事务失败", e))?;

        info!(
            "数据填充完成: {} 个分组, {} 位教师, {} 门科目, {} 名学生, {} 条成绩",
            summary.groups, summary.teachers, summary.subjects, summary.students, summary.grades
        );
        Ok(summary)
    }
}

async fn insert_plan(txn: &DatabaseTransaction, plan: SeedPlan) -> Result<SeedSummary> {
    let mut group_ids = Vec::with_capacity(plan.groups.len());
    for name in plan.groups {
        let group = GroupActiveModel {
            name_key: Set(name_key(&name)),
            name: Set(name),
            ..Default::default()
        }
        .insert(txn)
        .await
        .map_err(|e| map_db_err("创建分组失败", e))?;
        group_ids.push(group.id);
    }
    info!("已创建 {} 个分组", group_ids.len());

    let mut teacher_ids = Vec::with_capacity(plan.teachers.len());
    for name in plan.teachers {
        let teacher = TeacherActiveModel {
            name_key: Set(name_key(&name)),
            name: Set(name),
            ..Default::default()
        }
        .insert(txn)
        .await
        .map_err(|e| map_db_err("创建教师失败", e))?;
        teacher_ids.push(teacher.id);
    }
    info!("已创建 {} 位教师", teacher_ids.len());

    let mut subject_ids = Vec::with_capacity(plan.subjects.len());
    for subject in plan.subjects {
        let model = SubjectActiveModel {
            name_key: Set(name_key(&subject.name)),
            name: Set(subject.name),
            teacher_id: Set(subject.teacher.map(|i| teacher_ids[i])),
            ..Default::default()
        }
        .insert(txn)
        .await
        .map_err(|e| map_db_err("创建科目失败", e))?;
        subject_ids.push(model.id);
    }
    info!("已创建 {} 门科目", subject_ids.len());

    let mut student_ids = Vec::with_capacity(plan.students.len());
    for student in plan.students {
        let model = StudentActiveModel {
            name: Set(student.name),
            group_id: Set(student.group.map(|i| group_ids[i])),
            ..Default::default()
        }
        .insert(txn)
        .await
        .map_err(|e| map_db_err("创建学生失败", e))?;
        student_ids.push(model.id);
    }
    info!("已创建 {} 名学生", student_ids.len());

    let grades: Vec<GradeActiveModel> = plan
        .grades
        .into_iter()
        .map(|grade| GradeActiveModel {
            student_id: Set(student_ids[grade.student]),
            subject_id: Set(subject_ids[grade.subject]),
            score: Set(grade.score),
            date_received: Set(grade.date_received),
            ..Default::default()
        })
        .collect();
    let grade_count = grades.len();

    for batch in grades.chunks(GRADE_BATCH_SIZE) {
        Grades::insert_many(batch.to_vec())
            .exec(txn)
            .await
            .map_err(|e| map_db_err("批量创建成绩失败", e))?;
    }
    info!("已创建 {} 条成绩", grade_count);

    Ok(SeedSummary {
        groups: group_ids.len(),
        teachers: teacher_ids.len(),
        subjects: subject_ids.len(),
        students: student_ids.len(),
        grades: grade_count,
    })
}

#[cfg(test)]
mod tests {
    use super::super::tests::memory_storage;
    use super::*;
    use crate::config::SeedConfig;
    use crate::models::reports::entities::{Report, round_average};
    use crate::seed::{PlannedGrade, PlannedStudent, PlannedSubject};
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use sea_orm::PaginatorTrait;

    #[tokio::test]
    async fn test_seed_generated_plan_and_average_round_trip() {
        let storage = memory_storage().await;
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let plan =
            SeedPlan::generate(&SeedConfig::default(), &mut StdRng::seed_from_u64(3), today)
                .unwrap();
        let scores: Vec<i32> = plan.grades.iter().map(|g| g.score).collect();

        let summary = storage.seed_impl(plan).await.unwrap();
        assert_eq!(summary.groups, 3);
        assert_eq!(summary.teachers, 5);
        assert_eq!(summary.subjects, 8);
        assert_eq!(summary.students, 50);
        assert_eq!(summary.grades, scores.len());
        assert_eq!(
            Grades::find().count(&storage.db).await.unwrap() as usize,
            scores.len()
        );

        // 总平均分与独立计算的结果一致
        let expected = round_average(
            scores.iter().map(|&s| s as f64).sum::<f64>() / scores.len() as f64,
        );
        let report = storage.select_overall_average_grade_impl().await.unwrap();
        assert_eq!(report, Report::Found(expected));
    }

    #[tokio::test]
    async fn test_reseed_replaces_existing_rows() {
        let storage = memory_storage().await;
        let plan = SeedPlan {
            groups: vec!["Group 1".to_string()],
            teachers: vec!["Prof. Johnson".to_string()],
            subjects: vec![PlannedSubject {
                name: "Police".to_string(),
                teacher: Some(0),
            }],
            students: vec![PlannedStudent {
                name: "Ada".to_string(),
                group: Some(0),
            }],
            grades: vec![PlannedGrade {
                student: 0,
                subject: 0,
                score: 88,
                date_received: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            }],
        };

        storage.seed_impl(plan.clone()).await.unwrap();
        storage.seed_impl(plan).await.unwrap();

        assert_eq!(Groups::find().count(&storage.db).await.unwrap(), 1);
        assert_eq!(Students::find().count(&storage.db).await.unwrap(), 1);
        assert_eq!(Grades::find().count(&storage.db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_clear_all() {
        let storage = memory_storage().await;
        let plan = SeedPlan {
            groups: vec!["Group 1".to_string()],
            students: vec![PlannedStudent {
                name: "Ada".to_string(),
                group: Some(0),
            }],
            ..SeedPlan::default()
        };
        storage.seed_impl(plan).await.unwrap();

        storage.clear_all_impl().await.unwrap();
        assert_eq!(Groups::find().count(&storage.db).await.unwrap(), 0);
        assert_eq!(Students::find().count(&storage.db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_invalid_plan_leaves_store_untouched() {
        let storage = memory_storage().await;
        let valid = SeedPlan {
            groups: vec!["Group 1".to_string()],
            ..SeedPlan::default()
        };
        storage.seed_impl(valid).await.unwrap();

        let invalid = SeedPlan {
            students: vec![PlannedStudent {
                name: "Ghost".to_string(),
                group: Some(9),
            }],
            ..SeedPlan::default()
        };
        let err = storage.seed_impl(invalid).await.unwrap_err();
        assert_eq!(err.code(), "E006");
        assert_eq!(Groups::find().count(&storage.db).await.unwrap(), 1);
    }
}
