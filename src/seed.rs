//! 数据填充计划
//!
//! 先在内存中生成完整的填充计划（名称、分组归属、成绩），
//! 再由存储层在一个事务中清空并写入。计划内的引用均为下标。

use chrono::{Duration, NaiveDate};
use rand::Rng;

use crate::config::SeedConfig;
use crate::errors::{AppError, Result};

const TITLES: &[&str] = &["Mr.", "Ms.", "Mrs.", "Dr.", "Prof."];

const FIRST_NAMES: &[&str] = &[
    "Joseph", "Maria", "David", "Linda", "James", "Susan", "Robert", "Karen", "Michael", "Nancy",
    "William", "Lisa", "Thomas", "Betty", "Daniel", "Sandra", "Matthew", "Ashley", "Anthony",
    "Emily", "Mark", "Donna", "Steven", "Michelle",
];

const LAST_NAMES: &[&str] = &[
    "Meyer", "Johnson", "Smith", "Brown", "Davis", "Miller", "Wilson", "Moore", "Taylor",
    "Anderson", "Thomas", "Jackson", "White", "Harris", "Martin", "Thompson", "Garcia", "Clark",
    "Lewis", "Walker", "Young", "Allen",
];

const SUBJECT_WORDS: &[&str] = &[
    "Algebra",
    "Geometry",
    "Physics",
    "Chemistry",
    "Biology",
    "History",
    "Literature",
    "Geography",
    "Economics",
    "Philosophy",
    "Music",
    "Drawing",
    "Astronomy",
    "Statistics",
];

/// 成绩分数范围
pub const MIN_SCORE: i32 = 1;
pub const MAX_SCORE: i32 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedSubject {
    pub name: String,
    /// `teachers` 中的下标
    pub teacher: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedStudent {
    pub name: String,
    /// `groups` 中的下标
    pub group: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedGrade {
    pub student: usize,
    pub subject: usize,
    pub score: i32,
    pub date_received: NaiveDate,
}

/// 一次完整的数据填充
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedPlan {
    pub groups: Vec<String>,
    pub teachers: Vec<String>,
    pub subjects: Vec<PlannedSubject>,
    pub students: Vec<PlannedStudent>,
    pub grades: Vec<PlannedGrade>,
}

impl SeedPlan {
    /// 按配置随机生成填充计划
    ///
    /// 每个科目随机分配一位教师，每个学生随机分配一个分组，
    /// 每个学生获得 1..=max_grades_per_student 条成绩，日期落在最近 history_days 天内。
    pub fn generate<R: Rng>(config: &SeedConfig, rng: &mut R, today: NaiveDate) -> Result<Self> {
        if config.subjects > 0 && config.teachers == 0 {
            return Err(AppError::seeding("subjects need at least one teacher"));
        }
        if config.students > 0 && config.groups == 0 {
            return Err(AppError::seeding("students need at least one group"));
        }
        if config.students > 0 && (config.subjects == 0 || config.max_grades_per_student == 0) {
            return Err(AppError::seeding(
                "students need at least one subject and one grade each",
            ));
        }
        if config.history_days < 0 {
            return Err(AppError::seeding("history_days must not be negative"));
        }

        let groups = (1..=config.groups).map(|i| format!("Group {i}")).collect();

        let teachers = (0..config.teachers)
            .map(|_| {
                format!(
                    "{} {} {}",
                    pick(rng, TITLES),
                    pick(rng, FIRST_NAMES),
                    pick(rng, LAST_NAMES)
                )
            })
            .collect();

        let subjects = (0..config.subjects)
            .map(|_| PlannedSubject {
                name: pick(rng, SUBJECT_WORDS).to_string(),
                teacher: Some(rng.random_range(0..config.teachers)),
            })
            .collect();

        let students: Vec<PlannedStudent> = (0..config.students)
            .map(|_| PlannedStudent {
                name: format!("{} {}", pick(rng, FIRST_NAMES), pick(rng, LAST_NAMES)),
                group: Some(rng.random_range(0..config.groups)),
            })
            .collect();

        let mut grades = Vec::new();
        for student in 0..students.len() {
            for _ in 0..rng.random_range(1..=config.max_grades_per_student) {
                let days_ago = rng.random_range(0..=config.history_days);
                grades.push(PlannedGrade {
                    student,
                    subject: rng.random_range(0..config.subjects),
                    score: rng.random_range(MIN_SCORE..=MAX_SCORE),
                    date_received: today - Duration::days(days_ago),
                });
            }
        }

        Ok(Self {
            groups,
            teachers,
            subjects,
            students,
            grades,
        })
    }

    /// 校验计划内的下标引用
    pub fn validate(&self) -> Result<()> {
        for subject in &self.subjects {
            if subject.teacher.is_some_and(|t| t >= self.teachers.len()) {
                return Err(AppError::seeding(format!(
                    "subject {} references a missing teacher",
                    subject.name
                )));
            }
        }
        for student in &self.students {
            if student.group.is_some_and(|g| g >= self.groups.len()) {
                return Err(AppError::seeding(format!(
                    "student {} references a missing group",
                    student.name
                )));
            }
        }
        for grade in &self.grades {
            if grade.student >= self.students.len() || grade.subject >= self.subjects.len() {
                return Err(AppError::seeding(
                    "grade references a missing student or subject",
                ));
            }
        }
        Ok(())
    }
}

fn pick<'a, R: Rng>(rng: &mut R, words: &[&'a str]) -> &'a str {
    words[rng.random_range(0..words.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    #[test]
    fn test_generate_default_plan() {
        let config = SeedConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        let plan = SeedPlan::generate(&config, &mut rng, today()).unwrap();

        assert_eq!(plan.groups, vec!["Group 1", "Group 2", "Group 3"]);
        assert_eq!(plan.teachers.len(), 5);
        assert_eq!(plan.subjects.len(), 8);
        assert_eq!(plan.students.len(), 50);
        assert!(plan.validate().is_ok());

        for student in 0..plan.students.len() {
            let count = plan.grades.iter().filter(|g| g.student == student).count();
            assert!((1..=20).contains(&count));
        }
        let earliest = today() - Duration::days(730);
        assert!(plan.grades.iter().all(|g| {
            (MIN_SCORE..=MAX_SCORE).contains(&g.score)
                && g.date_received <= today()
                && g.date_received >= earliest
        }));
    }

    #[test]
    fn test_generate_is_reproducible_with_seeded_rng() {
        let config = SeedConfig::default();
        let first = SeedPlan::generate(&config, &mut StdRng::seed_from_u64(42), today()).unwrap();
        let second = SeedPlan::generate(&config, &mut StdRng::seed_from_u64(42), today()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_generate_rejects_students_without_groups() {
        let config = SeedConfig {
            groups: 0,
            ..SeedConfig::default()
        };
        let err = SeedPlan::generate(&config, &mut StdRng::seed_from_u64(1), today()).unwrap_err();
        assert_eq!(err.code(), "E006");
    }

    #[test]
    fn test_validate_rejects_dangling_reference() {
        let plan = SeedPlan {
            students: vec![PlannedStudent {
                name: "Ada".to_string(),
                group: Some(3),
            }],
            ..SeedPlan::default()
        };
        assert!(plan.validate().is_err());
    }
}
