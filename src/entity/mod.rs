//! SeaORM 数据库实体
//!
//! 五张表：分组、学生、教师、科目、成绩。
//! 关系在两个方向上均可导航（`has_many` / `belongs_to`），
//! 报表查询沿这些关系构建 JOIN。

pub mod prelude;

pub mod grades;
pub mod groups;
pub mod students;
pub mod subjects;
pub mod teachers;
