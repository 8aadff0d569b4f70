use serde::{Deserialize, Serialize};

/// 数据填充结果统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedSummary {
    pub groups: usize,
    pub teachers: usize,
    pub subjects: usize,
    pub students: usize,
    pub grades: usize,
}
