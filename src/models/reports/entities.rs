use serde::{Deserialize, Serialize};

/// 排行榜默认返回的学生数
pub const TOP_STUDENTS_LIMIT: u64 = 5;

// 空结果时返回的提示语
pub const NO_STUDENT_FOUND: &str = "No student found";
pub const NO_GRADES_AVAILABLE: &str = "No grades available";
pub const NO_COURSES_FOUND: &str = "No courses found";
pub const NO_STUDENTS_FOUND: &str = "No students found";
pub const NO_GRADES_FOUND: &str = "No grades found";

/// 学生平均分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentAverage {
    pub name: String,
    pub average: f64,
}

/// 分组平均分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupAverage {
    pub group: String,
    pub average: f64,
}

/// 单条学生成绩
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentScore {
    pub name: String,
    pub score: i32,
}

/// 报表查询结果
///
/// 没有匹配数据不是错误：`Missing` 携带固定的提示语，
/// 调用方通过返回值形状而不是 `Err` 得知结果为空。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Report<T> {
    Found(T),
    Missing(&'static str),
}

impl<T> Report<T> {
    /// 空结果时的提示语
    pub fn sentinel(&self) -> Option<&'static str> {
        match self {
            Report::Found(_) => None,
            Report::Missing(message) => Some(message),
        }
    }
}

impl<T> Report<Vec<T>> {
    /// 行集合为空时折叠为 `Missing`
    pub fn from_rows(rows: Vec<T>, sentinel: &'static str) -> Self {
        if rows.is_empty() {
            Report::Missing(sentinel)
        } else {
            Report::Found(rows)
        }
    }
}

impl Report<StudentAverage> {
    /// 展开为 (姓名, 平均分)；未命中时为 (提示语, None)
    pub fn into_pair(self) -> (String, Option<f64>) {
        match self {
            Report::Found(row) => (row.name, Some(row.average)),
            Report::Missing(message) => (message.to_string(), None),
        }
    }
}

/// 可渲染为文本行的报表数据
pub trait ReportLines {
    fn lines(&self) -> Vec<String>;
}

impl ReportLines for StudentAverage {
    fn lines(&self) -> Vec<String> {
        vec![format!("{}: {:.2}", self.name, self.average)]
    }
}

impl ReportLines for GroupAverage {
    fn lines(&self) -> Vec<String> {
        vec![format!("{}: {:.2}", self.group, self.average)]
    }
}

impl ReportLines for StudentScore {
    fn lines(&self) -> Vec<String> {
        vec![format!("{}: {}", self.name, self.score)]
    }
}

impl ReportLines for String {
    fn lines(&self) -> Vec<String> {
        vec![self.clone()]
    }
}

impl ReportLines for f64 {
    fn lines(&self) -> Vec<String> {
        vec![format!("{self:.2}")]
    }
}

impl<T: ReportLines> ReportLines for Vec<T> {
    fn lines(&self) -> Vec<String> {
        self.iter().flat_map(ReportLines::lines).collect()
    }
}

impl<T: ReportLines> ReportLines for Report<T> {
    /// 未命中时渲染为只含提示语的单元素列表
    fn lines(&self) -> Vec<String> {
        match self {
            Report::Found(value) => value.lines(),
            Report::Missing(message) => vec![message.to_string()],
        }
    }
}

/// 平均分保留两位小数（四舍五入，远离零）
pub fn round_average(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_average() {
        assert_eq!(round_average(85.0), 85.0);
        assert_eq!(round_average(66.666_666), 66.67);
        assert_eq!(round_average(70.125), 70.13);
        assert_eq!(round_average(49.994), 49.99);
    }

    #[test]
    fn test_from_rows_empty_is_missing() {
        let report: Report<Vec<String>> = Report::from_rows(vec![], NO_COURSES_FOUND);
        assert_eq!(report, Report::Missing(NO_COURSES_FOUND));
        assert_eq!(report.lines(), vec!["No courses found".to_string()]);
    }

    #[test]
    fn test_from_rows_non_empty_is_found_without_sentinel() {
        let report = Report::from_rows(vec!["Algebra".to_string()], NO_COURSES_FOUND);
        assert_eq!(report.sentinel(), None);
        assert_eq!(report.lines(), vec!["Algebra".to_string()]);
    }

    #[test]
    fn test_missing_student_pair() {
        let report: Report<StudentAverage> = Report::Missing(NO_STUDENT_FOUND);
        assert_eq!(report.into_pair(), ("No student found".to_string(), None));
    }

    #[test]
    fn test_report_serialization() {
        let report = Report::Found(StudentAverage {
            name: "Ada".to_string(),
            average: 91.5,
        });
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "found");
        assert_eq!(json["data"]["name"], "Ada");

        let missing: Report<f64> = Report::Missing(NO_GRADES_AVAILABLE);
        let json = serde_json::to_value(&missing).unwrap();
        assert_eq!(json["status"], "missing");
        assert_eq!(json["data"], "No grades available");
    }
}
