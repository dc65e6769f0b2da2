use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 作业状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Draft,
    Active,
    Closed,
}

/// 布置给学生的作业，引用一个题集
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: String,
    pub problem_set_id: String,
    pub teacher_id: String,
    pub title: String,
    pub status: AssignmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

impl Assignment {
    pub fn new(
        id: impl Into<String>,
        problem_set_id: impl Into<String>,
        teacher_id: impl Into<String>,
        title: impl Into<String>,
        status: AssignmentStatus,
    ) -> Self {
        Self {
            id: id.into(),
            problem_set_id: problem_set_id.into(),
            teacher_id: teacher_id.into(),
            title: title.into(),
            status,
            due_date: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == AssignmentStatus::Active
    }
}
