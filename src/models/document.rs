use crate::models::problem::{Problem, ProblemContent};
use crate::models::problem_set::ItemSettings;
use serde::{Deserialize, Serialize};

/// 题集导入文件（TOML）中的一道题
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentProblem {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<ItemSettings>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub content: ProblemContent,
}

impl DocumentProblem {
    pub fn to_problem(&self, teacher_id: &str) -> Problem {
        let mut problem = Problem::new(&self.id, teacher_id, &self.title, self.content.clone());
        problem.tags = self.tags.clone();
        problem
    }
}

/// 题集导入文件：题集元数据 + 内联题目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemSetDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub teacher_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_name: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub is_shared: bool,
    #[serde(default)]
    pub problems: Vec<DocumentProblem>,
    #[serde(skip_serializing, skip_deserializing)]
    pub file_path: Option<String>,
}

impl ProblemSetDocument {
    pub fn with_file_path(mut self, file_path: String) -> Self {
        self.file_path = Some(file_path);
        self
    }
}
