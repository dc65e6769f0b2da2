use crate::error::{AppResult, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 题型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemType {
    MultipleChoice,
    ShortAnswer,
    TrueFalse,
    LongAnswer,
    Matching,
    FillBlank,
    Ordering,
}

impl ProblemType {
    /// 条目未指定分值时使用的默认分值
    pub fn default_points(self) -> u32 {
        match self {
            ProblemType::MultipleChoice => 5,
            ProblemType::TrueFalse => 2,
            ProblemType::ShortAnswer => 5,
            ProblemType::FillBlank => 5,
            ProblemType::Matching => 10,
            ProblemType::Ordering => 10,
            ProblemType::LongAnswer => 20,
        }
    }

    /// 预计作答时间（分钟）
    pub fn estimated_minutes(self) -> u32 {
        match self {
            ProblemType::MultipleChoice => 2,
            ProblemType::TrueFalse => 1,
            ProblemType::ShortAnswer => 3,
            ProblemType::FillBlank => 3,
            ProblemType::Matching => 5,
            ProblemType::Ordering => 4,
            ProblemType::LongAnswer => 15,
        }
    }

    /// 是否支持自动评分（论述题只能人工评分）
    pub fn is_auto_gradable(self) -> bool {
        !matches!(self, ProblemType::LongAnswer)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProblemType::MultipleChoice => "multiple_choice",
            ProblemType::ShortAnswer => "short_answer",
            ProblemType::TrueFalse => "true_false",
            ProblemType::LongAnswer => "long_answer",
            ProblemType::Matching => "matching",
            ProblemType::FillBlank => "fill_blank",
            ProblemType::Ordering => "ordering",
        }
    }
}

impl std::fmt::Display for ProblemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchingPair {
    pub left_id: String,
    pub right_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blank {
    pub id: String,
    pub accepted_answers: Vec<String>,
    #[serde(default)]
    pub case_sensitive: bool,
}

/// 各题型的题目内容与标准答案
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProblemContent {
    MultipleChoice {
        choices: Vec<Choice>,
        correct_choice_ids: Vec<String>,
        #[serde(default)]
        allow_multiple: bool,
    },
    ShortAnswer {
        accepted_answers: Vec<String>,
        #[serde(default)]
        case_sensitive: bool,
    },
    TrueFalse {
        correct_answer: bool,
    },
    LongAnswer {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rubric: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_length: Option<usize>,
    },
    Matching {
        left_items: Vec<Choice>,
        right_items: Vec<Choice>,
        correct_pairs: Vec<MatchingPair>,
    },
    FillBlank {
        text: String,
        blanks: Vec<Blank>,
    },
    Ordering {
        items: Vec<Choice>,
        correct_order: Vec<String>,
    },
}

impl ProblemContent {
    pub fn problem_type(&self) -> ProblemType {
        match self {
            ProblemContent::MultipleChoice { .. } => ProblemType::MultipleChoice,
            ProblemContent::ShortAnswer { .. } => ProblemType::ShortAnswer,
            ProblemContent::TrueFalse { .. } => ProblemType::TrueFalse,
            ProblemContent::LongAnswer { .. } => ProblemType::LongAnswer,
            ProblemContent::Matching { .. } => ProblemType::Matching,
            ProblemContent::FillBlank { .. } => ProblemType::FillBlank,
            ProblemContent::Ordering { .. } => ProblemType::Ordering,
        }
    }
}

/// 题目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub id: String,
    pub teacher_id: String,
    pub title: String,
    pub content: ProblemContent,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Problem {
    pub fn new(
        id: impl Into<String>,
        teacher_id: impl Into<String>,
        title: impl Into<String>,
        content: ProblemContent,
    ) -> Self {
        Self {
            id: id.into(),
            teacher_id: teacher_id.into(),
            title: title.into(),
            content,
            tags: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn problem_type(&self) -> ProblemType {
        self.content.problem_type()
    }

    /// 校验标准答案结构是否自洽
    pub fn validate(&self) -> AppResult<()> {
        let invalid = |reason: &str| -> AppResult<()> {
            Err(ValidationError::InvalidProblem {
                problem_id: self.id.clone(),
                reason: reason.to_string(),
            }
            .into())
        };

        if self.id.trim().is_empty() {
            return Err(ValidationError::Required { field: "problem.id" }.into());
        }

        match &self.content {
            ProblemContent::MultipleChoice {
                choices,
                correct_choice_ids,
                allow_multiple,
            } => {
                if choices.len() < 2 {
                    return invalid("选择题至少需要两个选项");
                }
                if correct_choice_ids.is_empty() {
                    return invalid("选择题必须有正确选项");
                }
                if !allow_multiple && correct_choice_ids.len() > 1 {
                    return invalid("单选题只能有一个正确选项");
                }
                let ids: HashSet<&str> = choices.iter().map(|c| c.id.as_str()).collect();
                if ids.len() != choices.len() {
                    return invalid("选项 ID 重复");
                }
                if correct_choice_ids.iter().any(|id| !ids.contains(id.as_str())) {
                    return invalid("正确选项引用了不存在的选项");
                }
            }
            ProblemContent::ShortAnswer { accepted_answers, .. } => {
                if accepted_answers.iter().all(|a| a.trim().is_empty()) {
                    return invalid("简答题至少需要一个参考答案");
                }
            }
            ProblemContent::TrueFalse { .. } | ProblemContent::LongAnswer { .. } => {}
            ProblemContent::Matching {
                left_items,
                right_items,
                correct_pairs,
            } => {
                if correct_pairs.is_empty() {
                    return invalid("连线题至少需要一组正确配对");
                }
                let left: HashSet<&str> = left_items.iter().map(|c| c.id.as_str()).collect();
                let right: HashSet<&str> = right_items.iter().map(|c| c.id.as_str()).collect();
                let mut seen_left = HashSet::new();
                for pair in correct_pairs {
                    if !left.contains(pair.left_id.as_str()) || !right.contains(pair.right_id.as_str()) {
                        return invalid("配对引用了不存在的条目");
                    }
                    if !seen_left.insert(pair.left_id.as_str()) {
                        return invalid("左侧条目只能配对一次");
                    }
                }
            }
            ProblemContent::FillBlank { blanks, .. } => {
                if blanks.is_empty() {
                    return invalid("填空题至少需要一个空");
                }
                let mut ids = HashSet::new();
                for blank in blanks {
                    if !ids.insert(blank.id.as_str()) {
                        return invalid("空位 ID 重复");
                    }
                    if blank.accepted_answers.iter().all(|a| a.trim().is_empty()) {
                        return invalid("每个空至少需要一个参考答案");
                    }
                }
            }
            ProblemContent::Ordering { items, correct_order } => {
                if correct_order.len() < 2 {
                    return invalid("排序题至少需要两个条目");
                }
                let item_ids: HashSet<&str> = items.iter().map(|c| c.id.as_str()).collect();
                let order_ids: HashSet<&str> = correct_order.iter().map(String::as_str).collect();
                if order_ids.len() != correct_order.len() || item_ids != order_ids {
                    return invalid("正确顺序必须恰好包含所有条目");
                }
            }
        }

        Ok(())
    }
}
