use crate::models::problem::{MatchingPair, ProblemType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 学生答案，与 `ProblemContent` 的题型一一对应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StudentAnswer {
    MultipleChoice { selected_choice_ids: Vec<String> },
    ShortAnswer { text: String },
    TrueFalse { value: bool },
    LongAnswer { text: String },
    Matching { pairs: Vec<MatchingPair> },
    FillBlank { answers: HashMap<String, String> },
    Ordering { order: Vec<String> },
}

impl StudentAnswer {
    pub fn problem_type(&self) -> ProblemType {
        match self {
            StudentAnswer::MultipleChoice { .. } => ProblemType::MultipleChoice,
            StudentAnswer::ShortAnswer { .. } => ProblemType::ShortAnswer,
            StudentAnswer::TrueFalse { .. } => ProblemType::TrueFalse,
            StudentAnswer::LongAnswer { .. } => ProblemType::LongAnswer,
            StudentAnswer::Matching { .. } => ProblemType::Matching,
            StudentAnswer::FillBlank { .. } => ProblemType::FillBlank,
            StudentAnswer::Ordering { .. } => ProblemType::Ordering,
        }
    }
}

/// 单题批改结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradingResult {
    pub problem_id: String,
    pub earned_points: u32,
    pub max_points: u32,
    pub is_correct: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_answer: Option<StudentAnswer>,
    pub feedback: String,
    pub needs_manual_review: bool,
}

/// 学生对某个题集的一次提交
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub student_id: String,
    pub problem_set_id: String,
    #[serde(default)]
    pub answers: HashMap<String, StudentAnswer>,
    #[serde(default = "Utc::now")]
    pub submitted_at: DateTime<Utc>,
}

/// 一次提交的整体批改结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResult {
    pub student_id: String,
    pub problem_set_id: String,
    pub results: Vec<GradingResult>,
    pub total_earned: u32,
    pub total_max: u32,
    pub percentage: f64,
    pub pending_review: usize,
}

impl SubmissionResult {
    pub fn from_results(student_id: String, problem_set_id: String, results: Vec<GradingResult>) -> Self {
        let total_earned = results.iter().map(|r| r.earned_points).sum();
        let total_max: u32 = results.iter().map(|r| r.max_points).sum();
        let pending_review = results.iter().filter(|r| r.needs_manual_review).count();
        let percentage = if total_max == 0 {
            0.0
        } else {
            (f64::from(total_earned) / f64::from(total_max) * 1000.0).round() / 10.0
        };

        Self {
            student_id,
            problem_set_id,
            results,
            total_earned,
            total_max,
            percentage,
            pending_review,
        }
    }
}
