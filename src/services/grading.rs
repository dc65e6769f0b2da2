//! 自动评分服务 - 业务能力层
//!
//! 所有题型的评分规则集中在这里，批改流程和人工复核都只调用本模块。

use crate::error::{AppResult, BusinessError, ValidationError};
use crate::models::{GradingResult, MatchingPair, Problem, ProblemContent, StudentAnswer};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// 单题评分策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradingPolicy {
    /// 该题满分
    pub points: u32,
    /// 连线/填空/排序是否按比例给分
    pub allow_partial_credit: bool,
}

impl GradingPolicy {
    pub fn new(points: u32, allow_partial_credit: bool) -> Self {
        Self {
            points,
            allow_partial_credit,
        }
    }
}

/// 结构化题型的正确计数
#[derive(Debug, Clone, Copy)]
struct PartialScore {
    correct: usize,
    total: usize,
}

/// 自动评分器
///
/// 职责：
/// - 按题型比较学生答案与标准答案
/// - 计算得分（含部分得分）
/// - 不关心题集、学生、提交批次
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoGrader;

impl AutoGrader {
    pub fn new() -> Self {
        Self
    }

    /// 评分
    ///
    /// # 参数
    /// - `problem`: 题目（含标准答案）
    /// - `answer`: 学生答案，`None` 表示未作答
    /// - `policy`: 满分与部分得分策略
    ///
    /// # 返回
    /// 答案题型与题目不一致时返回校验错误
    pub fn grade(
        &self,
        problem: &Problem,
        answer: Option<&StudentAnswer>,
        policy: GradingPolicy,
    ) -> AppResult<GradingResult> {
        let Some(answer) = answer else {
            return Ok(self.unanswered(problem, policy));
        };

        let result = match (&problem.content, answer) {
            (
                ProblemContent::MultipleChoice {
                    correct_choice_ids, ..
                },
                StudentAnswer::MultipleChoice { selected_choice_ids },
            ) => {
                let expected: HashSet<&str> = correct_choice_ids.iter().map(String::as_str).collect();
                let selected: HashSet<&str> = selected_choice_ids.iter().map(String::as_str).collect();
                self.all_or_nothing(problem, answer, policy, expected == selected)
            }
            (
                ProblemContent::ShortAnswer {
                    accepted_answers,
                    case_sensitive,
                },
                StudentAnswer::ShortAnswer { text },
            ) => {
                let correct = matches_any(text, accepted_answers, *case_sensitive);
                self.all_or_nothing(problem, answer, policy, correct)
            }
            (ProblemContent::TrueFalse { correct_answer }, StudentAnswer::TrueFalse { value }) => {
                self.all_or_nothing(problem, answer, policy, correct_answer == value)
            }
            (ProblemContent::LongAnswer { .. }, StudentAnswer::LongAnswer { .. }) => GradingResult {
                problem_id: problem.id.clone(),
                earned_points: 0,
                max_points: policy.points,
                is_correct: false,
                student_answer: Some(answer.clone()),
                feedback: "待教师人工评分".to_string(),
                needs_manual_review: true,
            },
            (ProblemContent::Matching { correct_pairs, .. }, StudentAnswer::Matching { pairs }) => {
                let score = score_matching(correct_pairs, pairs);
                self.partial(problem, answer, policy, score)
            }
            (ProblemContent::FillBlank { blanks, .. }, StudentAnswer::FillBlank { answers }) => {
                let correct = blanks
                    .iter()
                    .filter(|blank| {
                        answers
                            .get(&blank.id)
                            .is_some_and(|given| matches_any(given, &blank.accepted_answers, blank.case_sensitive))
                    })
                    .count();
                let score = PartialScore {
                    correct,
                    total: blanks.len(),
                };
                self.partial(problem, answer, policy, score)
            }
            (ProblemContent::Ordering { correct_order, .. }, StudentAnswer::Ordering { order }) => {
                let correct = correct_order
                    .iter()
                    .zip(order.iter())
                    .filter(|(expected, given)| expected == given)
                    .count();
                let score = PartialScore {
                    correct,
                    total: correct_order.len(),
                };
                self.partial(problem, answer, policy, score)
            }
            _ => {
                return Err(ValidationError::AnswerTypeMismatch {
                    problem_type: problem.problem_type().to_string(),
                    answer_type: answer.problem_type().to_string(),
                }
                .into())
            }
        };

        debug!(
            "题目 {} 评分: {}/{} ({})",
            problem.id, result.earned_points, result.max_points, result.feedback
        );
        Ok(result)
    }

    /// 人工评分（论述题或教师复核）
    ///
    /// 分数不能超过该题满分。
    pub fn apply_manual_score(
        &self,
        mut result: GradingResult,
        score: u32,
        feedback: Option<String>,
    ) -> AppResult<GradingResult> {
        if score > result.max_points {
            return Err(BusinessError::ScoreExceedsMax {
                score,
                max_points: result.max_points,
            }
            .into());
        }

        result.earned_points = score;
        result.is_correct = score == result.max_points;
        result.needs_manual_review = false;
        result.feedback = feedback.unwrap_or_else(|| format!("教师评分 {}/{}", score, result.max_points));
        Ok(result)
    }

    fn unanswered(&self, problem: &Problem, policy: GradingPolicy) -> GradingResult {
        GradingResult {
            problem_id: problem.id.clone(),
            earned_points: 0,
            max_points: policy.points,
            is_correct: false,
            student_answer: None,
            feedback: "未作答".to_string(),
            needs_manual_review: false,
        }
    }

    fn all_or_nothing(
        &self,
        problem: &Problem,
        answer: &StudentAnswer,
        policy: GradingPolicy,
        correct: bool,
    ) -> GradingResult {
        GradingResult {
            problem_id: problem.id.clone(),
            earned_points: if correct { policy.points } else { 0 },
            max_points: policy.points,
            is_correct: correct,
            student_answer: Some(answer.clone()),
            feedback: if correct { "回答正确" } else { "回答错误" }.to_string(),
            needs_manual_review: false,
        }
    }

    fn partial(
        &self,
        problem: &Problem,
        answer: &StudentAnswer,
        policy: GradingPolicy,
        score: PartialScore,
    ) -> GradingResult {
        let is_correct = score.total > 0 && score.correct == score.total;
        let earned_points = if is_correct {
            policy.points
        } else if policy.allow_partial_credit {
            partial_points(score.correct, score.total, policy.points)
        } else {
            0
        };

        let feedback = if is_correct {
            "回答正确".to_string()
        } else if earned_points > 0 {
            format!("部分正确 ({}/{})", score.correct, score.total)
        } else {
            format!("回答错误 ({}/{})", score.correct, score.total)
        };

        GradingResult {
            problem_id: problem.id.clone(),
            earned_points,
            max_points: policy.points,
            is_correct,
            student_answer: Some(answer.clone()),
            feedback,
            needs_manual_review: false,
        }
    }
}

/// `round(correct / total * points)`，0.5 向远离零的方向取整
pub fn partial_points(correct: usize, total: usize, points: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let ratio = correct.min(total) as f64 / total as f64;
    (ratio * f64::from(points)).round() as u32
}

fn matches_any(given: &str, accepted: &[String], case_sensitive: bool) -> bool {
    let given = given.trim();
    if given.is_empty() {
        return false;
    }
    accepted.iter().map(|a| a.trim()).filter(|a| !a.is_empty()).any(|expected| {
        if case_sensitive {
            expected == given
        } else {
            expected.to_lowercase() == given.to_lowercase()
        }
    })
}

/// 统计连线题中正确的配对数；同一左侧条目重复作答只取第一次
fn score_matching(correct_pairs: &[MatchingPair], given: &[MatchingPair]) -> PartialScore {
    let expected: HashMap<&str, &str> = correct_pairs
        .iter()
        .map(|p| (p.left_id.as_str(), p.right_id.as_str()))
        .collect();

    let mut answered: HashMap<&str, &str> = HashMap::new();
    for pair in given {
        answered.entry(pair.left_id.as_str()).or_insert(pair.right_id.as_str());
    }

    let correct = expected
        .iter()
        .filter(|(left, right)| answered.get(*left) == Some(right))
        .count();

    PartialScore {
        correct,
        total: expected.len(),
    }
}
