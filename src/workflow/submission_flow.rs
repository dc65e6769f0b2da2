//! 提交批改流程 - 流程层
//!
//! 核心职责：定义"一份提交"的完整批改流程
//!
//! 流程顺序：
//! 1. 按题集条目顺序逐题评分（条目设置决定满分与部分得分）
//! 2. 论述题写入人工评分队列
//! 3. 汇总为 `SubmissionResult`

use anyhow::Result;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::models::{GradingResult, Problem, ProblemSet, ProblemSetItem, StudentAnswer, Submission, SubmissionResult};
use crate::services::{AutoGrader, GradingPolicy, ReviewWriter};
use crate::utils::truncate_text;
use crate::workflow::grading_ctx::GradingCtx;

/// 提交批改流程
///
/// - 编排一份提交的逐题评分
/// - 决定何时自动评分、何时进入人工队列
/// - 不加载数据（题集和题目由调用方提供）
pub struct SubmissionFlow {
    grader: AutoGrader,
    review_writer: ReviewWriter,
    verbose_logging: bool,
}

impl SubmissionFlow {
    pub fn new(config: &Config) -> Self {
        Self {
            grader: AutoGrader::new(),
            review_writer: ReviewWriter::with_path(config.review_file.clone()),
            verbose_logging: config.verbose_logging,
        }
    }

    pub async fn run(
        &self,
        problem_set: &ProblemSet,
        problems: &HashMap<String, Problem>,
        submission: &Submission,
        ctx: &GradingCtx,
    ) -> Result<SubmissionResult> {
        info!("{} 📝 开始批改 ({} 道题)", ctx, problem_set.item_count());

        for problem_id in submission.answers.keys() {
            if !problem_set.contains_problem(problem_id) {
                warn!("{} ⚠️ 题目 {} 不在题集中，忽略该答案", ctx, problem_id);
            }
        }

        let mut results = Vec::with_capacity(problem_set.item_count());
        for item in problem_set.ordered_items() {
            let answer = submission.answers.get(&item.problem_id);
            let result = self.grade_item(item, problems.get(&item.problem_id), answer, ctx);

            if result.needs_manual_review {
                if let Some(StudentAnswer::LongAnswer { text }) = answer {
                    self.review_writer
                        .write(&ctx.problem_set_id, &ctx.student_id, &item.problem_id, text)
                        .await?;
                }
            }

            if self.verbose_logging {
                debug!(
                    "{} 第 {} 题 {}: {}/{} {}",
                    ctx,
                    item.order_index + 1,
                    item.problem_id,
                    result.earned_points,
                    result.max_points,
                    truncate_text(&result.feedback, 40)
                );
            }
            results.push(result);
        }

        let summary = SubmissionResult::from_results(
            submission.student_id.clone(),
            submission.problem_set_id.clone(),
            results,
        );
        info!(
            "{} ✓ 批改完成: {}/{} ({}%), 待人工评分 {} 题",
            ctx, summary.total_earned, summary.total_max, summary.percentage, summary.pending_review
        );
        Ok(summary)
    }

    /// 单题评分；题目缺失或答案题型不符时记 0 分而不中断整份提交
    fn grade_item(
        &self,
        item: &ProblemSetItem,
        problem: Option<&Problem>,
        answer: Option<&StudentAnswer>,
        ctx: &GradingCtx,
    ) -> GradingResult {
        let Some(problem) = problem else {
            warn!("{} ⚠️ 题目 {} 不存在，记 0 分", ctx, item.problem_id);
            return zero_result(item, answer, "题目不存在");
        };

        let policy = GradingPolicy::new(item.points, item.settings.allow_partial_credit);
        match self.grader.grade(problem, answer, policy) {
            Ok(result) => result,
            Err(e) => {
                warn!("{} ⚠️ 题目 {} 无法评分: {}", ctx, item.problem_id, e);
                zero_result(item, answer, "答案题型与题目不符")
            }
        }
    }
}

fn zero_result(item: &ProblemSetItem, answer: Option<&StudentAnswer>, feedback: &str) -> GradingResult {
    GradingResult {
        problem_id: item.problem_id.clone(),
        earned_points: 0,
        max_points: item.points,
        is_correct: false,
        student_answer: answer.cloned(),
        feedback: feedback.to_string(),
        needs_manual_review: false,
    }
}
