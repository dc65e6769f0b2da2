//! 批改上下文
//!
//! 封装"我正在批改哪位学生对哪个题集的第几份提交"这一信息

use std::fmt::Display;

/// 批改上下文
#[derive(Debug, Clone)]
pub struct GradingCtx {
    /// 学生ID
    pub student_id: String,

    /// 题集ID
    pub problem_set_id: String,

    /// 提交序号（从1开始，仅用于日志显示）
    pub submission_index: usize,
}

impl GradingCtx {
    pub fn new(student_id: String, problem_set_id: String, submission_index: usize) -> Self {
        Self {
            student_id,
            problem_set_id,
            submission_index,
        }
    }
}

impl Display for GradingCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[提交 #{} 学生 {} 题集 {}]",
            self.submission_index, self.student_id, self.problem_set_id
        )
    }
}
