//! 人工评分队列写入服务 - 业务能力层
//!
//! 只负责"把待人工评分的答案追加到文件"能力，不关心流程

use anyhow::{Context, Result};
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// 待人工评分写入服务
///
/// 职责：
/// - 将需要教师评分的答案（论述题）追加写入复核文件
/// - 只处理单个答案
/// - 不关心批改顺序
pub struct ReviewWriter {
    review_file_path: String,
}

impl ReviewWriter {
    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            review_file_path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.review_file_path
    }

    /// 写入一条待评分记录
    ///
    /// # 参数
    /// - `problem_set_id`: 题集ID
    /// - `student_id`: 学生ID
    /// - `problem_id`: 题目ID
    /// - `answer_text`: 学生答案文本
    pub async fn write(
        &self,
        problem_set_id: &str,
        student_id: &str,
        problem_id: &str,
        answer_text: &str,
    ) -> Result<()> {
        debug!(
            "写入待评分: 题集 {} | 学生 {} | 题目 {} | 答案长度: {}",
            problem_set_id,
            student_id,
            problem_id,
            answer_text.chars().count()
        );

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.review_file_path)
            .await
            .with_context(|| format!("无法打开复核文件: {}", self.review_file_path))?;

        // 换行替换为空格，保证一条记录一行
        let review_line = format!(
            "题集 {} | 学生 {} | 题目 {} | 答案: {}\n",
            problem_set_id,
            student_id,
            problem_id,
            answer_text.replace(['\r', '\n'], " ")
        );

        file.write_all(review_line.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }
}

impl Default for ReviewWriter {
    fn default() -> Self {
        Self::with_path("manual_review.txt")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_appends_one_line_per_answer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("review.txt");
        let writer = ReviewWriter::with_path(path.to_string_lossy().to_string());

        writer.write("ps-1", "s-1", "p-1", "第一段\n第二段").await.unwrap();
        writer.write("ps-1", "s-2", "p-1", "答案").await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("第一段 第二段"));
        assert!(lines[1].contains("学生 s-2"));
    }
}
