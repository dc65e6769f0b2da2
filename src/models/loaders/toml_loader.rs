use crate::models::document::ProblemSetDocument;
use crate::models::grading::Submission;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从 TOML 文件加载数据并反序列化为指定类型
async fn load_toml<T: DeserializeOwned>(toml_file_path: &Path) -> Result<T> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取TOML文件: {}", toml_file_path.display()))?;

    toml::from_str(&content).with_context(|| format!("无法解析TOML文件: {}", toml_file_path.display()))
}

/// 列出文件夹中的所有 TOML 文件（按文件名排序，保证加载顺序稳定）
async fn list_toml_files(folder_path: &str) -> Result<Vec<PathBuf>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut toml_files = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml_files.push(path);
        }
    }

    toml_files.sort();
    Ok(toml_files)
}

/// 加载单个题集导入文件
pub async fn load_problem_set_document(toml_file_path: &Path) -> Result<ProblemSetDocument> {
    let document: ProblemSetDocument = load_toml(toml_file_path).await?;
    Ok(document.with_file_path(toml_file_path.to_string_lossy().to_string()))
}

/// 从文件夹中加载所有题集导入文件，解析失败的文件记录警告后跳过
pub async fn load_all_problem_set_documents(folder_path: &str) -> Result<Vec<ProblemSetDocument>> {
    let mut documents = Vec::new();

    for path in list_toml_files(folder_path).await? {
        tracing::info!(
            "正在加载题集: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_problem_set_document(&path).await {
            Ok(document) => {
                tracing::info!("成功加载 {} 道题目", document.problems.len());
                documents.push(document);
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {:#}", path.display(), e);
            }
        }
    }

    Ok(documents)
}

/// 从文件夹中加载所有学生提交文件，解析失败的文件记录警告后跳过
pub async fn load_all_submissions(folder_path: &str) -> Result<Vec<Submission>> {
    let mut submissions = Vec::new();

    for path in list_toml_files(folder_path).await? {
        match load_toml::<Submission>(&path).await {
            Ok(submission) => {
                tracing::debug!(
                    "已加载提交: 学生 {} 题集 {} ({} 个答案)",
                    submission.student_id,
                    submission.problem_set_id,
                    submission.answers.len()
                );
                submissions.push(submission);
            }
            Err(e) => {
                tracing::warn!("加载提交失败 {}: {:#}", path.display(), e);
            }
        }
    }

    Ok(submissions)
}
