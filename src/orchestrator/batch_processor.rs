//! 批量处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责题集导入、批量批改和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：写日志文件头、创建仓储和用例集合
//! 2. **题集导入**：扫描数据目录，逐个委托 import_processor
//! 3. **批量加载**：扫描并加载所有学生提交（`Vec<Submission>`）
//! 4. **并发控制**：使用 Semaphore 限制同时批改的提交数
//! 5. **分批处理**：将提交分批处理，每批完成后再开始下一批
//! 6. **全局统计**：汇总所有提交的批改结果

use crate::config::Config;
use crate::infrastructure::Repositories;
use crate::models::{Submission, SubmissionResult};
use crate::orchestrator::import_processor::{self, ImportOutcome};
use crate::use_cases::ProblemSetUseCases;
use crate::utils::logging::{init_log_file, log_batch_complete, log_batch_start, log_startup, print_final_stats};
use crate::workflow::{GradingCtx, SubmissionFlow};
use anyhow::{Context, Result};
use futures::future::join_all;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    repos: Repositories,
    use_cases: ProblemSetUseCases,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        init_log_file(&config.output_log_file)
            .with_context(|| format!("无法创建日志文件: {}", config.output_log_file))?;
        log_startup(config.max_concurrent_gradings);

        Ok(Self::with_repositories(config, Repositories::in_memory()))
    }

    /// 使用给定仓储创建（测试或接入其他存储时使用）
    pub fn with_repositories(config: Config, repos: Repositories) -> Self {
        let use_cases = ProblemSetUseCases::new(repos.clone(), &config);
        Self {
            config,
            repos,
            use_cases,
        }
    }

    pub fn use_cases(&self) -> &ProblemSetUseCases {
        &self.use_cases
    }

    pub fn repositories(&self) -> &Repositories {
        &self.repos
    }

    /// 运行应用主逻辑：导入题集，然后批改全部提交
    pub async fn run(&self) -> Result<GradingStats> {
        let imported = self.import_problem_sets().await?;
        info!("✓ 导入完成: 新建 {} 个题集", imported);

        let submissions = self.load_submissions().await?;
        if submissions.is_empty() {
            warn!("⚠️ 没有找到待批改的提交，程序结束");
            return Ok(GradingStats::default());
        }

        log_submissions_loaded(submissions.len(), self.config.max_concurrent_gradings);

        let processor = BulkGradingProcessor::new(self.repos.clone(), &self.config);
        let stats = processor.grade_all(submissions).await?;

        print_final_stats(
            stats.success,
            stats.failed,
            stats.pending_review,
            stats.total,
            &self.config.output_log_file,
        );
        Ok(stats)
    }

    /// 导入数据目录中的全部题集文件，返回新建的题集数
    pub async fn import_problem_sets(&self) -> Result<usize> {
        if !Path::new(&self.config.data_folder).exists() {
            warn!("⚠️ 题集目录不存在: {}，跳过导入", self.config.data_folder);
            return Ok(0);
        }

        info!("📁 正在扫描题集文件...");
        let documents = crate::models::load_all_problem_set_documents(&self.config.data_folder).await?;

        let mut created = 0;
        for (index, document) in documents.into_iter().enumerate() {
            match import_processor::import_document(&self.repos, &self.use_cases, document, index + 1).await {
                Ok(ImportOutcome::Created(_)) => created += 1,
                Ok(ImportOutcome::Skipped { .. }) => {}
                Err(e) => error!("[文件 {}] ❌ 导入失败: {:#}", index + 1, e),
            }
        }
        Ok(created)
    }

    async fn load_submissions(&self) -> Result<Vec<Submission>> {
        if !Path::new(&self.config.submissions_folder).exists() {
            warn!("⚠️ 提交目录不存在: {}", self.config.submissions_folder);
            return Ok(Vec::new());
        }

        info!("📁 正在扫描待批改的提交...");
        crate::models::load_all_submissions(&self.config.submissions_folder).await
    }
}

/// 批改统计
#[derive(Debug, Default)]
pub struct GradingStats {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub pending_review: usize,
    /// 成功批改的结果，按提交顺序排列
    pub results: Vec<SubmissionResult>,
}

/// 批量批改处理器
///
/// 按 `max_concurrent_gradings` 分批，每批内并发批改，批与批之间串行。
pub struct BulkGradingProcessor {
    repos: Repositories,
    flow: Arc<SubmissionFlow>,
    max_concurrent: usize,
}

impl BulkGradingProcessor {
    pub fn new(repos: Repositories, config: &Config) -> Self {
        Self {
            repos,
            flow: Arc::new(SubmissionFlow::new(config)),
            max_concurrent: config.max_concurrent_gradings.max(1),
        }
    }

    pub async fn grade_all(&self, submissions: Vec<Submission>) -> Result<GradingStats> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let total = submissions.len();
        let total_batches = total.div_ceil(self.max_concurrent);
        let mut stats = GradingStats {
            total,
            ..Default::default()
        };

        for (batch_index, batch) in submissions.chunks(self.max_concurrent).enumerate() {
            let batch_start = batch_index * self.max_concurrent;
            let batch_num = batch_index + 1;
            log_batch_start(batch_num, total_batches, batch_start + 1, batch_start + batch.len(), total);

            let mut handles = Vec::with_capacity(batch.len());
            for (offset, submission) in batch.iter().enumerate() {
                let submission_index = batch_start + offset + 1;
                let permit = semaphore.clone().acquire_owned().await?;
                let repos = self.repos.clone();
                let flow = self.flow.clone();
                let submission = submission.clone();

                let handle = tokio::spawn(async move {
                    let _permit = permit;
                    grade_submission(&repos, &flow, &submission, submission_index).await
                });
                handles.push(handle);
            }

            // join_all 按传入顺序返回结果
            let outcomes = join_all(handles).await;
            let mut batch_success = 0;
            for (offset, outcome) in outcomes.into_iter().enumerate() {
                let submission_index = batch_start + offset + 1;
                match outcome {
                    Ok(Ok(result)) => {
                        batch_success += 1;
                        stats.pending_review += result.pending_review;
                        stats.results.push(result);
                    }
                    Ok(Err(e)) => {
                        error!("[提交 #{}] ❌ 批改失败: {:#}", submission_index, e);
                        stats.failed += 1;
                    }
                    Err(e) => {
                        error!("[提交 #{}] 任务执行失败: {}", submission_index, e);
                        stats.failed += 1;
                    }
                }
            }

            stats.success += batch_success;
            log_batch_complete(batch_num, batch_success, batch.len());
        }

        Ok(stats)
    }
}

/// 加载题集与题目后批改一份提交
async fn grade_submission(
    repos: &Repositories,
    flow: &SubmissionFlow,
    submission: &Submission,
    submission_index: usize,
) -> Result<SubmissionResult> {
    let problem_set = repos
        .problem_sets
        .find_by_id(&submission.problem_set_id)
        .await?
        .with_context(|| format!("题集不存在: {}", submission.problem_set_id))?;

    let problem_ids: Vec<String> = problem_set.items.iter().map(|i| i.problem_id.clone()).collect();
    let problems: HashMap<_, _> = repos
        .problems
        .find_by_ids(&problem_ids)
        .await?
        .into_iter()
        .map(|p| (p.id.clone(), p))
        .collect();

    let ctx = GradingCtx::new(
        submission.student_id.clone(),
        submission.problem_set_id.clone(),
        submission_index,
    );
    flow.run(&problem_set, &problems, submission, &ctx).await
}

fn log_submissions_loaded(total: usize, max_concurrent: usize) {
    info!("✓ 找到 {} 份待批改的提交", total);
    info!("📋 将以每批 {} 份的方式批改", max_concurrent);
}
