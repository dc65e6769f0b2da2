//! 题集导入处理器 - 编排层
//!
//! ## 职责
//!
//! 把一个 `ProblemSetDocument`（TOML 导入文件）落到仓储中：
//!
//! 1. **教师账号**：教师不存在时按文件中的信息创建
//! 2. **题目**：逐题校验并保存，结构不合法或 ID 属于其他教师的题目跳过
//! 3. **题集**：调用 `CreateProblemSetUseCase` 创建，同名题集已存在时跳过
//! 4. **统计输出**：记录保存/跳过的题目数量

use crate::dto::{CreateProblemSetRequest, InitialProblemDto, ProblemSetDto};
use crate::infrastructure::Repositories;
use crate::models::{ProblemSetDocument, ProblemSetTitle, User, UserRole};
use crate::use_cases::ProblemSetUseCases;
use anyhow::{Context, Result};
use tracing::{info, warn};

/// 单个导入文件的处理结果
#[derive(Debug, Clone, PartialEq)]
pub enum ImportOutcome {
    /// 新建了题集
    Created(ProblemSetDto),
    /// 同名题集已存在，未重复创建
    Skipped { existing_id: String },
}

/// 题目导入统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProblemStats {
    pub saved: usize,
    pub invalid: usize,
    /// ID 已被其他教师的题目占用
    pub conflicting: usize,
}

/// 导入单个题集文件
///
/// # 参数
/// - `repos`: 仓储集合（保存教师与题目）
/// - `use_cases`: 用例集合（创建题集）
/// - `document`: 导入文件内容
/// - `document_index`: 文件序号（用于日志）
pub async fn import_document(
    repos: &Repositories,
    use_cases: &ProblemSetUseCases,
    document: ProblemSetDocument,
    document_index: usize,
) -> Result<ImportOutcome> {
    log_document_start(document_index, &document);

    ensure_teacher(repos, &document).await?;

    let title = ProblemSetTitle::new(&document.title)
        .with_context(|| format!("[文件 {}] 题集标题不合法", document_index))?;
    if let Some(existing) = repos
        .problem_sets
        .find_by_teacher_id_and_title(&document.teacher_id, title.as_str())
        .await?
    {
        warn!(
            "[文件 {}] ⚠️ 教师 {} 已有同名题集 {}，跳过",
            document_index, document.teacher_id, existing.id
        );
        return Ok(ImportOutcome::Skipped {
            existing_id: existing.id,
        });
    }

    let (initial_problems, stats) = save_problems(repos, &document, document_index).await?;

    let request = CreateProblemSetRequest {
        teacher_id: document.teacher_id.clone(),
        title: document.title.clone(),
        description: document.description.clone(),
        is_public: document.is_public,
        is_shared: document.is_shared,
        initial_problems,
        id: document.id.clone(),
    };
    let created = use_cases
        .create
        .execute(request)
        .await
        .with_context(|| format!("[文件 {}] 创建题集失败", document_index))?;

    log_document_complete(document_index, &created, stats);
    Ok(ImportOutcome::Created(created))
}

async fn ensure_teacher(repos: &Repositories, document: &ProblemSetDocument) -> Result<()> {
    if repos.users.find_by_id(&document.teacher_id).await?.is_some() {
        return Ok(());
    }

    let name = document
        .teacher_name
        .clone()
        .unwrap_or_else(|| document.teacher_id.clone());
    info!("新建教师账号: {} ({})", document.teacher_id, name);
    repos
        .users
        .save(&User::new(&document.teacher_id, name, UserRole::Teacher))
        .await?;
    Ok(())
}

/// 保存文件中的题目，返回可加入题集的条目
async fn save_problems(
    repos: &Repositories,
    document: &ProblemSetDocument,
    document_index: usize,
) -> Result<(Vec<InitialProblemDto>, ProblemStats)> {
    let mut stats = ProblemStats::default();
    let mut initial_problems = Vec::with_capacity(document.problems.len());

    for (index, doc_problem) in document.problems.iter().enumerate() {
        let problem = doc_problem.to_problem(&document.teacher_id);
        if let Err(e) = problem.validate() {
            warn!(
                "[文件 {}] ⚠️ 第 {} 题 {} 跳过: {}",
                document_index,
                index + 1,
                problem.id,
                e
            );
            stats.invalid += 1;
            continue;
        }

        if let Some(existing) = repos.problems.find_by_id(&problem.id).await? {
            if existing.teacher_id != problem.teacher_id {
                warn!(
                    "[文件 {}] ⚠️ 第 {} 题 {} 跳过: ID 已属于教师 {}",
                    document_index,
                    index + 1,
                    problem.id,
                    existing.teacher_id
                );
                stats.conflicting += 1;
                continue;
            }
        }

        repos.problems.save(&problem).await?;
        stats.saved += 1;
        initial_problems.push(InitialProblemDto {
            problem_id: problem.id,
            points: doc_problem.points,
            settings: doc_problem.settings.clone(),
        });
    }

    Ok((initial_problems, stats))
}

// ========== 日志辅助函数 ==========

fn log_document_start(document_index: usize, document: &ProblemSetDocument) {
    info!("{}", "─".repeat(60));
    info!(
        "[文件 {}] 📥 导入题集 \"{}\" (教师 {}, {} 道题)",
        document_index,
        document.title,
        document.teacher_id,
        document.problems.len()
    );
    if let Some(path) = &document.file_path {
        info!("[文件 {}] 来源: {}", document_index, path);
    }
}

fn log_document_complete(document_index: usize, created: &ProblemSetDto, stats: ProblemStats) {
    info!(
        "[文件 {}] ✓ 题集 {} 导入完成: 保存 {} 题, 跳过 {} 题 (ID 冲突 {}), 总分 {}",
        document_index,
        created.id,
        stats.saved,
        stats.invalid + stats.conflicting,
        stats.conflicting,
        created.total_points
    );
}
