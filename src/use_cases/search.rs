use crate::config::Config;
use crate::dto::{paginate, sort_problem_sets, ProblemSetListResponse, SearchProblemSetsRequest};
use crate::error::{AppResult, ValidationError};
use crate::infrastructure::Repositories;
use crate::models::ProblemSet;
use crate::use_cases::list::summaries;
use crate::use_cases::load_requester;
use std::collections::HashSet;
use tracing::debug;

/// 搜索请求者可见的题集
///
/// 候选集合 = 自己的 ∪ 他人共享的 ∪ 公开的（按ID去重），
/// 查询串按空白拆成关键字，每个关键字都须出现在标题或描述中（不区分大小写）。
pub struct SearchProblemSetsUseCase {
    repos: Repositories,
    config: Config,
}

impl SearchProblemSetsUseCase {
    pub fn new(repos: Repositories, config: &Config) -> Self {
        Self {
            repos,
            config: config.clone(),
        }
    }

    pub async fn execute(&self, request: SearchProblemSetsRequest) -> AppResult<ProblemSetListResponse> {
        debug!("搜索题集: 请求者 {} 查询 {:?}", request.requester_id, request.query);

        let (page, limit) = request.page.resolve(&self.config)?;
        if let (Some(min), Some(max)) = (request.min_items, request.max_items) {
            if min > max {
                return Err(ValidationError::OutOfRange {
                    field: "minItems",
                    min: 0,
                    max: max as u64,
                    actual: min as u64,
                }
                .into());
            }
        }

        let requester = load_requester(&self.repos, &request.requester_id).await?;
        let pool = self.candidate_pool(&requester.id).await?;

        let keywords: Vec<String> = request
            .query
            .as_deref()
            .unwrap_or_default()
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();

        let mut matched: Vec<ProblemSet> = pool
            .into_iter()
            .filter(|s| matches_keywords(s, &keywords))
            .filter(|s| request.teacher_id.as_deref().is_none_or(|t| s.teacher_id == t))
            .filter(|s| request.is_public.is_none_or(|p| s.is_public == p))
            .filter(|s| request.is_shared.is_none_or(|p| s.is_shared == p))
            .filter(|s| request.min_items.is_none_or(|n| s.item_count() >= n))
            .filter(|s| request.max_items.is_none_or(|n| s.item_count() <= n))
            .collect();

        debug!("搜索命中 {} 个题集", matched.len());

        sort_problem_sets(&mut matched, request.sort_by, request.sort_order);
        let (page_sets, pagination) = paginate(matched, page, limit);
        let problem_sets = summaries(&self.repos, &page_sets).await?;

        Ok(ProblemSetListResponse {
            problem_sets,
            pagination,
        })
    }

    async fn candidate_pool(&self, requester_id: &str) -> AppResult<Vec<ProblemSet>> {
        let own = self.repos.problem_sets.find_by_teacher_id(requester_id).await?;
        let shared = self
            .repos
            .problem_sets
            .find_shared_problem_sets_excluding_teacher(requester_id)
            .await?;
        let public = self.repos.problem_sets.find_public_problem_sets().await?;

        let mut seen = HashSet::new();
        Ok(own
            .into_iter()
            .chain(shared)
            .chain(public)
            .filter(|s| seen.insert(s.id.clone()))
            .collect())
    }
}

fn matches_keywords(problem_set: &ProblemSet, keywords: &[String]) -> bool {
    if keywords.is_empty() {
        return true;
    }
    let title = problem_set.title.as_str().to_lowercase();
    let description = problem_set
        .description
        .as_ref()
        .map(|d| d.as_str().to_lowercase())
        .unwrap_or_default();

    keywords
        .iter()
        .all(|k| title.contains(k.as_str()) || description.contains(k.as_str()))
}
