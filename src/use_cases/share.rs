use crate::dto::{ShareProblemSetRequest, ShareProblemSetResponse};
use crate::error::AppResult;
use crate::infrastructure::Repositories;
use crate::services::ProblemSetAccess;
use crate::use_cases::{load_problem_set, load_requester};
use tracing::{debug, info};

/// 设置题集的共享/公开状态
pub struct ShareProblemSetUseCase {
    repos: Repositories,
}

impl ShareProblemSetUseCase {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub async fn execute(&self, request: ShareProblemSetRequest) -> AppResult<ShareProblemSetResponse> {
        debug!(
            "共享题集 {} (请求者 {}, shared={}, public={:?})",
            request.problem_set_id, request.requester_id, request.is_shared, request.is_public
        );

        let requester = load_requester(&self.repos, &request.requester_id).await?;
        let mut problem_set = load_problem_set(&self.repos, &request.problem_set_id).await?;
        ProblemSetAccess::evaluate(&problem_set, &requester).require_share(&requester, &problem_set)?;

        // 公开必共享；取消共享时一并取消公开
        let is_public = match request.is_public {
            Some(true) => true,
            Some(false) => false,
            None => request.is_shared && problem_set.is_public,
        };
        problem_set.set_visibility(request.is_shared, is_public);

        self.repos.problem_sets.save(&problem_set).await?;
        info!(
            "✓ 题集 {} 共享状态: shared={} public={}",
            problem_set.id, problem_set.is_shared, problem_set.is_public
        );

        Ok(ShareProblemSetResponse {
            problem_set_id: problem_set.id,
            is_shared: problem_set.is_shared,
            is_public: problem_set.is_public,
            updated_at: problem_set.updated_at,
        })
    }
}
