use crate::dto::{ValidateOwnershipRequest, ValidateOwnershipResponse};
use crate::error::AppResult;
use crate::infrastructure::Repositories;
use crate::services::ProblemSetAccess;
use crate::use_cases::{load_problem_set, load_requester};
use tracing::debug;

/// 查询请求者对题集的权限。不是所有者不算失败，只有题集或用户不存在才报错。
pub struct ValidateProblemSetOwnershipUseCase {
    repos: Repositories,
}

impl ValidateProblemSetOwnershipUseCase {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub async fn execute(&self, request: ValidateOwnershipRequest) -> AppResult<ValidateOwnershipResponse> {
        let requester = load_requester(&self.repos, &request.requester_id).await?;
        let problem_set = load_problem_set(&self.repos, &request.problem_set_id).await?;
        let access = ProblemSetAccess::evaluate(&problem_set, &requester);

        debug!(
            "权限校验: 用户 {} 题集 {} -> owner={} admin={}",
            requester.id, problem_set.id, access.is_owner, access.is_admin
        );

        Ok(ValidateOwnershipResponse {
            problem_set_id: problem_set.id,
            owner_id: problem_set.teacher_id,
            is_owner: access.is_owner,
            is_admin: access.is_admin,
            can_view: access.can_view,
            can_edit: access.can_edit,
            can_delete: access.can_delete,
            can_clone: access.can_clone,
            can_share: access.can_share,
        })
    }
}
