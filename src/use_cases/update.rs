use crate::dto::{ProblemSetDto, UpdateProblemSetRequest, UpdateProblemSetResponse};
use crate::error::{AppResult, ValidationError};
use crate::infrastructure::Repositories;
use crate::models::{ProblemSetDescription, ProblemSetTitle};
use crate::services::ProblemSetAccess;
use crate::use_cases::{ensure_title_available, load_problem_map, load_problem_set, load_requester};
use tracing::{debug, info};

/// 更新题集基本信息
pub struct UpdateProblemSetUseCase {
    repos: Repositories,
}

impl UpdateProblemSetUseCase {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub async fn execute(&self, request: UpdateProblemSetRequest) -> AppResult<UpdateProblemSetResponse> {
        debug!("更新题集 {} (请求者 {})", request.problem_set_id, request.requester_id);

        if request.title.is_none()
            && request.description.is_none()
            && request.is_public.is_none()
            && request.is_shared.is_none()
        {
            return Err(ValidationError::NothingToUpdate.into());
        }

        let title = request.title.as_deref().map(ProblemSetTitle::new).transpose()?;
        let description = request
            .description
            .as_deref()
            .map(|d| ProblemSetDescription::parse(Some(d)))
            .transpose()?;

        let requester = load_requester(&self.repos, &request.requester_id).await?;
        let mut problem_set = load_problem_set(&self.repos, &request.problem_set_id).await?;
        ProblemSetAccess::evaluate(&problem_set, &requester).require_edit(&requester, &problem_set)?;

        let mut updated_fields = Vec::new();

        if let Some(title) = title {
            ensure_title_available(
                &self.repos,
                &problem_set.teacher_id,
                title.as_str(),
                Some(&problem_set.id),
            )
            .await?;
            problem_set.rename(title);
            updated_fields.push("title".to_string());
        }

        if let Some(description) = description {
            problem_set.update_description(description);
            updated_fields.push("description".to_string());
        }

        if request.is_shared.is_some() || request.is_public.is_some() {
            let is_public = request.is_public.unwrap_or(problem_set.is_public);
            let is_shared = request.is_shared.unwrap_or(problem_set.is_shared);
            // 取消共享同时取消公开，除非本次显式要求公开
            let is_public = is_public && (is_shared || request.is_public == Some(true));
            problem_set.set_visibility(is_shared, is_public);
            if request.is_shared.is_some() {
                updated_fields.push("isShared".to_string());
            }
            if request.is_public.is_some() {
                updated_fields.push("isPublic".to_string());
            }
        }

        self.repos.problem_sets.save(&problem_set).await?;
        info!("✓ 题集已更新: {} 字段 {:?}", problem_set.id, updated_fields);

        let problems = load_problem_map(&self.repos, &problem_set).await?;
        Ok(UpdateProblemSetResponse {
            problem_set: ProblemSetDto::from_entity(&problem_set, &problems),
            updated_fields,
        })
    }
}
