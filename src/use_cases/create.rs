use crate::config::Config;
use crate::dto::{CreateProblemSetRequest, CreateProblemSetResponse, ProblemSetDto};
use crate::error::{AppError, AppResult, BusinessError, PermissionError, ValidationError};
use crate::infrastructure::Repositories;
use crate::models::problem_set::has_duplicates;
use crate::models::{ProblemSet, ProblemSetDescription, ProblemSetTitle};
use crate::use_cases::{ensure_title_available, load_requester, require_field};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// 创建题集
pub struct CreateProblemSetUseCase {
    repos: Repositories,
    max_items: usize,
}

impl CreateProblemSetUseCase {
    pub fn new(repos: Repositories, config: &Config) -> Self {
        Self {
            repos,
            max_items: config.item_limit(),
        }
    }

    pub async fn execute(&self, request: CreateProblemSetRequest) -> AppResult<CreateProblemSetResponse> {
        debug!(
            "创建题集: 教师 {} 标题 {:?} 初始题目 {} 道",
            request.teacher_id,
            request.title,
            request.initial_problems.len()
        );

        require_field(&request.teacher_id, "teacherId")?;
        let title = ProblemSetTitle::new(&request.title)?;
        let description = ProblemSetDescription::parse(request.description.as_deref())?;

        if request.initial_problems.len() > self.max_items {
            return Err(BusinessError::TooManyItems {
                max: self.max_items,
                current: request.initial_problems.len(),
            }
            .into());
        }
        for initial in &request.initial_problems {
            require_field(&initial.problem_id, "initialProblems.problemId")?;
        }
        if let Some(duplicate) = has_duplicates(request.initial_problems.iter().map(|p| p.problem_id.as_str())) {
            return Err(ValidationError::DuplicateProblem {
                problem_id: duplicate.to_string(),
            }
            .into());
        }

        let teacher = load_requester(&self.repos, &request.teacher_id).await?;
        if !teacher.can_author() {
            return Err(PermissionError::RoleNotAllowed {
                user_id: teacher.id.clone(),
                role: teacher.role.to_string(),
                action: "创建题集",
            }
            .into());
        }

        ensure_title_available(&self.repos, &teacher.id, title.as_str(), None).await?;

        let requested_id = request.id.filter(|id| !id.trim().is_empty());
        if let Some(id) = &requested_id {
            if self.repos.problem_sets.find_by_id(id).await?.is_some() {
                warn!("教师 {} 指定的题集 ID {} 已被占用", teacher.id, id);
                return Err(BusinessError::IdAlreadyExists { id: id.clone() }.into());
            }
        }

        let problem_ids: Vec<String> = request
            .initial_problems
            .iter()
            .map(|p| p.problem_id.clone())
            .collect();
        let problems: HashMap<String, _> = self
            .repos
            .problems
            .find_by_ids(&problem_ids)
            .await?
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();

        let mut problem_set = ProblemSet::new(&teacher.id, title, description);
        if let Some(id) = requested_id {
            problem_set = problem_set.with_id(id);
        }
        problem_set.set_visibility(request.is_shared, request.is_public);

        for initial in request.initial_problems {
            let problem = problems
                .get(&initial.problem_id)
                .ok_or_else(|| AppError::problem_not_found(&initial.problem_id))?;
            let points = initial
                .points
                .unwrap_or_else(|| problem.problem_type().default_points());
            problem_set.add_item(
                initial.problem_id,
                points,
                initial.settings.unwrap_or_default(),
                None,
                self.max_items,
            )?;
        }

        self.repos.problem_sets.save(&problem_set).await?;

        info!(
            "✓ 题集已创建: {} \"{}\" ({} 道题, {} 分)",
            problem_set.id,
            problem_set.title,
            problem_set.item_count(),
            problem_set.total_points()
        );

        Ok(ProblemSetDto::from_entity(&problem_set, &problems))
    }
}
