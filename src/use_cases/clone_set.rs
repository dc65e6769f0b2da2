use crate::dto::{CloneProblemSetRequest, CloneProblemSetResponse, ProblemSetDto};
use crate::error::{AppResult, PermissionError};
use crate::infrastructure::Repositories;
use crate::models::problem_set::MAX_TITLE_LEN;
use crate::models::ProblemSetTitle;
use crate::services::ProblemSetAccess;
use crate::use_cases::{ensure_title_available, load_problem_map, load_problem_set, load_requester};
use std::collections::HashSet;
use tracing::{debug, info};

const COPY_SUFFIX: &str = "（副本）";

/// 复制题集到请求者名下
pub struct CloneProblemSetUseCase {
    repos: Repositories,
}

impl CloneProblemSetUseCase {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub async fn execute(&self, request: CloneProblemSetRequest) -> AppResult<CloneProblemSetResponse> {
        debug!(
            "复制题集 {} (请求者 {})",
            request.source_problem_set_id, request.requester_id
        );

        let requester = load_requester(&self.repos, &request.requester_id).await?;
        let source = load_problem_set(&self.repos, &request.source_problem_set_id).await?;
        ProblemSetAccess::evaluate(&source, &requester).require_clone(&requester, &source)?;
        if !requester.can_author() {
            return Err(PermissionError::RoleNotAllowed {
                user_id: requester.id.clone(),
                role: requester.role.to_string(),
                action: "复制题集",
            }
            .into());
        }

        let title = match request.new_title.as_deref().filter(|t| !t.trim().is_empty()) {
            Some(explicit) => {
                let title = ProblemSetTitle::new(explicit)?;
                ensure_title_available(&self.repos, &requester.id, title.as_str(), None).await?;
                title
            }
            None => self.default_copy_title(&requester.id, source.title.as_str()).await?,
        };

        let cloned = source.clone_for(&requester.id, title);
        self.repos.problem_sets.save(&cloned).await?;
        info!(
            "✓ 题集已复制: {} -> {} \"{}\" (教师 {})",
            source.id, cloned.id, cloned.title, requester.id
        );

        let problems = load_problem_map(&self.repos, &cloned).await?;
        Ok(CloneProblemSetResponse {
            problem_set: ProblemSetDto::from_entity(&cloned, &problems),
            source_problem_set_id: source.id,
        })
    }

    /// `"<标题>（副本）"`，与已有标题冲突时依次追加 ` 2`、` 3` …
    async fn default_copy_title(&self, teacher_id: &str, source_title: &str) -> AppResult<ProblemSetTitle> {
        let taken: HashSet<String> = self
            .repos
            .problem_sets
            .find_by_teacher_id(teacher_id)
            .await?
            .into_iter()
            .map(|s| s.title.as_str().to_string())
            .collect();

        let mut attempt = 1usize;
        loop {
            let candidate = copy_title(source_title, attempt)?;
            if !taken.contains(candidate.as_str()) {
                return Ok(candidate);
            }
            attempt += 1;
        }
    }
}

fn copy_title(source_title: &str, attempt: usize) -> AppResult<ProblemSetTitle> {
    let suffix = if attempt == 1 {
        COPY_SUFFIX.to_string()
    } else {
        format!("{} {}", COPY_SUFFIX, attempt)
    };
    let room = MAX_TITLE_LEN.saturating_sub(suffix.chars().count());
    let base: String = source_title.chars().take(room).collect();
    ProblemSetTitle::new(&format!("{}{}", base.trim_end(), suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_title_suffixes() {
        assert_eq!(copy_title("期中复习", 1).unwrap().as_str(), "期中复习（副本）");
        assert_eq!(copy_title("期中复习", 3).unwrap().as_str(), "期中复习（副本） 3");
    }

    #[test]
    fn test_copy_title_stays_within_limit() {
        let long = "题".repeat(MAX_TITLE_LEN);
        let title = copy_title(&long, 12).unwrap();
        assert_eq!(title.as_str().chars().count(), MAX_TITLE_LEN);
        assert!(title.as_str().ends_with("（副本） 12"));
    }
}
