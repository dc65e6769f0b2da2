use crate::dto::{GetStatisticsRequest, ProblemSetStatisticsDto};
use crate::error::AppResult;
use crate::infrastructure::Repositories;
use crate::models::{Problem, ProblemSet, ProblemType};
use crate::services::ProblemSetAccess;
use crate::use_cases::{load_problem_map, load_problem_set, load_requester};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// 题集统计
pub struct GetProblemSetStatisticsUseCase {
    repos: Repositories,
}

impl GetProblemSetStatisticsUseCase {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub async fn execute(&self, request: GetStatisticsRequest) -> AppResult<ProblemSetStatisticsDto> {
        debug!("统计题集 {} (请求者 {})", request.problem_set_id, request.requester_id);

        let requester = load_requester(&self.repos, &request.requester_id).await?;
        let problem_set = load_problem_set(&self.repos, &request.problem_set_id).await?;
        ProblemSetAccess::evaluate(&problem_set, &requester).require_view(&requester, &problem_set)?;

        let problems = load_problem_map(&self.repos, &problem_set).await?;
        let assignments = self
            .repos
            .assignments
            .find_by_problem_set_id(&problem_set.id)
            .await?;

        let mut stats = compute_statistics(&problem_set, &problems);
        stats.assignment_count = assignments.len();
        stats.active_assignment_count = assignments.iter().filter(|a| a.is_active()).count();
        Ok(stats)
    }
}

/// 只依据题集与题目计算，作业相关计数由调用方填写
fn compute_statistics(problem_set: &ProblemSet, problems: &HashMap<String, Problem>) -> ProblemSetStatisticsDto {
    let item_count = problem_set.item_count();
    let total_points = problem_set.total_points();

    let mut type_distribution: BTreeMap<ProblemType, usize> = BTreeMap::new();
    let mut auto_gradable_count = 0;
    let mut manual_grading_count = 0;
    for item in problem_set.ordered_items() {
        let Some(problem) = problems.get(&item.problem_id) else {
            continue;
        };
        let problem_type = problem.problem_type();
        *type_distribution.entry(problem_type).or_default() += 1;
        if problem_type.is_auto_gradable() {
            auto_gradable_count += 1;
        } else {
            manual_grading_count += 1;
        }
    }

    let average_points = if item_count == 0 {
        0.0
    } else {
        (f64::from(total_points) / item_count as f64 * 100.0).round() / 100.0
    };

    ProblemSetStatisticsDto {
        problem_set_id: problem_set.id.clone(),
        item_count,
        total_points,
        estimated_time_minutes: problem_set.estimated_time_minutes(problems),
        average_points,
        type_distribution,
        auto_gradable_count,
        manual_grading_count,
        required_count: problem_set.items.iter().filter(|i| i.settings.is_required).count(),
        assignment_count: 0,
        active_assignment_count: 0,
    }
}
