//! 内存仓储 - 基础设施层
//!
//! 持有数据（`RwLock<HashMap>`），只暴露仓储接口规定的能力

use crate::error::AppResult;
use crate::models::{Assignment, Problem, ProblemSet, User};
use crate::repositories::{AssignmentRepository, ProblemRepository, ProblemSetRepository, UserRepository};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// 内存题集仓储
#[derive(Default)]
pub struct InMemoryProblemSetRepository {
    sets: RwLock<HashMap<String, ProblemSet>>,
}

impl InMemoryProblemSetRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sets.read().await.len()
    }

    async fn filter(&self, predicate: impl Fn(&ProblemSet) -> bool) -> Vec<ProblemSet> {
        let sets = self.sets.read().await;
        let mut found: Vec<ProblemSet> = sets.values().filter(|s| predicate(s)).cloned().collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        found
    }
}

#[async_trait]
impl ProblemSetRepository for InMemoryProblemSetRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<ProblemSet>> {
        Ok(self.sets.read().await.get(id).cloned())
    }

    async fn save(&self, problem_set: &ProblemSet) -> AppResult<()> {
        self.sets
            .write()
            .await
            .insert(problem_set.id.clone(), problem_set.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        Ok(self.sets.write().await.remove(id).is_some())
    }

    async fn find_by_teacher_id(&self, teacher_id: &str) -> AppResult<Vec<ProblemSet>> {
        Ok(self.filter(|s| s.teacher_id == teacher_id).await)
    }

    async fn find_by_teacher_id_and_title(
        &self,
        teacher_id: &str,
        title: &str,
    ) -> AppResult<Option<ProblemSet>> {
        let sets = self.sets.read().await;
        Ok(sets
            .values()
            .find(|s| s.teacher_id == teacher_id && s.title.as_str() == title)
            .cloned())
    }

    async fn find_shared_problem_sets_excluding_teacher(
        &self,
        teacher_id: &str,
    ) -> AppResult<Vec<ProblemSet>> {
        Ok(self.filter(|s| s.is_shared && s.teacher_id != teacher_id).await)
    }

    async fn find_public_problem_sets(&self) -> AppResult<Vec<ProblemSet>> {
        Ok(self.filter(|s| s.is_public).await)
    }

    async fn find_shared_problem_sets(&self) -> AppResult<Vec<ProblemSet>> {
        Ok(self.filter(|s| s.is_shared).await)
    }
}

/// 内存题目仓储
#[derive(Default)]
pub struct InMemoryProblemRepository {
    problems: RwLock<HashMap<String, Problem>>,
}

impl InMemoryProblemRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProblemRepository for InMemoryProblemRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Problem>> {
        Ok(self.problems.read().await.get(id).cloned())
    }

    async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<Problem>> {
        let problems = self.problems.read().await;
        Ok(ids.iter().filter_map(|id| problems.get(id).cloned()).collect())
    }

    async fn find_by_teacher_id(&self, teacher_id: &str) -> AppResult<Vec<Problem>> {
        let problems = self.problems.read().await;
        Ok(problems
            .values()
            .filter(|p| p.teacher_id == teacher_id)
            .cloned()
            .collect())
    }

    async fn save(&self, problem: &Problem) -> AppResult<()> {
        self.problems
            .write()
            .await
            .insert(problem.id.clone(), problem.clone());
        Ok(())
    }
}

/// 内存用户仓储
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn save(&self, user: &User) -> AppResult<()> {
        self.users.write().await.insert(user.id.clone(), user.clone());
        Ok(())
    }
}

/// 内存作业仓储
#[derive(Default)]
pub struct InMemoryAssignmentRepository {
    assignments: RwLock<HashMap<String, Assignment>>,
}

impl InMemoryAssignmentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AssignmentRepository for InMemoryAssignmentRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Assignment>> {
        Ok(self.assignments.read().await.get(id).cloned())
    }

    async fn find_by_problem_set_id(&self, problem_set_id: &str) -> AppResult<Vec<Assignment>> {
        let assignments = self.assignments.read().await;
        let mut found: Vec<Assignment> = assignments
            .values()
            .filter(|a| a.problem_set_id == problem_set_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(found)
    }

    async fn save(&self, assignment: &Assignment) -> AppResult<()> {
        self.assignments
            .write()
            .await
            .insert(assignment.id.clone(), assignment.clone());
        Ok(())
    }
}
