pub mod in_memory;

pub use in_memory::{
    InMemoryAssignmentRepository, InMemoryProblemRepository, InMemoryProblemSetRepository,
    InMemoryUserRepository,
};

use crate::repositories::{AssignmentRepository, ProblemRepository, ProblemSetRepository, UserRepository};
use std::sync::Arc;

/// 仓储集合，用例从这里取依赖
#[derive(Clone)]
pub struct Repositories {
    pub problem_sets: Arc<dyn ProblemSetRepository>,
    pub problems: Arc<dyn ProblemRepository>,
    pub users: Arc<dyn UserRepository>,
    pub assignments: Arc<dyn AssignmentRepository>,
}

impl Repositories {
    /// 全部使用内存实现
    pub fn in_memory() -> Self {
        Self {
            problem_sets: Arc::new(InMemoryProblemSetRepository::new()),
            problems: Arc::new(InMemoryProblemRepository::new()),
            users: Arc::new(InMemoryUserRepository::new()),
            assignments: Arc::new(InMemoryAssignmentRepository::new()),
        }
    }
}
