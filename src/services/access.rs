//! 题集访问策略
//!
//! 所有者/管理员判断集中在这里，各用例只读取计算好的权限位。

use crate::error::{AppError, AppResult};
use crate::models::{ProblemSet, User};
use serde::Serialize;

/// 某用户对某题集的权限
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemSetAccess {
    pub is_owner: bool,
    pub is_admin: bool,
    pub can_view: bool,
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_clone: bool,
    pub can_share: bool,
}

impl ProblemSetAccess {
    /// 计算权限
    ///
    /// - 查看：所有者、管理员，或题集已共享/公开
    /// - 编辑/删除/共享：所有者或管理员
    /// - 复制：所有者，或题集已共享
    pub fn evaluate(problem_set: &ProblemSet, user: &User) -> Self {
        let is_owner = problem_set.is_owned_by(&user.id);
        let is_admin = user.is_admin();
        let manages = is_owner || is_admin;

        Self {
            is_owner,
            is_admin,
            can_view: manages || problem_set.is_shared || problem_set.is_public,
            can_edit: manages,
            can_delete: manages,
            can_clone: is_owner || problem_set.is_shared,
            can_share: manages,
        }
    }

    pub fn require_view(&self, user: &User, problem_set: &ProblemSet) -> AppResult<()> {
        require(self.can_view, user, problem_set, "查看")
    }

    pub fn require_edit(&self, user: &User, problem_set: &ProblemSet) -> AppResult<()> {
        require(self.can_edit, user, problem_set, "编辑")
    }

    pub fn require_delete(&self, user: &User, problem_set: &ProblemSet) -> AppResult<()> {
        require(self.can_delete, user, problem_set, "删除")
    }

    pub fn require_clone(&self, user: &User, problem_set: &ProblemSet) -> AppResult<()> {
        require(self.can_clone, user, problem_set, "复制")
    }

    pub fn require_share(&self, user: &User, problem_set: &ProblemSet) -> AppResult<()> {
        require(self.can_share, user, problem_set, "共享")
    }
}

fn require(allowed: bool, user: &User, problem_set: &ProblemSet, action: &'static str) -> AppResult<()> {
    if allowed {
        Ok(())
    } else {
        tracing::warn!("用户 {} 尝试{}题集 {} 被拒绝", user.id, action, problem_set.id);
        Err(AppError::permission_denied(&user.id, &problem_set.id, action))
    }
}
