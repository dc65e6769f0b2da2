use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 输入校验错误
    #[error("校验错误: {0}")]
    Validation(#[from] ValidationError),
    /// 资源不存在
    #[error("资源不存在: {0}")]
    NotFound(#[from] NotFoundError),
    /// 权限不足
    #[error("权限错误: {0}")]
    Permission(#[from] PermissionError),
    /// 业务逻辑错误
    #[error("业务错误: {0}")]
    Business(#[from] BusinessError),
    /// 仓储（持久化）错误
    #[error("仓储错误: {0}")]
    Repository(#[from] RepositoryError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 输入校验错误
#[derive(Debug, Error)]
pub enum ValidationError {
    /// 必填字段为空
    #[error("字段 {field} 不能为空")]
    Required { field: &'static str },
    /// 字段长度超出范围
    #[error("字段 {field} 长度必须在 {min}-{max} 之间 (实际: {actual})")]
    Length {
        field: &'static str,
        min: usize,
        max: usize,
        actual: usize,
    },
    /// 数值超出范围
    #[error("字段 {field} 取值必须在 {min}-{max} 之间 (实际: {actual})")]
    OutOfRange {
        field: &'static str,
        min: u64,
        max: u64,
        actual: u64,
    },
    /// 请求中出现重复题目
    #[error("题目 {problem_id} 重复出现")]
    DuplicateProblem { problem_id: String },
    /// 排序列表与题集条目不一致
    #[error("排序列表无效: {reason}")]
    InvalidOrder { reason: String },
    /// 题目结构不合法
    #[error("题目 {problem_id} 结构不合法: {reason}")]
    InvalidProblem { problem_id: String, reason: String },
    /// 答案类型与题目类型不符
    #[error("答案类型 {answer_type} 与题目类型 {problem_type} 不匹配")]
    AnswerTypeMismatch {
        problem_type: String,
        answer_type: String,
    },
    /// 没有需要更新的字段
    #[error("没有需要更新的字段")]
    NothingToUpdate,
}

/// 资源不存在错误
#[derive(Debug, Error)]
pub enum NotFoundError {
    #[error("题集 {0}")]
    ProblemSet(String),
    #[error("题目 {0}")]
    Problem(String),
    #[error("用户 {0}")]
    User(String),
    #[error("题集 {problem_set_id} 中的题目 {problem_id}")]
    Item {
        problem_set_id: String,
        problem_id: String,
    },
}

/// 权限错误
#[derive(Debug, Error)]
pub enum PermissionError {
    /// 非所有者且非管理员
    #[error("用户 {user_id} 无权{action}题集 {problem_set_id}")]
    Denied {
        user_id: String,
        problem_set_id: String,
        action: &'static str,
    },
    /// 角色不允许该操作
    #[error("用户 {user_id} 的角色 {role} 不允许{action}")]
    RoleNotAllowed {
        user_id: String,
        role: String,
        action: &'static str,
    },
}

/// 业务逻辑错误
#[derive(Debug, Error)]
pub enum BusinessError {
    /// 同一教师下题集标题重复
    #[error("教师 {teacher_id} 已存在标题为 \"{title}\" 的题集")]
    DuplicateTitle { teacher_id: String, title: String },
    /// 指定的题集 ID 已被占用
    #[error("题集 ID {id} 已存在")]
    IdAlreadyExists { id: String },
    /// 题集条目数超出上限
    #[error("题集最多包含 {max} 道题目 (当前: {current})")]
    TooManyItems { max: usize, current: usize },
    /// 题目已在题集中
    #[error("题目 {problem_id} 已在题集中")]
    ProblemAlreadyInSet { problem_id: String },
    /// 题集仍被进行中的作业引用
    #[error("题集仍被进行中的作业使用: {}", .warnings.join("; "))]
    ActiveAssignments { warnings: Vec<String> },
    /// 人工评分超出满分
    #[error("分数 {score} 超出满分 {max_points}")]
    ScoreExceedsMax { score: u32, max_points: u32 },
}

/// 仓储错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// 存储后端不可用
    #[error("存储不可用: {0}")]
    Unavailable(String),
    /// 序列化失败
    #[error("序列化失败: {source}")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置项取值不合法
    #[error("配置项 {key} 不合法: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

// ========== 从常见错误类型转换 ==========

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Repository(RepositoryError::Serialization { source: err })
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::File(FileError::TomlParseFailed {
            path: String::new(), // TOML错误通常不包含路径信息
            source: err,
        })
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: String::new(),
            source: err,
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建必填字段错误
    pub fn required(field: &'static str) -> Self {
        ValidationError::Required { field }.into()
    }

    /// 创建题集不存在错误
    pub fn problem_set_not_found(id: impl Into<String>) -> Self {
        NotFoundError::ProblemSet(id.into()).into()
    }

    /// 创建题目不存在错误
    pub fn problem_not_found(id: impl Into<String>) -> Self {
        NotFoundError::Problem(id.into()).into()
    }

    /// 创建用户不存在错误
    pub fn user_not_found(id: impl Into<String>) -> Self {
        NotFoundError::User(id.into()).into()
    }

    /// 创建权限拒绝错误
    pub fn permission_denied(
        user_id: impl Into<String>,
        problem_set_id: impl Into<String>,
        action: &'static str,
    ) -> Self {
        PermissionError::Denied {
            user_id: user_id.into(),
            problem_set_id: problem_set_id.into(),
            action,
        }
        .into()
    }

    /// 创建标题重复错误
    pub fn duplicate_title(teacher_id: impl Into<String>, title: impl Into<String>) -> Self {
        BusinessError::DuplicateTitle {
            teacher_id: teacher_id.into(),
            title: title.into(),
        }
        .into()
    }

    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        FileError::ReadFailed {
            path: path.into(),
            source,
        }
        .into()
    }

    /// 是否为资源不存在错误
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }

    /// 是否为权限错误
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, AppError::Permission(_))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_assignments_message_lists_warnings() {
        let err: AppError = BusinessError::ActiveAssignments {
            warnings: vec!["作业 A 进行中".to_string(), "作业 B 进行中".to_string()],
        }
        .into();

        let msg = err.to_string();
        assert!(msg.contains("作业 A 进行中"));
        assert!(msg.contains("作业 B 进行中"));
    }

    #[test]
    fn test_category_helpers() {
        assert!(AppError::problem_set_not_found("ps-1").is_not_found());
        assert!(AppError::permission_denied("u-1", "ps-1", "编辑").is_permission_denied());
        assert!(!AppError::required("title").is_not_found());
    }
}
