use crate::error::{AppResult, ConfigError, FileError};
use crate::models::problem_set::MAX_ITEMS;
use serde::Deserialize;
use std::path::Path;

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 单个题集允许的最大题目数量
    pub max_items_per_set: usize,
    /// 分页默认每页数量
    pub default_page_limit: usize,
    /// 分页每页数量上限
    pub max_page_limit: usize,
    /// 同时批改的提交数量
    pub max_concurrent_gradings: usize,
    /// 题集 TOML 文件存放目录
    pub data_folder: String,
    /// 学生提交 TOML 文件存放目录
    pub submissions_folder: String,
    /// 待人工评分记录文件
    pub review_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_items_per_set: 50,
            default_page_limit: 20,
            max_page_limit: 100,
            max_concurrent_gradings: 8,
            data_folder: "problem_sets".to_string(),
            submissions_folder: "submissions".to_string(),
            review_file: "manual_review.txt".to_string(),
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        let config = Self::default().with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 加载配置：先读取 `PROBLEM_SET_CONFIG` 指向的 TOML 文件（如有），再应用环境变量覆盖
    pub fn load() -> AppResult<Self> {
        let base = match std::env::var("PROBLEM_SET_CONFIG") {
            Ok(path) => Self::from_toml_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        let config = base.with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 从 TOML 文件读取配置，缺省字段使用默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::error::AppError::file_read_failed(path.display().to_string(), e))?;
        toml::from_str(&content).map_err(|source| {
            FileError::TomlParseFailed {
                path: path.display().to_string(),
                source,
            }
            .into()
        })
    }

    fn with_env_overrides(self) -> Self {
        Self {
            max_items_per_set: env_parse("MAX_ITEMS_PER_SET").unwrap_or(self.max_items_per_set),
            default_page_limit: env_parse("DEFAULT_PAGE_LIMIT").unwrap_or(self.default_page_limit),
            max_page_limit: env_parse("MAX_PAGE_LIMIT").unwrap_or(self.max_page_limit),
            max_concurrent_gradings: env_parse("MAX_CONCURRENT_GRADINGS").unwrap_or(self.max_concurrent_gradings),
            data_folder: std::env::var("DATA_FOLDER").unwrap_or(self.data_folder),
            submissions_folder: std::env::var("SUBMISSIONS_FOLDER").unwrap_or(self.submissions_folder),
            review_file: std::env::var("REVIEW_FILE").unwrap_or(self.review_file),
            verbose_logging: env_parse("VERBOSE_LOGGING").unwrap_or(self.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(self.output_log_file),
        }
    }

    /// 单个题集实际生效的条目上限，不超过 `MAX_ITEMS`
    pub fn item_limit(&self) -> usize {
        self.max_items_per_set.min(MAX_ITEMS)
    }

    /// 校验配置项之间的约束
    pub fn validate(&self) -> AppResult<()> {
        if self.max_items_per_set == 0 || self.max_items_per_set > MAX_ITEMS {
            return Err(ConfigError::InvalidValue {
                key: "max_items_per_set",
                reason: format!("必须在 1-{} 之间 (当前: {})", MAX_ITEMS, self.max_items_per_set),
            }
            .into());
        }
        if self.max_concurrent_gradings == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_concurrent_gradings",
                reason: "必须大于 0".to_string(),
            }
            .into());
        }
        if self.max_page_limit == 0 || self.default_page_limit > self.max_page_limit {
            return Err(ConfigError::InvalidValue {
                key: "default_page_limit",
                reason: format!(
                    "默认每页数量 {} 必须在 1-{} 之间",
                    self.default_page_limit, self.max_page_limit
                ),
            }
            .into());
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
