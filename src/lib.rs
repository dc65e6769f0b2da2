//! # Problem Set Manager
//!
//! 题集管理与自动批改的应用层核心
//!
//! ## 架构设计
//!
//! 本系统采用分层架构，依赖只能向下：
//!
//! ### ① 模型层（Models）
//! - `models/` - 实体与值对象（`ProblemSet`、`ProblemSetTitle`、`Problem`、`User`、`Assignment`）
//! - `models/loaders` - 题集导入文件与学生提交的 TOML 加载
//!
//! ### ② 仓储与基础设施（Repositories / Infrastructure）
//! - `repositories/` - 仓储接口（端口）
//! - `infrastructure/` - 内存实现，`Repositories` 汇总全部仓储
//!
//! ### ③ 业务能力层（Services）
//! - `AutoGrader` - 各题型统一评分
//! - `ProblemSetAccess` - 所有者/管理员权限判断
//! - `ReviewWriter` - 写人工评分队列
//!
//! ### ④ 用例层（Use Cases）与 DTO
//! - `use_cases/` - 创建、更新、删除、复制、共享、列表、搜索、条目增删与排序、权限校验、统计
//! - `dto/` - 请求/响应结构与分页
//!
//! ### ⑤ 流程层与编排层（Workflow / Orchestration）
//! - `workflow/` - 一份提交的批改流程
//! - `orchestrator/` - 题集导入与并发批量批改

pub mod config;
pub mod dto;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod repositories;
pub mod services;
pub mod use_cases;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::Repositories;
pub use models::{Problem, ProblemSet, ProblemSetItem, User};
pub use orchestrator::{App, BulkGradingProcessor};
pub use services::AutoGrader;
pub use use_cases::ProblemSetUseCases;
pub use workflow::{GradingCtx, SubmissionFlow};
