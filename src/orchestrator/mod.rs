//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，不包含题集业务规则。
//!
//! ### `batch_processor` - 应用入口与批量批改
//! - 管理应用生命周期（初始化、运行）
//! - 批量加载提交（Vec<Submission>）
//! - 控制并发数量（Semaphore）
//! - 输出全局统计信息
//!
//! ### `import_processor` - 单个题集文件导入
//! - 保存教师与题目
//! - 通过用例创建题集
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<Submission>)
//!     ↓
//! workflow::SubmissionFlow (处理单份提交)
//!     ↓
//! services (能力层：grading / review_writer)
//!
//! import_processor (处理单个 ProblemSetDocument)
//!     ↓
//! use_cases (CreateProblemSetUseCase)
//!     ↓
//! repositories
//! ```

pub mod batch_processor;
pub mod import_processor;

pub use batch_processor::{App, BulkGradingProcessor, GradingStats};
pub use import_processor::{import_document, ImportOutcome, ProblemStats};
