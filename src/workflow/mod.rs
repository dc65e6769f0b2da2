pub mod grading_ctx;
pub mod submission_flow;

pub use grading_ctx::GradingCtx;
pub use submission_flow::SubmissionFlow;
