pub mod access;
pub mod grading;
pub mod review_writer;

pub use access::ProblemSetAccess;
pub use grading::{AutoGrader, GradingPolicy};
pub use review_writer::ReviewWriter;
