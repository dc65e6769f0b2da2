pub mod assignment;
pub mod document;
pub mod grading;
pub mod loaders;
pub mod problem;
pub mod problem_set;
pub mod user;

pub use assignment::{Assignment, AssignmentStatus};
pub use document::{DocumentProblem, ProblemSetDocument};
pub use grading::{GradingResult, StudentAnswer, Submission, SubmissionResult};
pub use loaders::{load_all_problem_set_documents, load_all_submissions, load_problem_set_document};
pub use problem::{Blank, Choice, MatchingPair, Problem, ProblemContent, ProblemType};
pub use problem_set::{ItemSettings, ProblemSet, ProblemSetDescription, ProblemSetItem, ProblemSetTitle};
pub use user::{User, UserRole};
