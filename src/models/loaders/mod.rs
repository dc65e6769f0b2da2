pub mod toml_loader;

pub use toml_loader::{load_all_problem_set_documents, load_all_submissions, load_problem_set_document};
