pub mod pagination;
pub mod problem_set_dto;

pub use pagination::{paginate, sort_problem_sets, PageRequest, PaginationDto, SortBy, SortOrder};
pub use problem_set_dto::*;
