use crate::config::Config;
use crate::error::{AppResult, ValidationError};
use crate::models::ProblemSet;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// 分页参数（页码从 1 开始）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl PageRequest {
    pub fn new(page: usize, limit: usize) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    /// 补全默认值并校验范围，返回 `(page, limit)`
    pub fn resolve(&self, config: &Config) -> AppResult<(usize, usize)> {
        let page = self.page.unwrap_or(1);
        let limit = self.limit.unwrap_or(config.default_page_limit);

        if page == 0 {
            return Err(ValidationError::OutOfRange {
                field: "page",
                min: 1,
                max: u64::MAX,
                actual: 0,
            }
            .into());
        }
        if limit == 0 || limit > config.max_page_limit {
            return Err(ValidationError::OutOfRange {
                field: "limit",
                min: 1,
                max: config.max_page_limit as u64,
                actual: limit as u64,
            }
            .into());
        }
        Ok((page, limit))
    }
}

/// 分页信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationDto {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

/// 对已排序的完整结果分页
pub fn paginate<T>(items: Vec<T>, page: usize, limit: usize) -> (Vec<T>, PaginationDto) {
    let total = items.len();
    let total_pages = total.div_ceil(limit);
    let offset = page.saturating_sub(1).saturating_mul(limit);
    let page_items = items.into_iter().skip(offset).take(limit).collect();

    (
        page_items,
        PaginationDto {
            page,
            limit,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        },
    )
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    Title,
    CreatedAt,
    #[default]
    UpdatedAt,
    ItemCount,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// 按排序字段排序题集，相同时按 ID 保证顺序稳定
pub fn sort_problem_sets(sets: &mut [ProblemSet], sort_by: SortBy, order: SortOrder) {
    sets.sort_by(|a, b| {
        let primary = match sort_by {
            SortBy::Title => a.title.as_str().to_lowercase().cmp(&b.title.as_str().to_lowercase()),
            SortBy::CreatedAt => a.created_at.cmp(&b.created_at),
            SortBy::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortBy::ItemCount => a.item_count().cmp(&b.item_count()),
        };
        let primary = match order {
            SortOrder::Asc => primary,
            SortOrder::Desc => primary.reverse(),
        };
        match primary {
            Ordering::Equal => a.id.cmp(&b.id),
            other => other,
        }
    });
}
