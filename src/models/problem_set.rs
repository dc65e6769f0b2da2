//! 题集实体与值对象
//!
//! 题集内条目的 `order_index` 在任何修改之后都保持为 `0..len` 连续序列。

use crate::error::{AppResult, BusinessError, NotFoundError, ValidationError};
use crate::models::problem::Problem;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use uuid::Uuid;

/// 题集默认最大题目数
pub const MAX_ITEMS: usize = 50;
pub const MAX_TITLE_LEN: usize = 255;
pub const MAX_DESCRIPTION_LEN: usize = 1000;
pub const MAX_ITEM_POINTS: u32 = 1000;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// 题集标题（连续空白折叠为单个空格）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProblemSetTitle(String);

impl ProblemSetTitle {
    pub fn new(raw: &str) -> AppResult<Self> {
        let normalized = WHITESPACE_RUN.replace_all(raw.trim(), " ").into_owned();
        if normalized.is_empty() {
            return Err(ValidationError::Required { field: "title" }.into());
        }
        let len = normalized.chars().count();
        if len > MAX_TITLE_LEN {
            return Err(ValidationError::Length {
                field: "title",
                min: 1,
                max: MAX_TITLE_LEN,
                actual: len,
            }
            .into());
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ProblemSetTitle {
    type Error = crate::error::AppError;

    fn try_from(value: String) -> AppResult<Self> {
        Self::new(&value)
    }
}

impl From<ProblemSetTitle> for String {
    fn from(value: ProblemSetTitle) -> Self {
        value.0
    }
}

impl std::fmt::Display for ProblemSetTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 题集描述
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProblemSetDescription(String);

impl ProblemSetDescription {
    /// 空白描述视为未设置，返回 `None`
    pub fn parse(raw: Option<&str>) -> AppResult<Option<Self>> {
        let Some(trimmed) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(None);
        };
        let len = trimmed.chars().count();
        if len > MAX_DESCRIPTION_LEN {
            return Err(ValidationError::Length {
                field: "description",
                min: 0,
                max: MAX_DESCRIPTION_LEN,
                actual: len,
            }
            .into());
        }
        Ok(Some(Self(trimmed.to_string())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ProblemSetDescription {
    type Error = crate::error::AppError;

    fn try_from(value: String) -> AppResult<Self> {
        Self::parse(Some(&value))?.ok_or_else(|| ValidationError::Required { field: "description" }.into())
    }
}

impl From<ProblemSetDescription> for String {
    fn from(value: ProblemSetDescription) -> Self {
        value.0
    }
}

/// 题集条目设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ItemSettings {
    pub is_required: bool,
    pub allow_partial_credit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit_minutes: Option<u32>,
}

impl Default for ItemSettings {
    fn default() -> Self {
        Self {
            is_required: true,
            allow_partial_credit: true,
            time_limit_minutes: None,
        }
    }
}

/// 题集条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemSetItem {
    pub id: String,
    pub problem_id: String,
    pub order_index: usize,
    pub points: u32,
    pub settings: ItemSettings,
}

/// 题集
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemSet {
    pub id: String,
    pub title: ProblemSetTitle,
    pub description: Option<ProblemSetDescription>,
    pub teacher_id: String,
    pub items: Vec<ProblemSetItem>,
    pub is_public: bool,
    pub is_shared: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProblemSet {
    /// 创建空题集
    pub fn new(
        teacher_id: impl Into<String>,
        title: ProblemSetTitle,
        description: Option<ProblemSetDescription>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            description,
            teacher_id: teacher_id.into(),
            items: Vec::new(),
            is_public: false,
            is_shared: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// 指定 ID（导入已有数据时使用）
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.teacher_id == user_id
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn total_points(&self) -> u32 {
        self.items.iter().map(|item| item.points).sum()
    }

    pub fn contains_problem(&self, problem_id: &str) -> bool {
        self.items.iter().any(|item| item.problem_id == problem_id)
    }

    pub fn item_for_problem(&self, problem_id: &str) -> Option<&ProblemSetItem> {
        self.items.iter().find(|item| item.problem_id == problem_id)
    }

    /// 按 `order_index` 升序的条目迭代（内部已保持有序）
    pub fn ordered_items(&self) -> impl Iterator<Item = &ProblemSetItem> {
        self.items.iter()
    }

    /// 添加题目
    ///
    /// # 参数
    /// - `problem_id`: 题目ID
    /// - `points`: 分值（1-1000）
    /// - `settings`: 条目设置
    /// - `position`: 插入位置，`None` 或超出末尾时追加
    /// - `max_items`: 题目数量上限
    pub fn add_item(
        &mut self,
        problem_id: impl Into<String>,
        points: u32,
        settings: ItemSettings,
        position: Option<usize>,
        max_items: usize,
    ) -> AppResult<&ProblemSetItem> {
        let problem_id = problem_id.into();
        if self.contains_problem(&problem_id) {
            return Err(BusinessError::ProblemAlreadyInSet { problem_id }.into());
        }
        if self.items.len() >= max_items {
            return Err(BusinessError::TooManyItems {
                max: max_items,
                current: self.items.len(),
            }
            .into());
        }
        validate_points(points)?;

        let index = position.unwrap_or(self.items.len()).min(self.items.len());
        self.items.insert(
            index,
            ProblemSetItem {
                id: Uuid::new_v4().to_string(),
                problem_id,
                order_index: index,
                points,
                settings,
            },
        );
        self.reindex();
        self.touch();
        Ok(&self.items[index])
    }

    /// 移除题目，之后的条目序号前移
    pub fn remove_item(&mut self, problem_id: &str) -> AppResult<ProblemSetItem> {
        let index = self
            .items
            .iter()
            .position(|item| item.problem_id == problem_id)
            .ok_or_else(|| NotFoundError::Item {
                problem_set_id: self.id.clone(),
                problem_id: problem_id.to_string(),
            })?;

        let removed = self.items.remove(index);
        self.reindex();
        self.touch();
        Ok(removed)
    }

    /// 按给定条目ID顺序重排
    ///
    /// `item_ids` 必须恰好是当前全部条目ID的一个排列。
    pub fn reorder_items(&mut self, item_ids: &[String]) -> AppResult<()> {
        if item_ids.len() != self.items.len() {
            return Err(ValidationError::InvalidOrder {
                reason: format!("需要 {} 个条目ID, 实际 {} 个", self.items.len(), item_ids.len()),
            }
            .into());
        }

        let mut by_id: HashMap<&str, &ProblemSetItem> =
            self.items.iter().map(|item| (item.id.as_str(), item)).collect();
        let mut reordered = Vec::with_capacity(self.items.len());
        for id in item_ids {
            match by_id.remove(id.as_str()) {
                Some(item) => reordered.push(item.clone()),
                None => {
                    return Err(ValidationError::InvalidOrder {
                        reason: format!("条目 {} 不存在或重复", id),
                    }
                    .into())
                }
            }
        }

        self.items = reordered;
        self.reindex();
        self.touch();
        Ok(())
    }

    pub fn rename(&mut self, title: ProblemSetTitle) {
        self.title = title;
        self.touch();
    }

    pub fn update_description(&mut self, description: Option<ProblemSetDescription>) {
        self.description = description;
        self.touch();
    }

    /// 设置共享/公开状态
    ///
    /// 公开的题集一定是共享的：设置公开会同时共享，取消共享会同时取消公开。
    pub fn set_visibility(&mut self, is_shared: bool, is_public: bool) {
        self.is_public = is_public;
        self.is_shared = is_shared || is_public;
        self.touch();
    }

    /// 为另一位教师复制题集（新ID、新条目ID、私有且不共享）
    pub fn clone_for(&self, teacher_id: impl Into<String>, title: ProblemSetTitle) -> ProblemSet {
        let mut cloned = ProblemSet::new(teacher_id, title, self.description.clone());
        cloned.items = self
            .items
            .iter()
            .map(|item| ProblemSetItem {
                id: Uuid::new_v4().to_string(),
                ..item.clone()
            })
            .collect();
        cloned
    }

    /// 预计完成时间（分钟）：条目设置了时限则取时限，否则按题型默认值；题目已不存在的条目不计
    pub fn estimated_time_minutes(&self, problems: &HashMap<String, Problem>) -> u32 {
        self.items
            .iter()
            .map(|item| {
                item.settings.time_limit_minutes.unwrap_or_else(|| {
                    problems
                        .get(&item.problem_id)
                        .map_or(0, |p| p.problem_type().estimated_minutes())
                })
            })
            .sum()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    fn reindex(&mut self) {
        for (index, item) in self.items.iter_mut().enumerate() {
            item.order_index = index;
        }
    }
}

/// 校验条目分值
pub fn validate_points(points: u32) -> AppResult<()> {
    if points == 0 || points > MAX_ITEM_POINTS {
        return Err(ValidationError::OutOfRange {
            field: "points",
            min: 1,
            max: u64::from(MAX_ITEM_POINTS),
            actual: u64::from(points),
        }
        .into());
    }
    Ok(())
}

/// 检查条目ID集合是否无重复（用于校验请求）
pub fn has_duplicates<'a>(ids: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let mut seen = HashSet::new();
    ids.into_iter().find(|id| !seen.insert(*id))
}
