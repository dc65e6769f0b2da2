//! 题集相关的请求/响应结构
//!
//! 所有结构按 camelCase 序列化，与前端/API 边界的 JSON 保持一致。

use crate::dto::pagination::{PageRequest, PaginationDto, SortBy, SortOrder};
use crate::models::{ItemSettings, Problem, ProblemSet, ProblemSetItem, ProblemType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

// ========== 通用输出 ==========

/// 题集概要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemSetDto {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub teacher_id: String,
    pub item_count: usize,
    pub total_points: u32,
    pub estimated_time_minutes: u32,
    pub is_public: bool,
    pub is_shared: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProblemSetDto {
    /// `problems` 用于计算预计用时，缺失的题目按默认值估算
    pub fn from_entity(problem_set: &ProblemSet, problems: &HashMap<String, Problem>) -> Self {
        Self {
            id: problem_set.id.clone(),
            title: problem_set.title.to_string(),
            description: problem_set.description.as_ref().map(|d| d.as_str().to_string()),
            teacher_id: problem_set.teacher_id.clone(),
            item_count: problem_set.item_count(),
            total_points: problem_set.total_points(),
            estimated_time_minutes: problem_set.estimated_time_minutes(problems),
            is_public: problem_set.is_public,
            is_shared: problem_set.is_shared,
            created_at: problem_set.created_at,
            updated_at: problem_set.updated_at,
        }
    }
}

/// 题集条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemSetItemDto {
    pub id: String,
    pub problem_id: String,
    pub order_index: usize,
    pub points: u32,
    pub settings: ItemSettings,
}

impl From<&ProblemSetItem> for ProblemSetItemDto {
    fn from(item: &ProblemSetItem) -> Self {
        Self {
            id: item.id.clone(),
            problem_id: item.problem_id.clone(),
            order_index: item.order_index,
            points: item.points,
            settings: item.settings.clone(),
        }
    }
}

/// 条目 + 题目摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemSetItemDetailDto {
    #[serde(flatten)]
    pub item: ProblemSetItemDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem_type: Option<ProblemType>,
}

// ========== 创建 ==========

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialProblemDto {
    pub problem_id: String,
    #[serde(default)]
    pub points: Option<u32>,
    #[serde(default)]
    pub settings: Option<ItemSettings>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProblemSetRequest {
    pub teacher_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub is_shared: bool,
    #[serde(default)]
    pub initial_problems: Vec<InitialProblemDto>,
    /// 导入时可指定ID
    #[serde(default)]
    pub id: Option<String>,
}

pub type CreateProblemSetResponse = ProblemSetDto;

// ========== 查询详情 ==========

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetProblemSetRequest {
    pub problem_set_id: String,
    pub requester_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemSetDetailDto {
    #[serde(flatten)]
    pub summary: ProblemSetDto,
    pub items: Vec<ProblemSetItemDetailDto>,
    pub is_owner: bool,
}

// ========== 更新 ==========

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProblemSetRequest {
    pub problem_set_id: String,
    pub requester_id: String,
    #[serde(default)]
    pub title: Option<String>,
    /// `Some("")` 表示清空描述
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: Option<bool>,
    #[serde(default)]
    pub is_shared: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProblemSetResponse {
    #[serde(flatten)]
    pub problem_set: ProblemSetDto,
    pub updated_fields: Vec<String>,
}

// ========== 删除 ==========

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteProblemSetRequest {
    pub problem_set_id: String,
    pub requester_id: String,
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteProblemSetResponse {
    pub deleted_id: String,
    pub warnings: Vec<String>,
    pub affected_assignment_ids: Vec<String>,
}

// ========== 复制 ==========

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloneProblemSetRequest {
    pub source_problem_set_id: String,
    pub requester_id: String,
    #[serde(default)]
    pub new_title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloneProblemSetResponse {
    #[serde(flatten)]
    pub problem_set: ProblemSetDto,
    pub source_problem_set_id: String,
}

// ========== 共享 ==========

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareProblemSetRequest {
    pub problem_set_id: String,
    pub requester_id: String,
    pub is_shared: bool,
    #[serde(default)]
    pub is_public: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareProblemSetResponse {
    pub problem_set_id: String,
    pub is_shared: bool,
    pub is_public: bool,
    pub updated_at: DateTime<Utc>,
}

// ========== 列表 / 搜索 ==========

/// 列表范围
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListScope {
    /// 自己（或 `teacher_id` 指定教师）的题集
    #[default]
    Own,
    /// 其他教师共享的题集
    Shared,
    /// 公开题集
    Public,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProblemSetsRequest {
    pub requester_id: String,
    #[serde(default)]
    pub scope: ListScope,
    /// 仅管理员可以查看其他教师的题集
    #[serde(default)]
    pub teacher_id: Option<String>,
    #[serde(default, flatten)]
    pub page: PageRequest,
    #[serde(default)]
    pub sort_by: SortBy,
    #[serde(default)]
    pub sort_order: SortOrder,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchProblemSetsRequest {
    pub requester_id: String,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub teacher_id: Option<String>,
    #[serde(default)]
    pub is_public: Option<bool>,
    #[serde(default)]
    pub is_shared: Option<bool>,
    #[serde(default)]
    pub min_items: Option<usize>,
    #[serde(default)]
    pub max_items: Option<usize>,
    #[serde(default, flatten)]
    pub page: PageRequest,
    #[serde(default)]
    pub sort_by: SortBy,
    #[serde(default)]
    pub sort_order: SortOrder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemSetListResponse {
    pub problem_sets: Vec<ProblemSetDto>,
    pub pagination: PaginationDto,
}

// ========== 条目操作 ==========

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddProblemToSetRequest {
    pub problem_set_id: String,
    pub requester_id: String,
    pub problem_id: String,
    #[serde(default)]
    pub points: Option<u32>,
    /// 插入位置（从 0 开始），缺省追加到末尾
    #[serde(default)]
    pub position: Option<usize>,
    #[serde(default)]
    pub settings: Option<ItemSettings>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddProblemToSetResponse {
    pub problem_set_id: String,
    pub item: ProblemSetItemDto,
    pub item_count: usize,
    pub total_points: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveProblemFromSetRequest {
    pub problem_set_id: String,
    pub requester_id: String,
    pub problem_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveProblemFromSetResponse {
    pub problem_set_id: String,
    pub removed_problem_id: String,
    pub item_count: usize,
    pub total_points: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderProblemSetItemsRequest {
    pub problem_set_id: String,
    pub requester_id: String,
    /// 新顺序下的全部条目ID
    pub item_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderProblemSetItemsResponse {
    pub problem_set_id: String,
    pub items: Vec<ProblemSetItemDto>,
}

// ========== 权限 ==========

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateOwnershipRequest {
    pub problem_set_id: String,
    pub requester_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateOwnershipResponse {
    pub problem_set_id: String,
    pub owner_id: String,
    pub is_owner: bool,
    pub is_admin: bool,
    pub can_view: bool,
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_clone: bool,
    pub can_share: bool,
}

// ========== 统计 ==========

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetStatisticsRequest {
    pub problem_set_id: String,
    pub requester_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemSetStatisticsDto {
    pub problem_set_id: String,
    pub item_count: usize,
    pub total_points: u32,
    pub estimated_time_minutes: u32,
    pub average_points: f64,
    pub type_distribution: BTreeMap<ProblemType, usize>,
    pub auto_gradable_count: usize,
    pub manual_grading_count: usize,
    pub required_count: usize,
    pub assignment_count: usize,
    pub active_assignment_count: usize,
}
