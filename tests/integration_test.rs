use problem_set_manager::config::Config;
use problem_set_manager::dto::*;
use problem_set_manager::error::{AppError, BusinessError, ValidationError};
use problem_set_manager::models::{
    Assignment, AssignmentStatus, Choice, Problem, ProblemContent, StudentAnswer, Submission, User, UserRole,
};
use problem_set_manager::services::{AutoGrader, GradingPolicy};
use problem_set_manager::{App, BulkGradingProcessor, ProblemSetUseCases, Repositories};
use std::collections::HashMap;
use tokio_test::{assert_err, assert_ok};

fn choice(id: &str, text: &str) -> Choice {
    Choice {
        id: id.to_string(),
        text: text.to_string(),
    }
}

fn multiple_choice(id: &str) -> Problem {
    Problem::new(
        id,
        "t-1",
        "下列哪些是质数",
        ProblemContent::MultipleChoice {
            choices: vec![choice("a", "2"), choice("b", "4"), choice("c", "5")],
            correct_choice_ids: vec!["a".into(), "c".into()],
            allow_multiple: true,
        },
    )
}

async fn setup() -> (Repositories, ProblemSetUseCases) {
    let repos = Repositories::in_memory();
    for user in [
        User::new("t-1", "王老师", UserRole::Teacher),
        User::new("t-2", "李老师", UserRole::Teacher),
        User::new("a-1", "管理员", UserRole::Admin),
        User::new("s-1", "小明", UserRole::Student),
    ] {
        repos.users.save(&user).await.unwrap();
    }

    let problems = [
        multiple_choice("p-mc"),
        Problem::new("p-tf", "t-1", "水在 100℃ 沸腾", ProblemContent::TrueFalse { correct_answer: true }),
        Problem::new(
            "p-sa",
            "t-1",
            "中国的首都",
            ProblemContent::ShortAnswer {
                accepted_answers: vec!["北京".into(), "Beijing".into()],
                case_sensitive: false,
            },
        ),
        Problem::new(
            "p-essay",
            "t-1",
            "谈谈你对环保的看法",
            ProblemContent::LongAnswer {
                rubric: None,
                max_length: Some(500),
            },
        ),
        Problem::new(
            "p-order",
            "t-1",
            "按从小到大排序",
            ProblemContent::Ordering {
                items: vec![choice("x", "1"), choice("y", "2"), choice("z", "3"), choice("w", "4")],
                correct_order: vec!["x".into(), "y".into(), "z".into(), "w".into()],
            },
        ),
    ];
    for problem in &problems {
        repos.problems.save(problem).await.unwrap();
    }

    let use_cases = ProblemSetUseCases::new(repos.clone(), &Config::default());
    (repos, use_cases)
}

fn initial(ids: &[&str]) -> Vec<InitialProblemDto> {
    ids.iter()
        .map(|id| InitialProblemDto {
            problem_id: id.to_string(),
            ..Default::default()
        })
        .collect()
}

async fn create_set(use_cases: &ProblemSetUseCases, teacher: &str, title: &str, problems: &[&str]) -> ProblemSetDto {
    use_cases
        .create
        .execute(CreateProblemSetRequest {
            teacher_id: teacher.into(),
            title: title.into(),
            initial_problems: initial(problems),
            ..Default::default()
        })
        .await
        .unwrap()
}

async fn share(use_cases: &ProblemSetUseCases, id: &str, owner: &str, is_shared: bool, is_public: Option<bool>) {
    use_cases
        .share
        .execute(ShareProblemSetRequest {
            problem_set_id: id.into(),
            requester_id: owner.into(),
            is_shared,
            is_public,
        })
        .await
        .unwrap();
}

// ========== 创建 ==========

#[tokio::test]
async fn test_create_item_count_matches_initial_problems() {
    let (_, use_cases) = setup().await;
    let created = create_set(&use_cases, "t-1", "  期中   复习 ", &["p-mc", "p-tf", "p-sa"]).await;

    assert_eq!(created.item_count, 3);
    assert_eq!(created.title, "期中 复习");
    assert_eq!(created.total_points, 5 + 2 + 5);
    assert_eq!(created.estimated_time_minutes, 2 + 1 + 3);
    assert!(!created.is_public && !created.is_shared);
}

#[tokio::test]
async fn test_create_rejects_invalid_requests() {
    let (_, use_cases) = setup().await;

    let duplicate = use_cases
        .create
        .execute(CreateProblemSetRequest {
            teacher_id: "t-1".into(),
            title: "重复题目".into(),
            initial_problems: initial(&["p-mc", "p-mc"]),
            ..Default::default()
        })
        .await;
    assert!(matches!(
        assert_err!(duplicate),
        AppError::Validation(ValidationError::DuplicateProblem { .. })
    ));

    let missing = use_cases
        .create
        .execute(CreateProblemSetRequest {
            teacher_id: "t-1".into(),
            title: "缺题".into(),
            initial_problems: initial(&["p-none"]),
            ..Default::default()
        })
        .await;
    assert!(assert_err!(missing).is_not_found());

    let too_many: Vec<String> = (0..51).map(|i| format!("p-{}", i)).collect();
    let too_many = use_cases
        .create
        .execute(CreateProblemSetRequest {
            teacher_id: "t-1".into(),
            title: "太多".into(),
            initial_problems: initial(&too_many.iter().map(String::as_str).collect::<Vec<_>>()),
            ..Default::default()
        })
        .await;
    assert!(matches!(
        assert_err!(too_many),
        AppError::Business(BusinessError::TooManyItems { max: 50, current: 51 })
    ));

    let student = use_cases
        .create
        .execute(CreateProblemSetRequest {
            teacher_id: "s-1".into(),
            title: "学生题集".into(),
            ..Default::default()
        })
        .await;
    assert!(assert_err!(student).is_permission_denied());

    let blank = use_cases
        .create
        .execute(CreateProblemSetRequest {
            teacher_id: "t-1".into(),
            title: "   ".into(),
            ..Default::default()
        })
        .await;
    assert!(matches!(assert_err!(blank), AppError::Validation(_)));
}

#[tokio::test]
async fn test_create_with_taken_id_leaves_existing_set_untouched() {
    let (repos, use_cases) = setup().await;
    let original = create_set(&use_cases, "t-1", "王老师的题集", &["p-mc"]).await;

    let taken = use_cases
        .create
        .execute(CreateProblemSetRequest {
            teacher_id: "t-2".into(),
            title: "李老师的题集".into(),
            id: Some(original.id.clone()),
            ..Default::default()
        })
        .await;
    assert!(matches!(
        assert_err!(taken),
        AppError::Business(BusinessError::IdAlreadyExists { .. })
    ));

    let stored = repos.problem_sets.find_by_id(&original.id).await.unwrap().unwrap();
    assert_eq!(stored.teacher_id, "t-1");
    assert_eq!(stored.title.as_str(), "王老师的题集");
    assert_eq!(stored.item_count(), 1);

    // 未被占用的 ID 可以使用
    let fresh = assert_ok!(
        use_cases
            .create
            .execute(CreateProblemSetRequest {
                teacher_id: "t-2".into(),
                title: "指定 ID".into(),
                id: Some("set-fixed".into()),
                ..Default::default()
            })
            .await
    );
    assert_eq!(fresh.id, "set-fixed");
}

#[tokio::test]
async fn test_configured_item_cap_cannot_exceed_fifty() {
    let (repos, _) = setup().await;
    let ids: Vec<String> = (0..55).map(|i| format!("cap-{}", i)).collect();
    for id in &ids {
        repos
            .problems
            .save(&Problem::new(id, "t-1", id, ProblemContent::TrueFalse { correct_answer: true }))
            .await
            .unwrap();
    }

    let config = Config {
        max_items_per_set: 60,
        ..Config::default()
    };
    assert!(config.validate().is_err());

    let use_cases = ProblemSetUseCases::new(repos.clone(), &config);
    let result = use_cases
        .create
        .execute(CreateProblemSetRequest {
            teacher_id: "t-1".into(),
            title: "超过上限".into(),
            initial_problems: initial(&ids.iter().map(String::as_str).collect::<Vec<_>>()),
            ..Default::default()
        })
        .await;
    assert!(matches!(
        assert_err!(result),
        AppError::Business(BusinessError::TooManyItems { max: 50, current: 55 })
    ));
}

#[tokio::test]
async fn test_create_duplicate_title_for_same_teacher_fails() {
    let (_, use_cases) = setup().await;
    create_set(&use_cases, "t-1", "单元测验", &[]).await;

    let again = use_cases
        .create
        .execute(CreateProblemSetRequest {
            teacher_id: "t-1".into(),
            title: "单元测验".into(),
            ..Default::default()
        })
        .await;
    assert!(matches!(
        assert_err!(again),
        AppError::Business(BusinessError::DuplicateTitle { .. })
    ));

    // 不同教师可以同名
    create_set(&use_cases, "t-2", "单元测验", &[]).await;
}

// ========== 查询 / 更新 ==========

#[tokio::test]
async fn test_get_returns_ordered_items_and_respects_visibility() {
    let (_, use_cases) = setup().await;
    let created = create_set(&use_cases, "t-1", "详情", &["p-tf", "p-mc"]).await;

    let detail = assert_ok!(
        use_cases
            .get
            .execute(GetProblemSetRequest {
                problem_set_id: created.id.clone(),
                requester_id: "t-1".into(),
            })
            .await
    );
    assert!(detail.is_owner);
    assert_eq!(detail.items[0].item.problem_id, "p-tf");
    assert_eq!(detail.items[1].item.order_index, 1);
    assert_eq!(detail.items[1].problem_title.as_deref(), Some("下列哪些是质数"));

    let other = use_cases
        .get
        .execute(GetProblemSetRequest {
            problem_set_id: created.id.clone(),
            requester_id: "t-2".into(),
        })
        .await;
    assert!(assert_err!(other).is_permission_denied());
}

#[tokio::test]
async fn test_update_to_duplicate_title_fails() {
    let (_, use_cases) = setup().await;
    create_set(&use_cases, "t-1", "第一单元", &[]).await;
    let second = create_set(&use_cases, "t-1", "第二单元", &[]).await;

    let result = use_cases
        .update
        .execute(UpdateProblemSetRequest {
            problem_set_id: second.id.clone(),
            requester_id: "t-1".into(),
            title: Some("第一单元".into()),
            ..Default::default()
        })
        .await;
    assert!(matches!(
        assert_err!(result),
        AppError::Business(BusinessError::DuplicateTitle { .. })
    ));

    // 保持原标题不算重复
    let same = assert_ok!(
        use_cases
            .update
            .execute(UpdateProblemSetRequest {
                problem_set_id: second.id.clone(),
                requester_id: "t-1".into(),
                title: Some("第二单元".into()),
                description: Some("复习用".into()),
                ..Default::default()
            })
            .await
    );
    assert_eq!(same.updated_fields, vec!["title", "description"]);
    assert_eq!(same.problem_set.description.as_deref(), Some("复习用"));
}

#[tokio::test]
async fn test_update_rules() {
    let (_, use_cases) = setup().await;
    let created = create_set(&use_cases, "t-1", "更新", &[]).await;

    let empty = use_cases
        .update
        .execute(UpdateProblemSetRequest {
            problem_set_id: created.id.clone(),
            requester_id: "t-1".into(),
            ..Default::default()
        })
        .await;
    assert!(matches!(
        assert_err!(empty),
        AppError::Validation(ValidationError::NothingToUpdate)
    ));

    let denied = use_cases
        .update
        .execute(UpdateProblemSetRequest {
            problem_set_id: created.id.clone(),
            requester_id: "t-2".into(),
            title: Some("改名".into()),
            ..Default::default()
        })
        .await;
    assert!(assert_err!(denied).is_permission_denied());

    let by_admin = assert_ok!(
        use_cases
            .update
            .execute(UpdateProblemSetRequest {
                problem_set_id: created.id.clone(),
                requester_id: "a-1".into(),
                is_public: Some(true),
                ..Default::default()
            })
            .await
    );
    assert!(by_admin.problem_set.is_public && by_admin.problem_set.is_shared);
}

// ========== 删除 ==========

#[tokio::test]
async fn test_delete_with_active_assignment_requires_force() {
    let (repos, use_cases) = setup().await;
    let created = create_set(&use_cases, "t-1", "期末", &["p-mc"]).await;
    repos
        .assignments
        .save(&Assignment::new("as-1", &created.id, "t-1", "期末作业", AssignmentStatus::Active))
        .await
        .unwrap();
    repos
        .assignments
        .save(&Assignment::new("as-2", &created.id, "t-1", "旧作业", AssignmentStatus::Closed))
        .await
        .unwrap();

    let blocked = use_cases
        .delete
        .execute(DeleteProblemSetRequest {
            problem_set_id: created.id.clone(),
            requester_id: "t-1".into(),
            force: false,
        })
        .await;
    match assert_err!(blocked) {
        AppError::Business(BusinessError::ActiveAssignments { warnings }) => {
            assert_eq!(warnings.len(), 1);
            assert!(warnings[0].contains("期末作业"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(repos.problem_sets.find_by_id(&created.id).await.unwrap().is_some());

    let forced = assert_ok!(
        use_cases
            .delete
            .execute(DeleteProblemSetRequest {
                problem_set_id: created.id.clone(),
                requester_id: "t-1".into(),
                force: true,
            })
            .await
    );
    assert_eq!(forced.deleted_id, created.id);
    assert_eq!(forced.warnings.len(), 1);
    assert_eq!(forced.affected_assignment_ids, vec!["as-1"]);
    assert!(repos.problem_sets.find_by_id(&created.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_permissions() {
    let (_, use_cases) = setup().await;
    let created = create_set(&use_cases, "t-1", "权限", &[]).await;

    let denied = use_cases
        .delete
        .execute(DeleteProblemSetRequest {
            problem_set_id: created.id.clone(),
            requester_id: "t-2".into(),
            force: true,
        })
        .await;
    assert!(assert_err!(denied).is_permission_denied());

    let by_admin = assert_ok!(
        use_cases
            .delete
            .execute(DeleteProblemSetRequest {
                problem_set_id: created.id.clone(),
                requester_id: "a-1".into(),
                force: false,
            })
            .await
    );
    assert!(by_admin.warnings.is_empty());
}

// ========== 复制 / 共享 ==========

#[tokio::test]
async fn test_clone_rules() {
    let (_, use_cases) = setup().await;
    let source = create_set(&use_cases, "t-1", "函数", &["p-mc", "p-tf"]).await;

    let not_shared = use_cases
        .clone_set
        .execute(CloneProblemSetRequest {
            source_problem_set_id: source.id.clone(),
            requester_id: "t-2".into(),
            new_title: None,
        })
        .await;
    assert!(assert_err!(not_shared).is_permission_denied());

    let first = assert_ok!(
        use_cases
            .clone_set
            .execute(CloneProblemSetRequest {
                source_problem_set_id: source.id.clone(),
                requester_id: "t-1".into(),
                new_title: None,
            })
            .await
    );
    assert_eq!(first.problem_set.title, "函数（副本）");
    assert_eq!(first.problem_set.item_count, 2);
    assert_eq!(first.source_problem_set_id, source.id);

    let second = assert_ok!(
        use_cases
            .clone_set
            .execute(CloneProblemSetRequest {
                source_problem_set_id: source.id.clone(),
                requester_id: "t-1".into(),
                new_title: None,
            })
            .await
    );
    assert_eq!(second.problem_set.title, "函数（副本） 2");

    let explicit_duplicate = use_cases
        .clone_set
        .execute(CloneProblemSetRequest {
            source_problem_set_id: source.id.clone(),
            requester_id: "t-1".into(),
            new_title: Some("函数".into()),
        })
        .await;
    assert!(matches!(
        assert_err!(explicit_duplicate),
        AppError::Business(BusinessError::DuplicateTitle { .. })
    ));
}

#[tokio::test]
async fn test_clone_of_shared_set_by_other_teacher() {
    let (_, use_cases) = setup().await;
    let source = create_set(&use_cases, "t-1", "共享题集", &["p-sa"]).await;
    share(&use_cases, &source.id, "t-1", true, Some(true)).await;

    let cloned = assert_ok!(
        use_cases
            .clone_set
            .execute(CloneProblemSetRequest {
                source_problem_set_id: source.id.clone(),
                requester_id: "t-2".into(),
                new_title: Some("我的版本".into()),
            })
            .await
    );
    assert_eq!(cloned.problem_set.teacher_id, "t-2");
    assert_eq!(cloned.problem_set.title, "我的版本");
    assert!(!cloned.problem_set.is_shared && !cloned.problem_set.is_public);
}

#[tokio::test]
async fn test_share_keeps_public_implies_shared() {
    let (_, use_cases) = setup().await;
    let created = create_set(&use_cases, "t-1", "共享", &[]).await;

    let public = assert_ok!(
        use_cases
            .share
            .execute(ShareProblemSetRequest {
                problem_set_id: created.id.clone(),
                requester_id: "t-1".into(),
                is_shared: false,
                is_public: Some(true),
            })
            .await
    );
    assert!(public.is_public && public.is_shared);

    let unshared = assert_ok!(
        use_cases
            .share
            .execute(ShareProblemSetRequest {
                problem_set_id: created.id.clone(),
                requester_id: "t-1".into(),
                is_shared: false,
                is_public: None,
            })
            .await
    );
    assert!(!unshared.is_public && !unshared.is_shared);

    let denied = use_cases
        .share
        .execute(ShareProblemSetRequest {
            problem_set_id: created.id.clone(),
            requester_id: "t-2".into(),
            is_shared: true,
            is_public: None,
        })
        .await;
    assert!(assert_err!(denied).is_permission_denied());
}

// ========== 列表 / 搜索 ==========

#[tokio::test]
async fn test_list_scopes_and_pagination() {
    let (_, use_cases) = setup().await;
    for i in 1..=5 {
        create_set(&use_cases, "t-1", &format!("题集 {}", i), &[]).await;
    }
    let shared = create_set(&use_cases, "t-2", "李老师的共享题集", &[]).await;
    share(&use_cases, &shared.id, "t-2", true, None).await;

    let page = assert_ok!(
        use_cases
            .list
            .execute(ListProblemSetsRequest {
                requester_id: "t-1".into(),
                page: PageRequest::new(2, 2),
                sort_by: SortBy::Title,
                sort_order: SortOrder::Asc,
                ..Default::default()
            })
            .await
    );
    assert_eq!(page.pagination.total, 5);
    assert_eq!(page.pagination.total_pages, 3);
    assert!(page.pagination.has_next && page.pagination.has_prev);
    assert_eq!(page.problem_sets[0].title, "题集 3");

    let shared_scope = assert_ok!(
        use_cases
            .list
            .execute(ListProblemSetsRequest {
                requester_id: "t-1".into(),
                scope: ListScope::Shared,
                ..Default::default()
            })
            .await
    );
    assert_eq!(shared_scope.problem_sets.len(), 1);
    assert_eq!(shared_scope.problem_sets[0].id, shared.id);

    let other_teacher = use_cases
        .list
        .execute(ListProblemSetsRequest {
            requester_id: "t-2".into(),
            teacher_id: Some("t-1".into()),
            ..Default::default()
        })
        .await;
    assert!(assert_err!(other_teacher).is_permission_denied());

    let as_admin = assert_ok!(
        use_cases
            .list
            .execute(ListProblemSetsRequest {
                requester_id: "a-1".into(),
                teacher_id: Some("t-1".into()),
                ..Default::default()
            })
            .await
    );
    assert_eq!(as_admin.pagination.total, 5);

    let bad_limit = use_cases
        .list
        .execute(ListProblemSetsRequest {
            requester_id: "t-1".into(),
            page: PageRequest::new(1, 101),
            ..Default::default()
        })
        .await;
    assert!(matches!(assert_err!(bad_limit), AppError::Validation(_)));

    for page in [4, usize::MAX] {
        let past_end = assert_ok!(
            use_cases
                .list
                .execute(ListProblemSetsRequest {
                    requester_id: "t-1".into(),
                    page: PageRequest::new(page, 100),
                    ..Default::default()
                })
                .await
        );
        assert!(past_end.problem_sets.is_empty());
        assert_eq!(past_end.pagination.total, 5);
        assert!(!past_end.pagination.has_next);
    }
}

#[tokio::test]
async fn test_search_pool_and_keywords() {
    let (_, use_cases) = setup().await;
    let own = create_set(&use_cases, "t-1", "代数 基础", &["p-mc"]).await;
    share(&use_cases, &own.id, "t-1", true, Some(true)).await;
    create_set(&use_cases, "t-1", "几何 基础", &[]).await;
    let other_shared = create_set(&use_cases, "t-2", "代数 进阶", &["p-mc", "p-tf"]).await;
    share(&use_cases, &other_shared.id, "t-2", true, None).await;
    create_set(&use_cases, "t-2", "代数 私有", &[]).await;

    let found = assert_ok!(
        use_cases
            .search
            .execute(SearchProblemSetsRequest {
                requester_id: "t-1".into(),
                query: Some("代数".into()),
                ..Default::default()
            })
            .await
    );
    // 自己的公开题集只出现一次，他人的私有题集不可见
    assert_eq!(found.pagination.total, 2);

    let narrowed = assert_ok!(
        use_cases
            .search
            .execute(SearchProblemSetsRequest {
                requester_id: "t-1".into(),
                query: Some("代数 进阶".into()),
                ..Default::default()
            })
            .await
    );
    assert_eq!(narrowed.problem_sets.len(), 1);
    assert_eq!(narrowed.problem_sets[0].id, other_shared.id);

    let by_size = assert_ok!(
        use_cases
            .search
            .execute(SearchProblemSetsRequest {
                requester_id: "t-1".into(),
                min_items: Some(1),
                sort_by: SortBy::ItemCount,
                sort_order: SortOrder::Desc,
                ..Default::default()
            })
            .await
    );
    assert_eq!(by_size.problem_sets.len(), 2);
    assert_eq!(by_size.problem_sets[0].item_count, 2);
}

// ========== 条目操作 ==========

#[tokio::test]
async fn test_add_remove_and_reorder_items() {
    let (_, use_cases) = setup().await;
    let created = create_set(&use_cases, "t-1", "条目", &["p-mc", "p-tf"]).await;

    let added = assert_ok!(
        use_cases
            .add_problem
            .execute(AddProblemToSetRequest {
                problem_set_id: created.id.clone(),
                requester_id: "t-1".into(),
                problem_id: "p-sa".into(),
                points: Some(8),
                position: Some(0),
                settings: None,
            })
            .await
    );
    assert_eq!(added.item.order_index, 0);
    assert_eq!(added.item_count, 3);
    assert_eq!(added.total_points, 8 + 5 + 2);

    let duplicate = use_cases
        .add_problem
        .execute(AddProblemToSetRequest {
            problem_set_id: created.id.clone(),
            requester_id: "t-1".into(),
            problem_id: "p-mc".into(),
            ..Default::default()
        })
        .await;
    assert!(matches!(
        assert_err!(duplicate),
        AppError::Business(BusinessError::ProblemAlreadyInSet { .. })
    ));

    let bad_points = use_cases
        .add_problem
        .execute(AddProblemToSetRequest {
            problem_set_id: created.id.clone(),
            requester_id: "t-1".into(),
            problem_id: "p-order".into(),
            points: Some(0),
            ..Default::default()
        })
        .await;
    assert!(matches!(assert_err!(bad_points), AppError::Validation(_)));

    let removed = assert_ok!(
        use_cases
            .remove_problem
            .execute(RemoveProblemFromSetRequest {
                problem_set_id: created.id.clone(),
                requester_id: "t-1".into(),
                problem_id: "p-mc".into(),
            })
            .await
    );
    assert_eq!(removed.item_count, 2);
    assert_eq!(removed.total_points, 10);

    let missing = use_cases
        .remove_problem
        .execute(RemoveProblemFromSetRequest {
            problem_set_id: created.id.clone(),
            requester_id: "t-1".into(),
            problem_id: "p-mc".into(),
        })
        .await;
    assert!(assert_err!(missing).is_not_found());

    let detail = use_cases
        .get
        .execute(GetProblemSetRequest {
            problem_set_id: created.id.clone(),
            requester_id: "t-1".into(),
        })
        .await
        .unwrap();
    let mut item_ids: Vec<String> = detail.items.iter().map(|i| i.item.id.clone()).collect();
    item_ids.reverse();

    let reordered = assert_ok!(
        use_cases
            .reorder
            .execute(ReorderProblemSetItemsRequest {
                problem_set_id: created.id.clone(),
                requester_id: "t-1".into(),
                item_ids: item_ids.clone(),
            })
            .await
    );
    let after: Vec<String> = reordered.items.iter().map(|i| i.id.clone()).collect();
    assert_eq!(after, item_ids);
    assert_eq!(reordered.items[0].problem_id, "p-tf");
    assert_eq!(
        reordered.items.iter().map(|i| i.order_index).collect::<Vec<_>>(),
        vec![0, 1]
    );

    let partial = use_cases
        .reorder
        .execute(ReorderProblemSetItemsRequest {
            problem_set_id: created.id.clone(),
            requester_id: "t-1".into(),
            item_ids: vec![item_ids[0].clone()],
        })
        .await;
    assert!(matches!(
        assert_err!(partial),
        AppError::Validation(ValidationError::InvalidOrder { .. })
    ));
}

// ========== 权限 / 统计 ==========

#[tokio::test]
async fn test_validate_ownership_never_fails_on_non_owner() {
    let (_, use_cases) = setup().await;
    let created = create_set(&use_cases, "t-1", "归属", &[]).await;

    let other = assert_ok!(
        use_cases
            .validate_ownership
            .execute(ValidateOwnershipRequest {
                problem_set_id: created.id.clone(),
                requester_id: "t-2".into(),
            })
            .await
    );
    assert!(!other.is_owner && !other.can_view && !other.can_edit);
    assert_eq!(other.owner_id, "t-1");

    let admin = assert_ok!(
        use_cases
            .validate_ownership
            .execute(ValidateOwnershipRequest {
                problem_set_id: created.id.clone(),
                requester_id: "a-1".into(),
            })
            .await
    );
    assert!(admin.is_admin && admin.can_edit && !admin.can_clone);

    let missing = use_cases
        .validate_ownership
        .execute(ValidateOwnershipRequest {
            problem_set_id: "nope".into(),
            requester_id: "t-1".into(),
        })
        .await;
    assert!(assert_err!(missing).is_not_found());
}

#[tokio::test]
async fn test_statistics_counts_types_and_assignments() {
    let (repos, use_cases) = setup().await;
    let created = create_set(&use_cases, "t-1", "统计", &["p-mc", "p-tf", "p-essay"]).await;
    repos
        .assignments
        .save(&Assignment::new("as-1", &created.id, "t-1", "作业", AssignmentStatus::Active))
        .await
        .unwrap();
    repos
        .assignments
        .save(&Assignment::new("as-2", &created.id, "t-1", "草稿", AssignmentStatus::Draft))
        .await
        .unwrap();

    let stats = assert_ok!(
        use_cases
            .statistics
            .execute(GetStatisticsRequest {
                problem_set_id: created.id.clone(),
                requester_id: "t-1".into(),
            })
            .await
    );
    assert_eq!(stats.item_count, 3);
    assert_eq!(stats.total_points, 5 + 2 + 20);
    assert_eq!(stats.estimated_time_minutes, 2 + 1 + 15);
    assert_eq!(stats.auto_gradable_count, 2);
    assert_eq!(stats.manual_grading_count, 1);
    assert_eq!(stats.assignment_count, 2);
    assert_eq!(stats.active_assignment_count, 1);
}

// ========== 评分 ==========

#[test]
fn test_multiple_choice_exact_match_scores_full_points() {
    let grader = AutoGrader::new();
    let problem = multiple_choice("p-mc");
    let policy = GradingPolicy::new(5, true);

    let exact = StudentAnswer::MultipleChoice {
        selected_choice_ids: vec!["c".into(), "a".into()],
    };
    let result = grader.grade(&problem, Some(&exact), policy).unwrap();
    assert_eq!(result.earned_points, 5);
    assert!(result.is_correct);

    for selected in [vec!["a"], vec!["a", "b", "c"], vec!["b"]] {
        let answer = StudentAnswer::MultipleChoice {
            selected_choice_ids: selected.into_iter().map(String::from).collect(),
        };
        let result = grader.grade(&problem, Some(&answer), policy).unwrap();
        assert_eq!(result.earned_points, 0);
        assert!(!result.is_correct);
    }
}

// ========== 批量批改 / 导入 ==========

#[tokio::test]
async fn test_bulk_grading_preserves_submission_order() {
    let (repos, use_cases) = setup().await;
    let created = create_set(&use_cases, "t-1", "批改", &["p-mc", "p-order", "p-essay"]).await;

    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        max_concurrent_gradings: 2,
        review_file: dir.path().join("review.txt").to_string_lossy().to_string(),
        ..Config::default()
    };

    let submission = |student: &str, order: &[&str]| Submission {
        student_id: student.into(),
        problem_set_id: created.id.clone(),
        answers: HashMap::from([
            (
                "p-mc".to_string(),
                StudentAnswer::MultipleChoice {
                    selected_choice_ids: vec!["a".into(), "c".into()],
                },
            ),
            (
                "p-order".to_string(),
                StudentAnswer::Ordering {
                    order: order.iter().map(|s| s.to_string()).collect(),
                },
            ),
            ("p-essay".to_string(), StudentAnswer::LongAnswer { text: "保护环境".into() }),
        ]),
        submitted_at: chrono::Utc::now(),
    };

    let mut unknown = submission("s-9", &[]);
    unknown.problem_set_id = "missing".into();

    let submissions = vec![
        submission("s-1", &["x", "y", "z", "w"]),
        submission("s-2", &["x", "y", "w", "z"]),
        unknown,
    ];

    let processor = BulkGradingProcessor::new(repos.clone(), &config);
    let stats = processor.grade_all(submissions).await.unwrap();

    assert_eq!(stats.total, 3);
    assert_eq!(stats.success, 2);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.pending_review, 2);
    assert_eq!(stats.results[0].student_id, "s-1");
    assert_eq!(stats.results[0].total_earned, 5 + 10);
    // 排序题 2/4 正确，部分得分 round(0.5 * 10) = 5
    assert_eq!(stats.results[1].total_earned, 5 + 5);
    assert_eq!(stats.results[1].total_max, 5 + 10 + 20);

    let review = std::fs::read_to_string(dir.path().join("review.txt")).unwrap();
    assert_eq!(review.lines().count(), 2);
}

#[tokio::test]
async fn test_import_creates_problem_sets_from_toml() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("sets");
    std::fs::create_dir(&data).unwrap();
    std::fs::write(
        data.join("unit1.toml"),
        r#"
teacher_id = "t-9"
teacher_name = "赵老师"
title = "第一单元"
is_public = true

[[problems]]
id = "u1-1"
title = "1 + 1 = 2"
content = { type = "true_false", correct_answer = true }

[[problems]]
id = "u1-2"
title = "写出圆周率的前两位"
points = 4
content = { type = "short_answer", accepted_answers = ["3.1"] }

[[problems]]
id = "u1-bad"
title = "没有正确选项"
content = { type = "multiple_choice", choices = [], correct_choice_ids = [] }
"#,
    )
    .unwrap();

    let config = Config {
        data_folder: data.to_string_lossy().to_string(),
        ..Config::default()
    };
    let app = App::with_repositories(config, Repositories::in_memory());

    assert_eq!(app.import_problem_sets().await.unwrap(), 1);
    // 重复导入跳过同名题集
    assert_eq!(app.import_problem_sets().await.unwrap(), 0);

    let repos = app.repositories();
    assert!(repos.users.find_by_id("t-9").await.unwrap().is_some());
    let sets = repos.problem_sets.find_by_teacher_id("t-9").await.unwrap();
    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].item_count(), 2);
    assert_eq!(sets[0].total_points(), 2 + 4);
    assert!(sets[0].is_public && sets[0].is_shared);
}

#[tokio::test]
async fn test_import_does_not_replace_another_teachers_problem() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("sets");
    std::fs::create_dir(&data).unwrap();
    std::fs::write(
        data.join("a_first.toml"),
        r#"
teacher_id = "t-a"
title = "甲的题集"

[[problems]]
id = "shared-id"
title = "1 + 1 = 2"
content = { type = "true_false", correct_answer = true }
"#,
    )
    .unwrap();
    std::fs::write(
        data.join("b_second.toml"),
        r#"
teacher_id = "t-b"
title = "乙的题集"

[[problems]]
id = "shared-id"
title = "1 + 1 = 3"
content = { type = "true_false", correct_answer = false }

[[problems]]
id = "own-id"
title = "2 + 2 = 4"
content = { type = "true_false", correct_answer = true }
"#,
    )
    .unwrap();

    let config = Config {
        data_folder: data.to_string_lossy().to_string(),
        ..Config::default()
    };
    let app = App::with_repositories(config, Repositories::in_memory());
    assert_eq!(app.import_problem_sets().await.unwrap(), 2);

    let repos = app.repositories();
    let kept = repos.problems.find_by_id("shared-id").await.unwrap().unwrap();
    assert_eq!(kept.teacher_id, "t-a");
    assert!(matches!(kept.content, ProblemContent::TrueFalse { correct_answer: true }));

    let second = repos.problem_sets.find_by_teacher_id("t-b").await.unwrap();
    assert_eq!(second.len(), 1);
    let item_ids: Vec<&str> = second[0].items.iter().map(|i| i.problem_id.as_str()).collect();
    assert_eq!(item_ids, vec!["own-id"]);
}
