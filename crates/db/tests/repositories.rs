//! Target-store repositories against an in-memory SQLite database.

mod common;

use assert_matches::assert_matches;
use pmhub_db::models::department::CreateDepartment;
use pmhub_db::models::module::CreateModule;
use pmhub_db::models::project_member::CreateProjectMember;
use pmhub_db::models::requirement::{CreateRequirement, UpdateRequirement};
use pmhub_db::models::role::CreateRole;
use pmhub_db::models::task::{CreateTask, UpdateTask};
use pmhub_db::repositories::{
    DepartmentRepo, ModuleRepo, PermissionRepo, ProjectMemberRepo, ProjectRepo, RequirementRepo,
    RoleRepo, SystemConfigRepo, TaskRepo, UserRepo,
};

// -- bootstrap --

#[tokio::test]
async fn migrations_seed_the_permission_catalogue() {
    let pool = common::target_pool().await;
    pmhub_db::health_check(&pool).await.unwrap();

    let permissions = PermissionRepo::list(&pool).await.unwrap();
    assert_eq!(permissions.len(), 25);

    let assign = PermissionRepo::find_by_code(&pool, "bug:assign").await.unwrap().unwrap();
    assert_eq!(assign.resource, "bug");
    assert_eq!(assign.action, "assign");
    assert!(PermissionRepo::find_by_code(&pool, "story:edit").await.unwrap().is_none());
}

#[tokio::test]
async fn system_starts_in_setup_mode() {
    let pool = common::target_pool().await;
    assert!(!SystemConfigRepo::is_initialized(&pool).await.unwrap());

    let row = SystemConfigRepo::mark_initialized(&pool).await.unwrap();
    assert_eq!(row.config_value, "true");
    assert_eq!(row.value_type, "boolean");
    assert!(SystemConfigRepo::is_initialized(&pool).await.unwrap());

    // A second call overwrites rather than duplicating.
    let again = SystemConfigRepo::mark_initialized(&pool).await.unwrap();
    assert_eq!(again.id, row.id);
}

// -- organisation --

#[tokio::test]
async fn departments_link_to_parents() {
    let pool = common::target_pool().await;
    let root = DepartmentRepo::create(
        &pool,
        &CreateDepartment {
            name: "Engineering".to_string(),
            code: "dept_1".to_string(),
            parent_id: None,
            level: 1,
            sort: 0,
            status: 1,
        },
    )
    .await
    .unwrap();
    let child = DepartmentRepo::create(
        &pool,
        &CreateDepartment {
            name: "Backend".to_string(),
            code: "dept_2".to_string(),
            parent_id: Some(root.id),
            level: 2,
            sort: 1,
            status: 1,
        },
    )
    .await
    .unwrap();

    assert_eq!(child.parent_id, Some(root.id));
    let found = DepartmentRepo::find_by_code(&pool, "dept_2").await.unwrap().unwrap();
    assert_eq!(found.id, child.id);
    assert_eq!(DepartmentRepo::list(&pool).await.unwrap().len(), 2);
}

#[tokio::test]
async fn duplicate_department_code_is_rejected() {
    let pool = common::target_pool().await;
    let input = CreateDepartment {
        name: "Engineering".to_string(),
        code: "dept_1".to_string(),
        parent_id: None,
        level: 1,
        sort: 0,
        status: 1,
    };
    DepartmentRepo::create(&pool, &input).await.unwrap();
    let err = DepartmentRepo::create(&pool, &input).await.unwrap_err();
    assert_matches!(err, sqlx::Error::Database(_));
}

#[tokio::test]
async fn role_permissions_are_replaced_and_deduplicated() {
    let pool = common::target_pool().await;
    let role = RoleRepo::create(
        &pool,
        &CreateRole {
            name: "Developer".to_string(),
            code: "developer".to_string(),
            description: String::new(),
            status: 1,
        },
    )
    .await
    .unwrap();

    let read = PermissionRepo::find_by_code(&pool, "bug:read").await.unwrap().unwrap();
    let update = PermissionRepo::find_by_code(&pool, "bug:update").await.unwrap().unwrap();

    RoleRepo::set_permissions(&pool, role.id, &[read.id, update.id, read.id]).await.unwrap();
    let granted: Vec<String> = RoleRepo::permissions(&pool, role.id)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.code)
        .collect();
    assert_eq!(granted, vec!["bug:read", "bug:update"]);

    RoleRepo::set_permissions(&pool, role.id, &[read.id]).await.unwrap();
    assert_eq!(RoleRepo::permissions(&pool, role.id).await.unwrap().len(), 1);

    let admin = RoleRepo::create(&pool, &CreateRole::admin()).await.unwrap();
    assert_eq!(RoleRepo::find_by_name(&pool, "管理员").await.unwrap().unwrap().id, admin.id);
}

#[tokio::test]
async fn role_is_created_with_its_permissions() {
    let pool = common::target_pool().await;
    let read = PermissionRepo::find_by_code(&pool, "bug:read").await.unwrap().unwrap();
    let assign = PermissionRepo::find_by_code(&pool, "bug:assign").await.unwrap().unwrap();
    let tester = CreateRole {
        name: "Tester".to_string(),
        code: "tester".to_string(),
        description: String::new(),
        status: 1,
    };

    let role = RoleRepo::create_with_permissions(&pool, &tester, &[assign.id, read.id, assign.id])
        .await
        .unwrap();
    assert_eq!(role.code, "tester");
    let granted: Vec<String> = RoleRepo::permissions(&pool, role.id)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.code)
        .collect();
    assert_eq!(granted, vec!["bug:assign", "bug:read"]);

    // A rejected grant rolls the role back with it.
    sqlx::raw_sql(
        "CREATE TRIGGER reject_assign_grant BEFORE INSERT ON role_permissions
         WHEN NEW.permission_id = (SELECT id FROM permissions WHERE code = 'bug:assign')
         BEGIN
             SELECT RAISE(ABORT, 'rejected');
         END;",
    )
    .execute(&pool)
    .await
    .unwrap();
    let reviewer = CreateRole {
        name: "Reviewer".to_string(),
        code: "reviewer".to_string(),
        description: String::new(),
        status: 1,
    };
    let err = RoleRepo::create_with_permissions(&pool, &reviewer, &[read.id, assign.id])
        .await
        .unwrap_err();
    assert_matches!(err, sqlx::Error::Database(_));
    assert_matches!(RoleRepo::find_by_code(&pool, "reviewer").await, Ok(None));
    assert_eq!(RoleRepo::list(&pool).await.unwrap().len(), 1);
}

#[tokio::test]
async fn user_role_links_are_idempotent() {
    let pool = common::target_pool().await;
    let user = common::create_user(&pool, "alice", "Alice Wang").await;
    let role = RoleRepo::create(&pool, &CreateRole::admin()).await.unwrap();

    assert!(UserRepo::add_role(&pool, user.id, role.id).await.unwrap());
    assert!(!UserRepo::add_role(&pool, user.id, role.id).await.unwrap());
    assert_eq!(UserRepo::role_ids(&pool, user.id).await.unwrap(), vec![role.id]);

    let found = UserRepo::find_by_username(&pool, "alice").await.unwrap().unwrap();
    assert_eq!(found.id, user.id);
    assert_eq!(found.status, 1);
}

// -- projects --

#[tokio::test]
async fn project_membership_roles_can_change() {
    let pool = common::target_pool().await;
    let user = common::create_user(&pool, "alice", "Alice Wang").await;
    let project = common::create_project(&pool, "Web Portal", "web_portal_1").await;

    let member = ProjectMemberRepo::create(
        &pool,
        &CreateProjectMember {
            project_id: project.id,
            user_id: user.id,
            role: "member".to_string(),
        },
    )
    .await
    .unwrap();
    assert!(ProjectMemberRepo::update_role(&pool, member.id, "owner").await.unwrap());

    let found = ProjectMemberRepo::find(&pool, project.id, user.id).await.unwrap().unwrap();
    assert_eq!(found.role, "owner");
    assert_eq!(ProjectMemberRepo::list_for_project(&pool, project.id).await.unwrap().len(), 1);
    assert_eq!(
        ProjectRepo::find_by_code(&pool, "web_portal_1").await.unwrap().unwrap().id,
        project.id
    );
}

#[tokio::test]
async fn module_names_are_unique() {
    let pool = common::target_pool().await;
    let input = CreateModule {
        name: "Checkout".to_string(),
        code: "checkout_4".to_string(),
        description: String::new(),
    };
    let module = ModuleRepo::create(&pool, &input).await.unwrap();
    assert_eq!(ModuleRepo::find_by_name(&pool, "Checkout").await.unwrap().unwrap().id, module.id);
    assert!(ModuleRepo::create(&pool, &input).await.is_err());
}

// -- work items --

#[tokio::test]
async fn requirement_update_keeps_unset_fields() {
    let pool = common::target_pool().await;
    let project = common::create_project(&pool, "Web Portal", "web_portal_1").await;
    let created = RequirementRepo::create(
        &pool,
        &CreateRequirement {
            legacy_id: Some(42),
            title: "Single sign-on".to_string(),
            description: "SAML first".to_string(),
            status: "draft".to_string(),
            priority: "high".to_string(),
            project_id: project.id,
            creator_id: None,
            assignee_id: None,
            estimated_hours: Some(16.0),
        },
    )
    .await
    .unwrap();

    let updated = RequirementRepo::update(
        &pool,
        created.id,
        &UpdateRequirement {
            status: Some("active".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.status, "active");
    assert_eq!(updated.title, "Single sign-on");
    assert_eq!(updated.estimated_hours, Some(16.0));
    assert_eq!(
        RequirementRepo::find_by_legacy_id(&pool, 42).await.unwrap().unwrap().id,
        created.id
    );
    assert_eq!(RequirementRepo::project_id(&pool, created.id).await.unwrap(), Some(project.id));
    assert!(RequirementRepo::update(&pool, 999, &UpdateRequirement::default())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn task_rows_round_trip_dates_and_hours() {
    let pool = common::target_pool().await;
    let project = common::create_project(&pool, "Web Portal", "web_portal_1").await;
    let task = TaskRepo::create(
        &pool,
        &CreateTask {
            legacy_id: Some(7),
            title: "Wire login form".to_string(),
            description: String::new(),
            status: "doing".to_string(),
            priority: "medium".to_string(),
            project_id: project.id,
            requirement_id: None,
            creator_id: None,
            assignee_id: None,
            start_date: Some("2024-02-01".to_string()),
            due_date: None,
            end_date: Some("2024-02-04".to_string()),
            estimated_hours: Some(24.0),
            actual_hours: Some(4.0),
            progress: 0,
        },
    )
    .await
    .unwrap();

    assert_eq!(task.start_date.as_deref(), Some("2024-02-01"));
    assert_eq!(task.end_date.as_deref(), Some("2024-02-04"));
    assert_eq!(task.due_date, None);

    let updated = TaskRepo::update(
        &pool,
        task.id,
        &UpdateTask {
            progress: Some(50),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.progress, 50);
    assert_eq!(TaskRepo::list_for_project(&pool, project.id).await.unwrap().len(), 1);
    assert_eq!(TaskRepo::find_by_legacy_id(&pool, 7).await.unwrap().unwrap().id, task.id);
}
