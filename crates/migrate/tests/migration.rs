mod common;

use assert_matches::assert_matches;
use common::*;
use pmhub_core::password::{verify_password, DEFAULT_MIGRATED_PASSWORD};
use pmhub_db::models::role::ADMIN_ROLE_CODE;
use pmhub_db::repositories::{
    BugRepo, DepartmentRepo, ModuleRepo, ProjectMemberRepo, ProjectRepo, RequirementRepo,
    RoleRepo, SystemConfigRepo, TaskRepo, UserRepo,
};
use pmhub_migrate::driver;
use pmhub_migrate::stats::EntityStats;

const TARGET_TABLES: &[&str] = &[
    "departments",
    "roles",
    "role_permissions",
    "users",
    "user_roles",
    "projects",
    "modules",
    "requirements",
    "tasks",
    "bugs",
    "bug_assignees",
    "project_members",
];

async fn table_counts(pool: &pmhub_db::DbPool) -> Vec<(&'static str, i64)> {
    let mut counts = Vec::new();
    for table in TARGET_TABLES {
        counts.push((*table, count(pool, table).await));
    }
    counts
}

// -- organization tests --

#[tokio::test]
async fn departments_keep_hierarchy() {
    let (legacy, target) = seeded().await;
    driver::run(&legacy, &target).await.unwrap();

    let rd = DepartmentRepo::find_by_code(&target, "dept_1").await.unwrap().unwrap();
    let backend = DepartmentRepo::find_by_code(&target, "dept_2").await.unwrap().unwrap();
    let frontend = DepartmentRepo::find_by_code(&target, "dept_3").await.unwrap().unwrap();

    assert_eq!(rd.id, 7);
    assert_eq!((rd.level, rd.parent_id), (1, None));
    assert_eq!((backend.level, backend.parent_id), (2, Some(7)));
    assert_eq!((frontend.level, frontend.parent_id), (2, Some(7)));
    assert_eq!(frontend.sort, 1);
    assert_eq!(rd.name, "R&D");
}

#[tokio::test]
async fn cyclic_departments_become_roots() {
    let legacy = legacy_pool().await;
    exec(
        &legacy,
        "INSERT INTO zt_dept (id, name, parent) VALUES (4, 'A', 5), (5, 'B', 4), (6, 'C', 0);",
    )
    .await;
    let target = target_pool().await;

    let summary = driver::run(&legacy, &target).await.unwrap();
    assert_eq!(summary.get("departments").map(|s| s.created), Some(3));

    for code in ["dept_4", "dept_5", "dept_6"] {
        let dept = DepartmentRepo::find_by_code(&target, code).await.unwrap().unwrap();
        assert_eq!((dept.level, dept.parent_id), (1, None), "{code}");
    }
}

#[tokio::test]
async fn users_get_profile_and_default_password() {
    let (legacy, target) = seeded().await;
    driver::run(&legacy, &target).await.unwrap();

    let alice = UserRepo::find_by_username(&target, "alice").await.unwrap().unwrap();
    assert_eq!(alice.id, 11);
    assert_eq!(alice.nickname, "Alice Wang");
    assert_eq!(alice.email, "alice@x");
    assert_eq!(alice.department_id, Some(7));
    assert_eq!(alice.status, 1);
    assert!(verify_password(DEFAULT_MIGRATED_PASSWORD, &alice.password_hash).unwrap());

    let bob = UserRepo::find_by_username(&target, "bob").await.unwrap().unwrap();
    assert_eq!(bob.nickname, "bob");
    assert_eq!(bob.department_id, Some(8));

    let carol = UserRepo::find_by_username(&target, "carol").await.unwrap().unwrap();
    assert_eq!(carol.status, 0);

    // Ten pre-existing accounts plus the five legacy ones.
    let usernames: Vec<String> = UserRepo::list(&target)
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.username)
        .collect();
    assert_eq!(usernames.len(), 15);
    assert_eq!(&usernames[10..], ["alice", "bob", "admin", "root", "carol"]);
}

#[tokio::test]
async fn roles_and_memberships() {
    let (legacy, target) = seeded().await;
    let summary = driver::run(&legacy, &target).await.unwrap();

    assert_eq!(
        summary.get("roles"),
        Some(EntityStats { read: 2, created: 1, existing: 1, skipped: 0, failed: 0 })
    );

    let admin = RoleRepo::find_by_code(&target, ADMIN_ROLE_CODE).await.unwrap().unwrap();
    let all_permissions = count(&target, "permissions").await;
    assert_eq!(
        RoleRepo::permissions(&target, admin.id).await.unwrap().len() as i64,
        all_permissions
    );

    let developers = RoleRepo::find_by_code(&target, "developers").await.unwrap().unwrap();
    let mut codes: Vec<String> = RoleRepo::permissions(&target, developers.id)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.code)
        .collect();
    codes.sort();
    assert_eq!(codes, vec!["bug:create", "requirement:update"]);

    let mut role_codes: Vec<String> =
        RoleRepo::list(&target).await.unwrap().into_iter().map(|r| r.code).collect();
    role_codes.sort();
    assert_eq!(role_codes, vec!["admin", "developers"]);

    let roles_of = |username: &'static str| {
        let target = target.clone();
        async move {
            let user = UserRepo::find_by_username(&target, username).await.unwrap().unwrap();
            UserRepo::role_ids(&target, user.id).await.unwrap()
        }
    };
    assert_eq!(roles_of("bob").await, vec![developers.id]);
    assert_eq!(roles_of("admin").await, vec![admin.id]);
    assert_eq!(roles_of("root").await, vec![admin.id]);
    assert!(roles_of("alice").await.is_empty());
}

// -- work item tests --

#[tokio::test]
async fn projects_and_sprints() {
    let (legacy, target) = seeded().await;
    let summary = driver::run(&legacy, &target).await.unwrap();
    assert_eq!(summary.get("projects").map(|s| (s.read, s.created)), Some((2, 2)));

    let portal = ProjectRepo::find_by_code(&target, "portal").await.unwrap().unwrap();
    assert_eq!(portal.id, 3);
    assert_eq!(portal.status, "doing");
    assert_eq!(portal.start_date.as_deref(), Some("2024-01-01"));
    assert_eq!(portal.end_date.as_deref(), Some("2024-12-31"));

    let sprint = ProjectRepo::find_by_code(&target, "sprint_1_2").await.unwrap().unwrap();
    assert_eq!(sprint.id, 4);
    assert_eq!(sprint.status, "wait");
    assert_eq!(sprint.end_date, None);

    let codes: Vec<String> =
        ProjectRepo::list(&target).await.unwrap().into_iter().map(|p| p.code).collect();
    assert_eq!(codes.len(), 4);
    assert!(codes.contains(&"portal".to_string()));
    assert!(codes.contains(&"sprint_1_2".to_string()));

    assert_matches!(ProjectRepo::find_by_code(&target, "umbrella").await, Ok(None));
    assert_matches!(ProjectRepo::find_by_code(&target, "archived").await, Ok(None));
}

#[tokio::test]
async fn requirements_from_stories() {
    let (legacy, target) = seeded().await;
    let summary = driver::run(&legacy, &target).await.unwrap();
    assert_eq!(
        summary.get("requirements"),
        Some(EntityStats { read: 3, created: 2, existing: 0, skipped: 1, failed: 0 })
    );

    let login = RequirementRepo::find_by_legacy_id(&target, 1).await.unwrap().unwrap();
    assert_eq!(login.title, "Login flow");
    assert_eq!(login.description, "Users sign in with SSO");
    assert_eq!(login.status, "active");
    assert_eq!(login.priority, "high");
    assert_eq!(login.project_id, 3);
    assert_eq!(login.creator_id, Some(11));
    assert_eq!(login.assignee_id, Some(12));
    assert_eq!(login.estimated_hours, Some(12.0));

    // Linked through its product only; unknown creator and odd enums.
    let reset = RequirementRepo::find_by_legacy_id(&target, 2).await.unwrap().unwrap();
    assert_eq!(reset.project_id, 4);
    assert_eq!(reset.creator_id, None);
    assert_eq!(reset.assignee_id, None);
    assert_eq!(reset.status, "draft");
    assert_eq!(reset.priority, "medium");
    assert_eq!(reset.estimated_hours, None);

    assert_matches!(RequirementRepo::find_by_legacy_id(&target, 3).await, Ok(None));

    let in_portal = RequirementRepo::list_for_project(&target, 3).await.unwrap();
    let in_sprint = RequirementRepo::list_for_project(&target, 4).await.unwrap();
    assert_eq!(in_portal.iter().map(|r| r.id).collect::<Vec<_>>(), vec![login.id]);
    assert_eq!(in_sprint.iter().map(|r| r.id).collect::<Vec<_>>(), vec![reset.id]);
}

#[tokio::test]
async fn tasks_resolve_execution_and_dates() {
    let (legacy, target) = seeded().await;
    let summary = driver::run(&legacy, &target).await.unwrap();
    assert_eq!(summary.get("tasks").map(|s| (s.created, s.skipped)), Some((2, 1)));

    let requirement = RequirementRepo::find_by_legacy_id(&target, 1).await.unwrap().unwrap();

    let form = TaskRepo::find_by_legacy_id(&target, 1).await.unwrap().unwrap();
    assert_eq!(form.project_id, 4);
    assert_eq!(form.requirement_id, Some(requirement.id));
    assert_eq!(form.status, "doing");
    assert_eq!(form.priority, "urgent");
    assert_eq!((form.creator_id, form.assignee_id), (Some(11), Some(12)));
    assert_eq!(form.start_date.as_deref(), Some("2024-02-01"));
    assert_eq!(form.due_date, None);
    assert_eq!(form.end_date.as_deref(), Some("2024-02-03"));
    assert_eq!(form.estimated_hours, Some(20.0));
    assert_eq!(form.actual_hours, Some(8.0));

    let docs = TaskRepo::find_by_legacy_id(&target, 2).await.unwrap().unwrap();
    assert_eq!(docs.project_id, 3);
    assert_eq!(docs.assignee_id, None);
    assert_eq!(docs.end_date.as_deref(), Some("2024-03-05"));

    assert_matches!(TaskRepo::find_by_legacy_id(&target, 3).await, Ok(None));
}

#[tokio::test]
async fn bugs_with_module_and_assignee() {
    let (legacy, target) = seeded().await;
    let summary = driver::run(&legacy, &target).await.unwrap();
    assert_eq!(summary.get("bugs").map(|s| (s.created, s.skipped)), Some((1, 1)));
    assert_eq!(
        summary.get("modules"),
        Some(EntityStats { read: 3, created: 1, existing: 1, skipped: 1, failed: 0 })
    );

    let checkout = ModuleRepo::find_by_name(&target, "Checkout").await.unwrap().unwrap();
    let requirement = RequirementRepo::find_by_legacy_id(&target, 1).await.unwrap().unwrap();

    let crash = BugRepo::find_by_legacy_id(&target, 1).await.unwrap().unwrap();
    assert_eq!(crash.project_id, 3);
    assert_eq!(crash.severity, "critical");
    assert_eq!(crash.priority, "low");
    assert_eq!(crash.status, "closed");
    assert_eq!(crash.solution, "fixed");
    assert_eq!(crash.solution_note, "build-12");
    assert_eq!(crash.description, "click login");
    assert_eq!(crash.confirmed, 0);
    assert_eq!(crash.creator_id, Some(11));
    assert_eq!(crash.module_id, Some(checkout.id));
    assert_eq!(crash.requirement_id, Some(requirement.id));
    assert_eq!(BugRepo::assignee_ids(&target, crash.id).await.unwrap(), vec![12]);

    assert_matches!(BugRepo::find_by_legacy_id(&target, 2).await, Ok(None));

    let portal_bugs = BugRepo::list_for_project(&target, 3).await.unwrap();
    assert_eq!(portal_bugs.len(), 1);
    assert_eq!(portal_bugs[0].legacy_id, Some(1));
    assert!(BugRepo::list_for_project(&target, 4).await.unwrap().is_empty());
}

// -- membership tests --

#[tokio::test]
async fn members_from_teams() {
    let (legacy, target) = seeded().await;
    let summary = driver::run(&legacy, &target).await.unwrap();
    assert_eq!(
        summary.get("project_members"),
        Some(EntityStats { read: 6, created: 4, existing: 0, skipped: 2, failed: 0 })
    );

    let role = |project_id: i64, user_id: i64| {
        let target = target.clone();
        async move {
            ProjectMemberRepo::find(&target, project_id, user_id)
                .await
                .unwrap()
                .map(|m| m.role)
        }
    };
    assert_eq!(role(3, 11).await.as_deref(), Some("owner"));
    assert_eq!(role(3, 12).await.as_deref(), Some("member"));
    // The task team row lands in the task's execution.
    assert_eq!(role(4, 11).await.as_deref(), Some("member"));
    assert_eq!(role(4, 12).await.as_deref(), Some("member"));
}

#[tokio::test]
async fn members_inferred_without_teams() {
    let legacy = legacy_pool().await;
    exec(&legacy, LEGACY_SNAPSHOT).await;
    let target = target_pool().await;
    pad_target(&target).await;

    let summary = driver::run(&legacy, &target).await.unwrap();
    assert_eq!(
        summary.get("project_members"),
        Some(EntityStats { read: 2, created: 2, existing: 0, skipped: 0, failed: 0 })
    );

    for project_id in [3, 4] {
        let members = ProjectMemberRepo::list_for_project(&target, project_id).await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].user_id, 12);
        assert_eq!(members[0].role, "member");
    }
}

// -- run tests --

#[tokio::test]
async fn run_marks_store_initialized() {
    let (legacy, target) = seeded().await;
    assert!(!SystemConfigRepo::is_initialized(&target).await.unwrap());

    let summary = driver::run(&legacy, &target).await.unwrap();

    assert!(SystemConfigRepo::is_initialized(&target).await.unwrap());
    assert_eq!(summary.total_failed(), 0);
    let order: Vec<&str> = summary.entities.iter().map(|(name, _)| *name).collect();
    assert_eq!(
        order,
        vec![
            "departments",
            "roles",
            "users",
            "projects",
            "modules",
            "requirements",
            "tasks",
            "bugs",
            "project_members",
        ]
    );
}

#[tokio::test]
async fn rerun_creates_nothing_new() {
    let (legacy, target) = seeded().await;
    driver::run(&legacy, &target).await.unwrap();
    let before = table_counts(&target).await;

    let summary = driver::run(&legacy, &target).await.unwrap();

    assert_eq!(table_counts(&target).await, before);
    for (entity, stats) in &summary.entities {
        assert_eq!(stats.created, 0, "{entity}");
        assert_eq!(stats.failed, 0, "{entity}");
        assert_eq!(
            stats.existing + stats.skipped,
            stats.read,
            "{entity}"
        );
    }
    assert_eq!(summary.get("users").map(|s| s.existing), Some(5));
}

#[tokio::test]
async fn rejected_row_is_counted_and_the_run_continues() {
    let (legacy, target) = seeded().await;
    exec(
        &target,
        "CREATE TRIGGER reject_login_form BEFORE INSERT ON tasks
         WHEN NEW.title = 'Build login form'
         BEGIN
             SELECT RAISE(ABORT, 'rejected');
         END;",
    )
    .await;

    let summary = driver::run(&legacy, &target).await.unwrap();

    assert_eq!(
        summary.get("tasks"),
        Some(EntityStats { read: 3, created: 1, existing: 0, skipped: 1, failed: 1 })
    );
    assert_eq!(summary.total_failed(), 1);
    assert_matches!(TaskRepo::find_by_legacy_id(&target, 1).await, Ok(None));

    // Rows after the rejected one, and later migrators, still ran.
    let docs = TaskRepo::find_by_legacy_id(&target, 2).await.unwrap().unwrap();
    assert_eq!(docs.title, "Write docs");
    assert_eq!(summary.get("bugs").map(|s| s.created), Some(1));
    assert!(SystemConfigRepo::is_initialized(&target).await.unwrap());
}

#[tokio::test]
async fn empty_legacy_store() {
    let legacy = legacy_pool().await;
    let target = target_pool().await;

    let summary = driver::run(&legacy, &target).await.unwrap();

    assert!(summary.entities.iter().all(|(_, s)| s.read == 0));
    assert_eq!(count(&target, "users").await, 0);
    assert!(SystemConfigRepo::is_initialized(&target).await.unwrap());
}

#[tokio::test]
async fn missing_user_table_aborts_the_run() {
    let legacy = legacy_pool().await;
    exec(&legacy, "DROP TABLE zt_user;").await;
    let target = target_pool().await;

    let result = driver::run(&legacy, &target).await;

    assert_matches!(
        result,
        Err(pmhub_migrate::error::MigrateError::Read { entity: "users", .. })
    );
    assert!(!SystemConfigRepo::is_initialized(&target).await.unwrap());
}
