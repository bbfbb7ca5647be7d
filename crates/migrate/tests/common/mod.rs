#![allow(dead_code)]

use pmhub_db::{DbBackend, DbPool};

/// The legacy `zt_*` schema, shared with the db crate's tests.
pub const LEGACY_SCHEMA: &str = include_str!("../../../db/tests/fixtures/zentao_schema.sql");

pub async fn target_pool() -> DbPool {
    let pool = pmhub_db::create_pool("sqlite::memory:").await.unwrap();
    pmhub_db::run_migrations(&pool, DbBackend::Sqlite).await.unwrap();
    pool
}

/// An empty legacy store.
pub async fn legacy_pool() -> DbPool {
    let pool = pmhub_db::create_pool("sqlite::memory:").await.unwrap();
    sqlx::raw_sql(LEGACY_SCHEMA).execute(&pool).await.unwrap();
    pool
}

pub async fn exec(pool: &DbPool, sql: &str) {
    sqlx::raw_sql(sql).execute(pool).await.unwrap();
}

pub async fn count(pool: &DbPool, table: &str) -> i64 {
    let (n,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap();
    n
}

/// A small but complete legacy snapshot.
///
/// Legacy ids are chosen so the literal end-to-end scenarios line up once
/// [`pad_target`] has pre-filled the target store.
pub const LEGACY_SNAPSHOT: &str = r#"
INSERT INTO zt_dept (id, name, parent, grade, `order`) VALUES
    (1, 'R&D', 0, 1, 0),
    (2, 'Backend', 1, 2, 0),
    (3, 'Frontend', 1, 2, 1);

INSERT INTO zt_group (id, name, `desc`) VALUES
    (1, '管理员', 'administrators'),
    (2, 'Developers', 'dev team');
INSERT INTO zt_grouppriv (`group`, module, method) VALUES
    (2, 'bug', 'create'),
    (2, 'story', 'edit'),
    (2, 'story', 'update'),
    (2, 'report', 'export');
INSERT INTO zt_usergroup (account, `group`) VALUES
    ('bob', 2),
    ('root', 1);

INSERT INTO zt_user (id, account, realname, email, mobile, avatar, dept, role, deleted) VALUES
    (42, 'alice', 'Alice Wang', 'alice@x', '', '', 1, '', '0'),
    (43, 'bob', '', 'bob@x', '', '', 2, 'dev', '0'),
    (44, 'admin', 'Administrator', '', '', '', 0, '', '0'),
    (45, 'root', 'Root', '', '', '', 0, '', '0'),
    (46, 'carol', 'Carol', '', '', '', 3, '', '1');

INSERT INTO zt_project (id, type, name, code, `desc`, `begin`, `end`, status, deleted) VALUES
    (1, 'project', 'Web Portal', 'portal', 'customer portal', '2024-01-01', '2024-12-31', 'doing', '0'),
    (2, 'sprint', 'Sprint 1', '', '', '2024-02-01', '0000-00-00', 'bogus', '0'),
    (3, 'program', 'Umbrella', 'umbrella', '', NULL, NULL, 'doing', '0'),
    (4, 'project', 'Archived', 'archived', '', NULL, NULL, 'closed', '1');

INSERT INTO zt_module (id, root, name, type, parent, grade) VALUES
    (1, 1, 'Checkout', 'story', 0, 1),
    (2, 1, 'Checkout', 'bug', 0, 1),
    (3, 1, '', 'bug', 0, 1);

INSERT INTO zt_story (id, product, title, status, pri, estimate, openedBy, assignedTo, deleted) VALUES
    (1, 7, 'Login flow', 'active', 2, 1.5, 'alice', 'bob', '0'),
    (2, 7, 'Password reset', 'weird', 9, 0, 'ghost', '', '0'),
    (3, 8, 'Orphan story', 'draft', 3, 1, 'alice', '', '0'),
    (4, 7, 'Deleted story', 'active', 1, 1, 'alice', '', '1');
INSERT INTO zt_storyspec (story, version, title, spec) VALUES
    (1, 1, 'Login flow', 'old'),
    (1, 2, 'Login flow', 'Users sign in with SSO');
INSERT INTO zt_projectstory (project, product, story) VALUES (1, 7, 1);
INSERT INTO zt_projectproduct (project, product) VALUES (3, 7), (2, 7);

INSERT INTO zt_task (id, project, execution, story, name, `desc`, status, pri, openedBy, assignedTo, estStarted, deadline, estimate, consumed, deleted) VALUES
    (1, 1, 2, 1, 'Build login form', 'form', 'doing', 1, 'alice', 'bob', '2024-02-01', '0000-00-00', 2.5, 1, '0'),
    (2, 1, 0, 0, 'Write docs', '', 'done', 3, 'bob', '', '2024-03-01', '2024-03-05', 1, 1, '0'),
    (3, 99, 0, 0, 'Lost task', '', 'wait', 3, '', '', NULL, NULL, 0, 0, '0');

INSERT INTO zt_bug (id, project, product, module, story, title, steps, status, severity, pri, openedBy, assignedTo, resolution, resolvedBuild, deleted) VALUES
    (1, 1, 7, 2, 1, 'Crash on login', 'click login', 'closed', 1, 4, 'alice', 'bob', 'fixed', 'build-12', '0'),
    (2, 99, 7, 0, 0, 'Lost bug', '', 'active', 3, 3, '', '', '', '', '0');
"#;

/// Legacy team rows, kept apart so tests can exercise member inference.
pub const LEGACY_TEAMS: &str = r#"
INSERT INTO zt_team (id, root, type, account, role) VALUES
    (1, 1, 'project', 'alice', '项目经理'),
    (2, 1, 'project', 'bob', '开发'),
    (3, 2, 'execution', 'bob', 'developer'),
    (4, 1, 'task', 'alice', 'tester'),
    (5, 99, 'project', 'alice', 'pm'),
    (6, 1, 'project', 'ghost', 'dev');
"#;

/// Pre-fill the target store so the first migrated department gets id 7,
/// the first migrated user id 11 and the first migrated project id 3.
pub async fn pad_target(target: &DbPool) {
    let mut sql = String::new();
    for n in 1..=6 {
        sql.push_str(&format!(
            "INSERT INTO departments (name, code, level, sort, status, created_at, updated_at)
             VALUES ('Pad {n}', 'pad_{n}', 1, 0, 1, '2024-01-01 00:00:00', '2024-01-01 00:00:00');\n"
        ));
    }
    for n in 1..=10 {
        sql.push_str(&format!(
            "INSERT INTO users (username, nickname, password_hash, created_at, updated_at)
             VALUES ('pad{n}', 'Pad {n}', 'x', '2024-01-01 00:00:00', '2024-01-01 00:00:00');\n"
        ));
    }
    for n in 1..=2 {
        sql.push_str(&format!(
            "INSERT INTO projects (name, code, created_at, updated_at)
             VALUES ('Pad {n}', 'pad_{n}', '2024-01-01 00:00:00', '2024-01-01 00:00:00');\n"
        ));
    }
    exec(target, &sql).await;
}

/// Legacy snapshot with teams, and a padded target store.
pub async fn seeded() -> (DbPool, DbPool) {
    let legacy = legacy_pool().await;
    exec(&legacy, LEGACY_SNAPSHOT).await;
    exec(&legacy, LEGACY_TEAMS).await;

    let target = target_pool().await;
    pad_target(&target).await;
    (legacy, target)
}
