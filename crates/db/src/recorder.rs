//! Change recorder: persists audit Actions and their field Histories.
//!
//! Called by mutation paths after an entity has been written. The recorder
//! diffs the two snapshots, renders a display value for each side of each
//! change, and writes one Action plus its Histories in a single
//! transaction. An empty diff writes nothing.
//!
//! All lookups (display rendering, project scope) happen before the
//! transaction is opened. A failure surfaces as `sqlx::Error`; the caller's
//! own mutation is not rolled back.

use pmhub_core::actor::ActorContext;
use pmhub_core::audit::ObjectType;
use pmhub_core::changes::{diff_snapshots, Auditable, FieldChange};
use pmhub_core::display::{
    is_empty_reference, parse_id_list, render_kind, render_static, user_label, RenderKind,
};
use pmhub_core::types::{format_timestamp, DbId};

use crate::models::action::{CreateAction, CreateHistory};
use crate::repositories::{
    ActionRepo, BugRepo, ModuleRepo, ProjectRepo, RequirementRepo, TaskRepo, UserRepo, VersionRepo,
};
use crate::DbPool;

/// The object an audit entry is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditSubject {
    pub object_type: ObjectType,
    pub object_id: DbId,
}

impl AuditSubject {
    pub fn new(object_type: ObjectType, object_id: DbId) -> Self {
        Self {
            object_type,
            object_id,
        }
    }
}

pub struct ChangeRecorder;

impl ChangeRecorder {
    /// Diff `old` against `new` and record the changes under `action`.
    ///
    /// Returns the new action id, or `None` when nothing comparable changed.
    pub async fn record_changes<T, C>(
        pool: &DbPool,
        ctx: &C,
        subject: AuditSubject,
        action: &str,
        old: &T,
        new: &T,
    ) -> Result<Option<DbId>, sqlx::Error>
    where
        T: Auditable + ?Sized,
        C: ActorContext + ?Sized,
    {
        let changes = diff_snapshots(old, new);
        Self::record_field_changes(pool, ctx, subject, action, &changes).await
    }

    /// Record an explicit change list, e.g. for multi-valued fields such as
    /// `assignee_ids` that a snapshot diff does not see.
    pub async fn record_field_changes<C>(
        pool: &DbPool,
        ctx: &C,
        subject: AuditSubject,
        action: &str,
        changes: &[FieldChange],
    ) -> Result<Option<DbId>, sqlx::Error>
    where
        C: ActorContext + ?Sized,
    {
        if changes.is_empty() {
            return Ok(None);
        }

        let mut histories = Vec::with_capacity(changes.len());
        for change in changes {
            histories.push(CreateHistory {
                field: change.field.clone(),
                old_display: render_value(pool, &change.field, &change.old).await?,
                new_display: render_value(pool, &change.field, &change.new).await?,
                old_value: change.old.clone(),
                new_value: change.new.clone(),
                diff: None,
            });
        }

        let record = Self::new_action(pool, ctx, subject, action, "", None).await?;
        let action_id = ActionRepo::create_with_histories(pool, &record, &histories).await?;

        tracing::debug!(
            action_id,
            object_type = %subject.object_type,
            object_id = subject.object_id,
            action,
            fields = histories.len(),
            "Recorded field changes",
        );
        Ok(Some(action_id))
    }

    /// Record a bare action without field histories, such as `created` or
    /// `commented`.
    pub async fn record_action<C>(
        pool: &DbPool,
        ctx: &C,
        subject: AuditSubject,
        action: &str,
        comment: Option<&str>,
        extra: Option<&serde_json::Value>,
    ) -> Result<DbId, sqlx::Error>
    where
        C: ActorContext + ?Sized,
    {
        let record =
            Self::new_action(pool, ctx, subject, action, comment.unwrap_or_default(), extra).await?;
        let action_id = ActionRepo::create_with_histories(pool, &record, &[]).await?;

        tracing::debug!(
            action_id,
            object_type = %subject.object_type,
            object_id = subject.object_id,
            action,
            "Recorded action",
        );
        Ok(action_id)
    }

    async fn new_action<C>(
        pool: &DbPool,
        ctx: &C,
        subject: AuditSubject,
        action: &str,
        comment: &str,
        extra: Option<&serde_json::Value>,
    ) -> Result<CreateAction, sqlx::Error>
    where
        C: ActorContext + ?Sized,
    {
        Ok(CreateAction {
            object_type: subject.object_type.as_str().to_string(),
            object_id: subject.object_id,
            project_id: project_scope(pool, subject).await?,
            actor_id: ctx.actor_id(),
            action: action.to_string(),
            date: format_timestamp(&ctx.now()),
            comment: comment.to_string(),
            extra: extra.map(|value| value.to_string()),
        })
    }
}

/// Project an audit entry is scoped to, looked up from the referenced row.
async fn project_scope(pool: &DbPool, subject: AuditSubject) -> Result<Option<DbId>, sqlx::Error> {
    match subject.object_type {
        ObjectType::Bug => BugRepo::project_id(pool, subject.object_id).await,
        ObjectType::Task => TaskRepo::project_id(pool, subject.object_id).await,
        ObjectType::Requirement => RequirementRepo::project_id(pool, subject.object_id).await,
        ObjectType::Project => Ok(Some(subject.object_id)),
        ObjectType::User | ObjectType::Department | ObjectType::Role => Ok(None),
    }
}

// ---------------------------------------------------------------------------
// Display rendering
// ---------------------------------------------------------------------------

/// Render a raw field value for display.
///
/// Reference fields resolve to the referenced row's label; unresolvable
/// references keep the raw id. Empty and `0` references render as empty.
pub async fn render_value(pool: &DbPool, field: &str, raw: &str) -> Result<String, sqlx::Error> {
    let kind = render_kind(field);
    if let Some(rendered) = render_static(kind, raw) {
        return Ok(rendered);
    }
    if is_empty_reference(raw) {
        return Ok(String::new());
    }

    if kind == RenderKind::UserList {
        let mut labels = Vec::new();
        for id in parse_id_list(raw) {
            let label = render_reference(pool, RenderKind::User, id).await?;
            labels.push(label.unwrap_or_else(|| id.to_string()));
        }
        return Ok(labels.join(","));
    }

    let Ok(id) = raw.trim().parse::<DbId>() else {
        return Ok(raw.to_string());
    };
    Ok(render_reference(pool, kind, id)
        .await?
        .unwrap_or_else(|| raw.to_string()))
}

async fn render_reference(
    pool: &DbPool,
    kind: RenderKind,
    id: DbId,
) -> Result<Option<String>, sqlx::Error> {
    let label = match kind {
        RenderKind::User | RenderKind::UserList => UserRepo::find_by_id(pool, id)
            .await?
            .map(|u| user_label(&u.username, &u.nickname)),
        RenderKind::Project => ProjectRepo::find_by_id(pool, id).await?.map(|p| p.name),
        RenderKind::Requirement => RequirementRepo::find_by_id(pool, id).await?.map(|r| r.title),
        RenderKind::Module => ModuleRepo::find_by_id(pool, id).await?.map(|m| m.name),
        RenderKind::Version => VersionRepo::find_by_id(pool, id)
            .await?
            .map(|v| v.version_number),
        RenderKind::Status
        | RenderKind::Priority
        | RenderKind::Severity
        | RenderKind::Solution
        | RenderKind::Confirmed
        | RenderKind::Raw => None,
    };
    Ok(label)
}
