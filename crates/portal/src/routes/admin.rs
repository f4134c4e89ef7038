//! Admin panel route handlers.
//!
//! Renders the user list from the directory projection and issues
//! status-transition commands back through the gateway. There is no
//! optimistic update: the panel shows the new status only after the change
//! event lands in the projection.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, FixedOffset, Utc};
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use cotador_core::{AccountStatus, AdminAction, UserId};

use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::User;
use crate::state::AppState;

/// Brasília offset used for registration timestamps.
const BRT_OFFSET_SECONDS: i32 = -3 * 3600;

/// Two-way list filter: pending requests only, or every non-admin user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListFilter {
    #[default]
    Pending,
    All,
}

impl ListFilter {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::All => "all",
        }
    }
}

/// Query parameters for the panel page.
#[derive(Debug, Deserialize)]
pub struct PanelQuery {
    #[serde(default)]
    pub filter: ListFilter,
}

/// Status-transition form data. Carries the filter so the redirect lands on
/// the same view.
#[derive(Debug, Deserialize)]
pub struct ActionForm {
    pub action: AdminAction,
    #[serde(default)]
    pub filter: ListFilter,
}

/// User row view for the panel template.
#[derive(Debug, Clone)]
pub struct UserListItem {
    pub id: String,
    pub name: String,
    pub cpf: String,
    pub email: String,
    pub phone: String,
    pub status_label: &'static str,
    pub is_pending: bool,
    pub is_approved: bool,
    pub is_rejected: bool,
    pub registered_at: String,
}

impl From<&User> for UserListItem {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            cpf: user.cpf.as_str().to_owned(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            status_label: status_label(user.status),
            is_pending: user.status == AccountStatus::Pending,
            is_approved: user.status == AccountStatus::Approved,
            is_rejected: user.status == AccountStatus::Rejected,
            registered_at: format_registered_at(user.created_at),
        }
    }
}

const fn status_label(status: AccountStatus) -> &'static str {
    match status {
        AccountStatus::Pending => "Aguardando Aprovação",
        AccountStatus::Approved => "Aprovado",
        AccountStatus::Rejected => "Recusado",
    }
}

fn format_registered_at(at: DateTime<Utc>) -> String {
    FixedOffset::east_opt(BRT_OFFSET_SECONDS).map_or_else(
        || at.format("%d/%m/%Y às %H:%M").to_string(),
        |offset| at.with_timezone(&offset).format("%d/%m/%Y às %H:%M").to_string(),
    )
}

/// Admin panel page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/index.html")]
pub struct AdminTemplate {
    pub admin_name: String,
    pub filter: &'static str,
    pub users: Vec<UserListItem>,
    pub pending_count: usize,
}

/// Admin panel page handler.
#[instrument(skip(admin, state))]
pub async fn index(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<PanelQuery>,
) -> impl IntoResponse {
    let directory = state.directory();
    let users = match query.filter {
        ListFilter::Pending => directory.pending().await,
        ListFilter::All => directory.non_admins().await,
    };

    AdminTemplate {
        admin_name: admin.display_name().to_owned(),
        filter: query.filter.as_str(),
        users: users.iter().map(UserListItem::from).collect(),
        pending_count: directory.pending_count().await,
    }
}

/// Status-transition command handler.
///
/// The form carries the platform identifier of the row it was rendered for,
/// so no lookup through the cached list is needed. Illegal transitions are
/// rejected loudly rather than silently ignored.
#[instrument(skip(admin, state))]
pub async fn update_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Form(form): Form<ActionForm>,
) -> Result<Response, AppError> {
    let id = UserId::new(id);
    let user = state
        .directory()
        .find(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("user {id}")))?;

    let target = form.action.target();
    if !user.status.can_transition_to(target) {
        return Err(AppError::BadRequest(format!(
            "cannot move a {} account to {target}",
            user.status
        )));
    }

    state.gateway().update_status(id, target).await?;
    tracing::info!(
        user = %user.cpf,
        admin = %admin.cpf,
        from = %user.status,
        to = %target,
        "status transition issued"
    );

    Ok(Redirect::to(&format!("/admin?filter={}", form.filter.as_str())).into_response())
}
