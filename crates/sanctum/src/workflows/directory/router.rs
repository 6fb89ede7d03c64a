use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::service::{filter_entries, AccountProvider, DirectoryEntry, RoleFilter, UserDirectory};
use crate::error::AppError;
use crate::workflows::priest::router::ACTOR_HEADER;
use crate::workflows::profiles::{ProfileRepository, UserId};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DirectoryQuery {
    #[serde(default)]
    pub(crate) filter: RoleFilter,
    #[serde(default)]
    pub(crate) search: String,
}

/// Router builder for the admin user directory.
pub fn directory_router<P, A>(directory: Arc<UserDirectory<P, A>>) -> Router
where
    P: ProfileRepository + 'static,
    A: AccountProvider + 'static,
{
    Router::new()
        .route("/api/v1/admin/users", get(list_users_handler::<P, A>))
        .with_state(directory)
}

pub(crate) async fn list_users_handler<P, A>(
    State(directory): State<Arc<UserDirectory<P, A>>>,
    headers: HeaderMap,
    Query(query): Query<DirectoryQuery>,
) -> Result<Json<Vec<DirectoryEntry>>, AppError>
where
    P: ProfileRepository + 'static,
    A: AccountProvider + 'static,
{
    let caller = headers
        .get(ACTOR_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(AppError::MissingIdentity)?;

    let actor = directory.actor(&UserId::new(caller))?;
    let entries = directory.list_with_email(&actor)?;
    Ok(Json(filter_entries(&entries, query.filter, &query.search)))
}
