use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use shared_models::auth::Role;
use shared_models::error::AppError;
use shared_utils::extractor::{bearer_token, RequiredRoles};

use crate::state::SchedulingState;

/// Roles allowed to book: everyone except clinicians.
pub const BOOKING_ROLES: RequiredRoles = RequiredRoles(&[Role::Admin, Role::FrontDesk, Role::Patient]);

/// Authentication stage for the Scheduling Service. The credential is checked
/// by the Identity Service on every request; there is no local fallback.
pub async fn remote_auth_middleware(
    State(state): State<Arc<SchedulingState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?.to_string();

    let user = state.identity.validate_token(&token).await?;
    debug!("Authenticated user {} ({}) via identity service", user.id, user.role.as_str());

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
