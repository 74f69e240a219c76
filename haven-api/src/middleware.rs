use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use haven_shared::rpc::INTERNAL_KEY_HEADER;

use crate::error::AppError;
use crate::state::PropertyAppState;

/// Guards the property-internal procedures with the shared key, if one is configured.
pub async fn require_internal_key(
    State(state): State<PropertyAppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.internal_key.as_deref() else {
        return Ok(next.run(req).await);
    };

    let presented = req
        .headers()
        .get(INTERNAL_KEY_HEADER)
        .and_then(|h| h.to_str().ok());

    if presented != Some(expected) {
        tracing::warn!(path = %req.uri().path(), "Rejected internal call without a valid key");
        return Err(AppError::AuthenticationError(
            "missing or invalid internal key".to_string(),
        ));
    }

    Ok(next.run(req).await)
}
