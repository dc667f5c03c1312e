//! Player identity from the `Authorization` header.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use novella_core::ids::PlayerId;
use tracing::debug;

/// The caller's player id, or `None` when it cannot be resolved.
///
/// Resolved from `Authorization: Bearer <uuid>`. A missing, non-bearer or
/// unparsable header yields `None`; the extractor itself never rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity(pub Option<PlayerId>);

impl<S: Send + Sync> FromRequestParts<S> for Identity {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let player_id = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_bearer);
        if player_id.is_none() && parts.headers.contains_key(AUTHORIZATION) {
            debug!("authorization header present but not a player bearer token");
        }
        Ok(Self(player_id))
    }
}

fn parse_bearer(header: &str) -> Option<PlayerId> {
    let (scheme, token) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    token.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[test]
    fn test_parse_bearer_accepts_uuid_token() {
        let id = Uuid::new_v4();

        assert_eq!(parse_bearer(&format!("Bearer {id}")), Some(PlayerId(id)));
        assert_eq!(parse_bearer(&format!("bearer  {id}")), Some(PlayerId(id)));
    }

    #[test]
    fn test_parse_bearer_rejects_other_schemes_and_garbage() {
        let id = Uuid::new_v4();

        assert_eq!(parse_bearer(&format!("Basic {id}")), None);
        assert_eq!(parse_bearer("Bearer not-a-uuid"), None);
        assert_eq!(parse_bearer("Bearer"), None);
    }
}
