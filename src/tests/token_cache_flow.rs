// Token acquisition against a stubbed identity service:
//  - fresh cached tokens are served without a network call
//  - tokens inside the 60 second margin (or past exp) are re-acquired once
//  - non-200 answers surface status and body verbatim

#[cfg(test)]
mod test {
    use std::time::Duration;

    use axum::http::StatusCode;
    use httpmock::prelude::*;

    use crate::auth::{AuthError, CredentialOverrides};
    use crate::cache::CredentialCache;
    use crate::tests::common::{build_manager, json, now_u64, sample_jwt, spawn_identity, IdentityReply};

    #[tokio::test]
    async fn second_call_within_validity_uses_cache() {
        let identity = spawn_identity(IdentityReply::Token { ttl_seconds: 3600 }, Duration::ZERO).await;
        let manager = build_manager(&identity.url, false);

        let first = manager.get_token(None).await.unwrap();
        let second = manager.get_token(None).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(identity.stats.calls(), 1);
    }

    #[tokio::test]
    async fn placeholder_token_is_returned_then_fails_to_decode_from_cache() {
        let identity = spawn_identity(IdentityReply::Fixed("abc.def.ghi".into()), Duration::ZERO).await;
        let manager = build_manager(&identity.url, false);

        assert_eq!(manager.get_token(None).await.unwrap(), "abc.def.ghi");

        // malformed cached token is an error, not a cache miss
        let err = manager.get_token(None).await.unwrap_err();
        assert!(matches!(err, AuthError::Decode(_)), "unexpected error: {err:?}");
        assert_eq!(identity.stats.calls(), 1);
    }

    #[tokio::test]
    async fn token_inside_safety_margin_is_reacquired() {
        let identity = spawn_identity(IdentityReply::Token { ttl_seconds: 30 }, Duration::ZERO).await;
        let manager = build_manager(&identity.url, false);

        let first = manager.get_token(None).await.unwrap();
        let second = manager.get_token(None).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(identity.stats.calls(), 2);
    }

    #[tokio::test]
    async fn expired_token_is_removed_and_reacquired_once() {
        let identity = spawn_identity(IdentityReply::Token { ttl_seconds: 3600 }, Duration::ZERO).await;
        let manager = build_manager(&identity.url, false);
        let key = format!("{}|A|U", identity.url);
        manager.cache().set(&key, sample_jwt(now_u64() - 10)).await;

        let token = manager.get_token(None).await.unwrap();

        assert_eq!(identity.stats.calls(), 1);
        assert_eq!(manager.cache().get(&key).await, Some(token));
    }

    #[tokio::test]
    async fn api_error_carries_status_and_body() {
        let identity = spawn_identity(
            IdentityReply::Status(StatusCode::UNAUTHORIZED, "invalid credentials".into()),
            Duration::ZERO,
        )
        .await;
        let manager = build_manager(&identity.url, false);

        match manager.get_token(None).await {
            Err(AuthError::Api { status, body }) => {
                assert_eq!(status, 401);
                assert_eq!(body, "invalid credentials");
            }
            other => panic!("expected api error, got {:?}", other),
        }
        assert_eq!(manager.cache().get(&format!("{}|A|U", identity.url)).await, None);
    }

    #[tokio::test]
    async fn override_account_gets_its_own_cache_entry() {
        let identity = spawn_identity(IdentityReply::Token { ttl_seconds: 3600 }, Duration::ZERO).await;
        let manager = build_manager(&identity.url, false);
        let overrides = CredentialOverrides::new().account("B");

        let default_token = manager.get_token(None).await.unwrap();
        let other_token = manager.get_token(Some(&overrides)).await.unwrap();
        assert_ne!(default_token, other_token);
        assert_eq!(identity.stats.calls(), 2);

        // both stay cached side by side
        assert_eq!(manager.get_token(None).await.unwrap(), default_token);
        assert_eq!(manager.get_token(Some(&overrides)).await.unwrap(), other_token);
        assert_eq!(identity.stats.calls(), 2);
        assert_eq!(manager.cache().len().await, 2);
    }

    #[tokio::test]
    async fn invalidate_forces_a_new_acquisition() {
        let identity = spawn_identity(IdentityReply::Token { ttl_seconds: 3600 }, Duration::ZERO).await;
        let manager = build_manager(&identity.url, false);

        manager.get_token(None).await.unwrap();
        manager.invalidate(None).await.unwrap();
        manager.get_token(None).await.unwrap();
        manager.clear().await;
        manager.get_token(None).await.unwrap();

        assert_eq!(identity.stats.calls(), 3);
    }

    #[tokio::test]
    async fn missing_token_field_is_a_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/authenticate");
                then.status(200).json_body(json!({ "tok": "x" }));
            })
            .await;
        let manager = build_manager(&server.base_url(), false);

        let err = manager.get_token(None).await.unwrap_err();
        assert!(matches!(err, AuthError::Decode(_)), "unexpected error: {err:?}");
    }

    #[tokio::test]
    async fn authenticate_request_carries_resolved_credentials() {
        let token = sample_jwt(now_u64() + 3600);
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/authenticate")
                    .json_body(json!({ "accountId": "A", "userId": "other", "password": "P" }));
                then.status(200).json_body(json!({ "token": token }));
            })
            .await;
        let manager = build_manager(&server.base_url(), false);
        let overrides = CredentialOverrides::new().user_id("other").password("");

        assert_eq!(manager.get_token(Some(&overrides)).await.unwrap(), token);
    }

    #[tokio::test]
    async fn unreachable_identity_is_a_transport_error() {
        let manager = build_manager("http://127.0.0.1:1", false);
        let err = manager.get_token(None).await.unwrap_err();
        assert!(matches!(err, AuthError::Transport(_)), "unexpected error: {err:?}");
    }

    #[tokio::test]
    async fn delimiter_in_override_is_rejected_before_any_call() {
        let identity = spawn_identity(IdentityReply::Token { ttl_seconds: 3600 }, Duration::ZERO).await;
        let manager = build_manager(&identity.url, false);
        let overrides = CredentialOverrides::new().user_id("evil|user");

        let err = manager.get_token(Some(&overrides)).await.unwrap_err();
        assert!(matches!(err, AuthError::RequestBuild(_)));
        assert_eq!(identity.stats.calls(), 0);
    }
}
