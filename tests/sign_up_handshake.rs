#![allow(clippy::unwrap_used, clippy::expect_used)]

use async_trait::async_trait;
use budsafe::{
    graphql::{ClientAccessor, GraphQLClientHandle},
    identity::{
        AuthCredential, BearerToken, FirebaseAuth, FirebaseConfig, IdentityError,
        IdentityProvider,
    },
    signup::{
        CreatedUser, HandshakeStatus, SignUpError, SignUpFlow, SignUpPhase, SignUpRequest,
    },
};
use secrecy::SecretString;
use serde_json::json;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use url::Url;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request() -> SignUpRequest {
    SignUpRequest {
        first_name: "Ann".to_string(),
        last_name: "Lee".to_string(),
        email: "a@x.com".to_string(),
        password: SecretString::from("secret123"),
    }
}

fn client_for(server: &MockServer) -> GraphQLClientHandle {
    let endpoint = Url::parse(&format!("{}/query", server.uri())).unwrap();
    ClientAccessor::new(endpoint).get_client()
}

fn firebase_for(server: &MockServer) -> FirebaseAuth {
    FirebaseAuth::new(
        FirebaseConfig::new(SecretString::from("test-api-key")).with_emulator_host(&server.uri()),
    )
}

async fn mount_firebase_sign_up(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/identitytoolkit.googleapis.com/v1/accounts:signUp"))
        .and(query_param("key", "test-api-key"))
        .and(body_partial_json(json!({
            "email": "a@x.com",
            "password": "secret123",
            "returnSecureToken": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kind": "identitytoolkit#SignupNewUserResponse",
            "localId": "fb1",
            "email": "a@x.com",
            "idToken": "tok1",
            "refreshToken": "refresh1",
            "expiresIn": "3600"
        })))
        .expect(1)
        .mount(server)
        .await;
}

fn created_user_body() -> serde_json::Value {
    json!({
        "data": { "createUser": {
            "id": "1",
            "email": "a@x.com",
            "firstName": "Ann",
            "lastName": "Lee",
            "firebaseId": "fb1",
            "role": "STAFF"
        } }
    })
}

#[tokio::test]
async fn successful_sign_up_creates_profile_with_bearer_token() {
    let identity = MockServer::start().await;
    let backend = MockServer::start().await;
    mount_firebase_sign_up(&identity).await;

    Mock::given(method("POST"))
        .and(path("/query"))
        .and(header("authorization", "Bearer tok1"))
        .and(body_partial_json(json!({
            "variables": { "input": {
                "firstName": "Ann",
                "lastName": "Lee",
                "role": "STAFF"
            } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(created_user_body()))
        .expect(1)
        .mount(&backend)
        .await;

    let flow = SignUpFlow::new(firebase_for(&identity), client_for(&backend));
    let user = flow.sign_up(request()).await.unwrap();

    assert_eq!(
        user,
        CreatedUser {
            id: "1".to_string(),
            email: "a@x.com".to_string(),
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            firebase_id: "fb1".to_string(),
            role: "STAFF".to_string(),
        }
    );
    assert_eq!(flow.status(), HandshakeStatus::Succeeded(user));
    assert_eq!(
        flow.status().message(),
        "Success! User profile created in database. User ID: 1"
    );
}

#[tokio::test]
async fn rejected_identity_step_never_reaches_backend() {
    let identity = MockServer::start().await;
    let backend = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/identitytoolkit.googleapis.com/v1/accounts:signUp"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": 400,
                "message": "EMAIL_EXISTS",
                "errors": [{ "message": "EMAIL_EXISTS", "domain": "global", "reason": "invalid" }]
            }
        })))
        .expect(1)
        .mount(&identity)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(created_user_body()))
        .expect(0)
        .mount(&backend)
        .await;

    let flow = SignUpFlow::new(firebase_for(&identity), client_for(&backend));
    let err = flow.sign_up(request()).await.unwrap_err();

    assert_eq!(err.phase(), Some(SignUpPhase::IdentityProvider));
    assert!(err.to_string().contains("email already in use"));
    match flow.status() {
        HandshakeStatus::Failed(failed) => assert_eq!(failed, err),
        other => panic!("unexpected status: {other:?}"),
    }
    assert!(flow.status().message().contains("email already in use"));
}

#[tokio::test]
async fn backend_error_list_surfaces_first_message() {
    let identity = MockServer::start().await;
    let backend = MockServer::start().await;
    mount_firebase_sign_up(&identity).await;

    Mock::given(method("POST"))
        .and(path("/query"))
        .and(header("authorization", "Bearer tok1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{ "message": "unauthorized" }, { "message": "second" }],
            "data": null
        })))
        .expect(1)
        .mount(&backend)
        .await;

    let flow = SignUpFlow::new(firebase_for(&identity), client_for(&backend));
    let err = flow.sign_up(request()).await.unwrap_err();

    assert_eq!(err, SignUpError::BackendMutation("unauthorized".to_string()));
    assert_eq!(err.to_string(), "unauthorized");
    assert_eq!(flow.status(), HandshakeStatus::Failed(err));
}

#[tokio::test]
async fn token_failure_never_reaches_backend() {
    let identity = MockServer::start().await;
    let backend = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/identitytoolkit.googleapis.com/v1/accounts:signUp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "localId": "fb1",
            "idToken": "stale",
            "refreshToken": "refresh1",
            "expiresIn": "0"
        })))
        .expect(1)
        .mount(&identity)
        .await;

    Mock::given(method("POST"))
        .and(path("/securetoken.googleapis.com/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 400, "message": "USER_DISABLED" }
        })))
        .expect(1)
        .mount(&identity)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(created_user_body()))
        .expect(0)
        .mount(&backend)
        .await;

    let flow = SignUpFlow::new(firebase_for(&identity), client_for(&backend));
    let err = flow.sign_up(request()).await.unwrap_err();

    assert_eq!(err.phase(), Some(SignUpPhase::TokenFetch));
    assert_eq!(
        err,
        SignUpError::TokenFetch("user account has been disabled (USER_DISABLED)".to_string())
    );
    assert_eq!(flow.status(), HandshakeStatus::Failed(err));
    assert!(flow.is_submit_enabled());
}

/// Fails the first sign-up call, succeeds afterwards.
struct FlakyProvider {
    calls: AtomicUsize,
}

struct FixedCredential;

#[async_trait]
impl AuthCredential for FixedCredential {
    fn uid(&self) -> &str {
        "fb1"
    }

    async fn id_token(&mut self) -> Result<BearerToken, IdentityError> {
        Ok(BearerToken::from("tok1"))
    }
}

#[async_trait]
impl IdentityProvider for FlakyProvider {
    type Credential = FixedCredential;

    async fn create_user_with_password(
        &self,
        _email: &str,
        _password: &SecretString,
    ) -> Result<FixedCredential, IdentityError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err(IdentityError::Rejected {
                code: "TOO_MANY_ATTEMPTS_TRY_LATER".to_string(),
                message: "too many attempts, try again later".to_string(),
            });
        }
        Ok(FixedCredential)
    }
}

#[tokio::test]
async fn retry_after_failure_starts_clean() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(header("authorization", "Bearer tok1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(created_user_body()))
        .expect(1)
        .mount(&backend)
        .await;

    let flow = SignUpFlow::new(
        FlakyProvider {
            calls: AtomicUsize::new(0),
        },
        client_for(&backend),
    );
    let mut status = flow.subscribe();

    let first = flow.sign_up(request()).await.unwrap_err();
    assert_eq!(first.phase(), Some(SignUpPhase::IdentityProvider));
    assert!(matches!(flow.status(), HandshakeStatus::Failed(_)));
    assert!(flow.is_submit_enabled());
    let _ = status.borrow_and_update();

    let user = flow.sign_up(request()).await.unwrap();
    assert_eq!(user.id, "1");
    assert_eq!(flow.status(), HandshakeStatus::Succeeded(user));
    assert!(status.has_changed().unwrap());
}

#[tokio::test]
async fn accessor_shares_one_client_across_flows() {
    let backend = MockServer::start().await;
    let accessor = Arc::new(ClientAccessor::new(
        Url::parse(&format!("{}/query", backend.uri())).unwrap(),
    ));

    let handles: Vec<GraphQLClientHandle> = (0..8).map(|_| accessor.get_client()).collect();
    for handle in &handles {
        assert!(Arc::ptr_eq(handle, &handles[0]));
    }

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let accessor = Arc::clone(&accessor);
            tokio::spawn(async move { accessor.get_client() })
        })
        .collect();
    for task in tasks {
        assert!(Arc::ptr_eq(&task.await.unwrap(), &handles[0]));
    }
}
