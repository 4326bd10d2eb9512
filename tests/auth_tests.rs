use maricrm::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn admin_login_body() -> serde_json::Value {
    json!({
        "user": {
            "id": 1,
            "email": "admin@example.com",
            "name": "Admin",
            "type": "admin"
        },
        "token": "admin-token"
    })
}

#[tokio::test]
async fn login_stores_session_with_seeded_role() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login/"))
        .and(body_json(json!({
            "email": "admin@example.com",
            "password": "password"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(admin_login_body()))
        .mount(&mock_server)
        .await;

    let crm = MariCrm::new(&mock_server.uri()).unwrap();
    let session = crm
        .auth()
        .login("admin@example.com", "password")
        .await
        .unwrap();

    assert_eq!(session.role, Role::Admin);
    assert_eq!(session.access_token, "admin-token");
    assert_eq!(session.role.landing_path(), "/admin");

    let stored = crm.auth().get_session().unwrap();
    assert_eq!(stored.user_id, 1);
    assert_eq!(stored.email, "admin@example.com");
}

#[tokio::test]
async fn login_failure_leaves_prior_session_unchanged() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login/"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "invalid credentials"})),
        )
        .mount(&mock_server)
        .await;

    let crm = MariCrm::new(&mock_server.uri()).unwrap();
    crm.auth().set_session(Session {
        user_id: 9,
        email: "prior@example.com".into(),
        display_name: "Prior".into(),
        role: Role::Sales,
        access_token: "prior-token".into(),
    });

    let err = crm
        .auth()
        .login("admin@example.com", "wrong")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::InvalidCredentials)));

    // the earlier session is untouched
    let session = crm.auth().get_session().unwrap();
    assert_eq!(session.user_id, 9);
    assert_eq!(session.access_token, "prior-token");
}

#[tokio::test]
async fn register_rejects_password_mismatch_without_network() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/user/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let crm = MariCrm::new(&mock_server.uri()).unwrap();
    let err = crm
        .auth()
        .register(RegisterProfile {
            name: "New".into(),
            email: "new@example.com".into(),
            password: "secret1".into(),
            confirm_password: "secret2".into(),
            contact: "555-0100".into(),
            role: Role::Sales,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Auth(AuthError::ValidationFailed(_))));
}

#[tokio::test]
async fn register_rejects_short_password_without_network() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/user/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let crm = MariCrm::new(&mock_server.uri()).unwrap();
    let err = crm
        .auth()
        .register(RegisterProfile {
            name: "New".into(),
            email: "new@example.com".into(),
            password: "12345".into(),
            confirm_password: "12345".into(),
            contact: "555-0100".into(),
            role: Role::Operations,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Auth(AuthError::ValidationFailed(_))));
}

#[tokio::test]
async fn register_resolves_role_from_emp_details() {
    let mock_server = MockServer::start().await;
    let email = format!("ops-{}@example.com", uuid::Uuid::new_v4());

    Mock::given(method("POST"))
        .and(path("/auth/user/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {
                "id": 14,
                "email": email.clone(),
                "name": "Ops One"
            },
            "token": "ops-token",
            "emp": {"type": "operations"}
        })))
        .mount(&mock_server)
        .await;

    let crm = MariCrm::new(&mock_server.uri()).unwrap();
    let session = crm
        .auth()
        .register(RegisterProfile {
            name: "Ops One".into(),
            email: email.clone(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
            contact: "555-0100".into(),
            role: Role::Operations,
        })
        .await
        .unwrap();

    assert_eq!(session.role, Role::Operations);
    assert_eq!(session.email, email);
    assert_eq!(session.role.landing_path(), "/operations");
}

#[tokio::test]
async fn session_persists_across_clients_and_logout_clears_it() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(admin_login_body()))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let session_file = dir.path().join("session.json");
    let options = ClientOptions::default().with_session_file(&session_file);

    // first client logs in and persists
    let crm = MariCrm::new_with_options(&mock_server.uri(), options.clone()).unwrap();
    crm.auth()
        .login("admin@example.com", "password")
        .await
        .unwrap();
    assert!(session_file.exists());

    // second client restores without re-login
    let restored_crm = MariCrm::new_with_options(&mock_server.uri(), options.clone()).unwrap();
    let restored = restored_crm.restore_session().unwrap().unwrap();
    assert_eq!(restored.role, Role::Admin);
    assert_eq!(restored.access_token, "admin-token");

    // logout clears memory and disk, and is idempotent
    restored_crm.logout().unwrap();
    restored_crm.logout().unwrap();
    assert!(restored_crm.auth().get_session().is_none());
    assert!(!session_file.exists());

    // a fresh load with no stored token is logged out
    let cold_crm = MariCrm::new_with_options(&mock_server.uri(), options).unwrap();
    assert!(cold_crm.restore_session().unwrap().is_none());
}

#[tokio::test]
async fn current_user_sends_bearer_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gen/current-user/"))
        .and(header("Authorization", "Bearer admin-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "name": "Admin",
            "email": "admin@example.com",
            "employee_details": {"type": "admin"}
        })))
        .mount(&mock_server)
        .await;

    let crm = MariCrm::new(&mock_server.uri()).unwrap();
    crm.auth().set_session(Session {
        user_id: 1,
        email: "admin@example.com".into(),
        display_name: "Admin".into(),
        role: Role::Admin,
        access_token: "admin-token".into(),
    });

    let user = crm.auth().current_user().await.unwrap();
    assert_eq!(user.employee_details.role, Role::Admin);
}

#[tokio::test]
async fn raw_auth_scheme_sends_unprefixed_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gen/current-user/"))
        .and(header("Authorization", "admin-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "name": "Admin",
            "email": "admin@example.com",
            "employee_details": {"type": "admin"}
        })))
        .mount(&mock_server)
        .await;

    let options = ClientOptions::default()
        .with_persist_session(false)
        .with_auth_scheme(AuthScheme::Raw);
    let crm = MariCrm::new_with_options(&mock_server.uri(), options).unwrap();
    crm.auth().set_session(Session {
        user_id: 1,
        email: "admin@example.com".into(),
        display_name: "Admin".into(),
        role: Role::Admin,
        access_token: "admin-token".into(),
    });

    assert!(crm.auth().current_user().await.is_ok());
}
