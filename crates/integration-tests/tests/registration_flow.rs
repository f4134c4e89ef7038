//! Registration and sign-in scenarios over the in-memory gateway.

#![allow(clippy::unwrap_used)]

use cotador_core::{AccountStatus, Cpf};
use cotador_integration_tests::{BOOTSTRAP_CPF, memory_service, registration_for};
use cotador_portal::gateway::Gateway;
use cotador_portal::services::AccountError;

// ============================================================================
// Ordinary registration
// ============================================================================

#[tokio::test]
async fn test_registration_creates_pending_non_admin_row() {
    let (gateway, service) = memory_service();

    let outcome = service
        .register(&registration_for("111.222.333-44"))
        .await
        .unwrap();

    let row = gateway.find_user(outcome.user_id).await.unwrap().unwrap();
    assert_eq!(row.status, AccountStatus::Pending);
    assert!(!row.is_admin);
    assert_eq!(row.cpf.as_str(), "111.222.333-44");
    assert_eq!(row.name, "Maria Souza");
}

#[tokio::test]
async fn test_login_before_approval_still_authenticates() {
    let (_gateway, service) = memory_service();
    service
        .register(&registration_for("111.222.333-44"))
        .await
        .unwrap();

    // Status does not gate authentication: the pending account signs in.
    let signed_in = service
        .sign_in(&Cpf::mask("111.222.333-44"), "123456")
        .await
        .unwrap();
    assert_eq!(signed_in.user.unwrap().status, AccountStatus::Pending);
}

// ============================================================================
// Bootstrap administrator
// ============================================================================

#[tokio::test]
async fn test_bootstrap_cpf_registers_approved_admin() {
    let (gateway, service) = memory_service();

    let outcome = service.register(&registration_for(BOOTSTRAP_CPF)).await.unwrap();
    assert!(outcome.is_admin);
    assert_eq!(outcome.status, AccountStatus::Approved);

    let row = gateway.find_user(outcome.user_id).await.unwrap().unwrap();
    assert!(row.is_admin);
    assert_eq!(row.status, AccountStatus::Approved);
}

// ============================================================================
// Duplicates and validation
// ============================================================================

#[tokio::test]
async fn test_duplicate_cpf_shows_already_registered_message() {
    let (_gateway, service) = memory_service();
    service
        .register(&registration_for("111.222.333-44"))
        .await
        .unwrap();

    let err = service
        .register(&registration_for("111.222.333-44"))
        .await
        .unwrap_err();
    assert_eq!(
        err.user_message(),
        "Este CPF já possui cadastro. Tente fazer login."
    );
}

#[tokio::test]
async fn test_validation_failures_never_reach_the_gateway() {
    let (gateway, service) = memory_service();

    let mut no_email = registration_for("111.222.333-44");
    no_email.email = String::new();
    assert!(matches!(
        service.register(&no_email).await.unwrap_err(),
        AccountError::MissingFields
    ));

    let mut short_password = registration_for("111.222.333-44");
    short_password.password = "12345".to_owned();
    assert!(matches!(
        service.register(&short_password).await.unwrap_err(),
        AccountError::InvalidPassword
    ));

    // Neither attempt created an auth identity or a row.
    assert_eq!(gateway.identity_count(), 0);
    assert!(gateway.list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_first_step_inserts_no_row() {
    let (gateway, service) = memory_service();

    // Occupy the synthetic email so the auth step fails.
    gateway
        .sign_up("11122233344@temmaissaude.com", "999999")
        .await
        .unwrap();

    let err = service
        .register(&registration_for("111.222.333-44"))
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::AlreadyRegistered));
    assert!(gateway.list_users().await.unwrap().is_empty());
}
