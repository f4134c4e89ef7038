//! Status transitions driving the directory projection.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use cotador_core::AccountStatus;
use cotador_integration_tests::{memory_service, registration_for};
use cotador_portal::directory::UserDirectory;
use cotador_portal::gateway::Gateway;

/// Poll until `check` passes or a second elapses.
async fn wait_for(check: impl AsyncFn() -> bool) {
    for _ in 0..100 {
        if check().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn test_approval_moves_row_out_of_pending_filter() {
    let (gateway, service) = memory_service();
    let directory = UserDirectory::start(gateway.clone() as Arc<dyn Gateway>)
        .await
        .unwrap();

    let outcome = service
        .register(&registration_for("111.222.333-44"))
        .await
        .unwrap();
    let id = outcome.user_id;

    wait_for(async || directory.pending_count().await == 1).await;
    assert_eq!(directory.pending().await.len(), 1);

    // The admin clicks "Aprovar Acesso": a status update for that row's id.
    gateway
        .update_status(id, AccountStatus::Approved)
        .await
        .unwrap();

    wait_for(async || directory.pending_count().await == 0).await;
    assert!(directory.pending().await.is_empty());

    // Still visible under the "all" filter, now approved.
    let all = directory.non_admins().await;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].status, AccountStatus::Approved);
}

#[tokio::test]
async fn test_revoke_and_reactivate_round_trip() {
    let (gateway, service) = memory_service();
    let directory = UserDirectory::start(gateway.clone() as Arc<dyn Gateway>)
        .await
        .unwrap();

    let id = service
        .register(&registration_for("111.222.333-44"))
        .await
        .unwrap()
        .user_id;

    for target in [
        AccountStatus::Approved,
        AccountStatus::Rejected,
        AccountStatus::Approved,
    ] {
        gateway.update_status(id, target).await.unwrap();
        wait_for(async || {
            directory.find(id).await.is_some_and(|u| u.status == target)
        })
        .await;
        assert_eq!(directory.find(id).await.unwrap().status, target);
    }
}

#[tokio::test]
async fn test_admin_rows_excluded_from_all_filter() {
    let (gateway, service) = memory_service();

    service
        .register(&registration_for(cotador_integration_tests::BOOTSTRAP_CPF))
        .await
        .unwrap();
    service
        .register(&registration_for("111.222.333-44"))
        .await
        .unwrap();

    let directory = UserDirectory::start(gateway.clone() as Arc<dyn Gateway>)
        .await
        .unwrap();

    let all = directory.non_admins().await;
    assert_eq!(all.len(), 1);
    assert!(!all[0].is_admin);
}

#[tokio::test]
async fn test_transition_legality_per_status() {
    // The full action table, as offered per row in the panel.
    let cases = [
        (AccountStatus::Pending, AccountStatus::Approved, true),
        (AccountStatus::Pending, AccountStatus::Rejected, true),
        (AccountStatus::Approved, AccountStatus::Rejected, true),
        (AccountStatus::Rejected, AccountStatus::Approved, true),
        (AccountStatus::Approved, AccountStatus::Approved, false),
        (AccountStatus::Rejected, AccountStatus::Rejected, false),
        (AccountStatus::Pending, AccountStatus::Pending, false),
        (AccountStatus::Approved, AccountStatus::Pending, false),
        (AccountStatus::Rejected, AccountStatus::Pending, false),
    ];

    for (from, to, legal) in cases {
        assert_eq!(
            from.can_transition_to(to),
            legal,
            "{from} -> {to} should be {}",
            if legal { "legal" } else { "illegal" }
        );
    }
}

#[tokio::test]
async fn test_directory_drop_releases_subscription() {
    let (gateway, service) = memory_service();
    let directory = UserDirectory::start(gateway.clone() as Arc<dyn Gateway>)
        .await
        .unwrap();
    drop(directory);

    // The feed reader is gone; inserting must not error or hang.
    let outcome = service
        .register(&registration_for("111.222.333-44"))
        .await
        .unwrap();
    assert!(gateway.find_user(outcome.user_id).await.unwrap().is_some());
}
