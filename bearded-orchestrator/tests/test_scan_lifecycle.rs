//! Reading, listing, transitioning and deleting scans

mod common;

use std::time::Duration;

use bearded_core::domain::catalog::TargetType;
use bearded_core::domain::ids::{ScanId, SessionId};
use bearded_core::domain::scan::{ScanError, ScanFilter, ScanStatus};
use bearded_orchestrator::application::{
    DeleteScanUseCase, GetScanUseCase, ListScansUseCase, TransitionScanUseCase,
    TransitionSessionUseCase,
};

use common::fixtures::{World, command};

#[tokio::test]
async fn deleted_scan_is_gone_and_second_delete_is_not_found() {
    let world = World::new().await;
    let repositories = world.repositories();
    let scan = world
        .create_use_case()
        .execute(world.web_command(&world.web_plan), world.owner)
        .await
        .unwrap();

    let get = GetScanUseCase::new(repositories.scans.clone());
    let delete = DeleteScanUseCase::new(repositories.scans.clone());

    assert_eq!(get.execute(scan.id).await.unwrap().id, scan.id);
    delete.execute(scan.id).await.unwrap();

    assert!(get.execute(scan.id).await.unwrap_err().is_not_found());
    assert!(delete.execute(scan.id).await.unwrap_err().is_not_found());
    assert_eq!(world.store.scan_count().await, 0);
}

#[tokio::test]
async fn deleting_an_id_that_never_existed_is_always_not_found() {
    let world = World::new().await;
    let delete = DeleteScanUseCase::new(world.repositories().scans);
    let id = ScanId::generate();

    for _ in 0..2 {
        let err = delete.execute(id).await.unwrap_err();
        assert!(matches!(err, ScanError::NotFound { .. }));
    }
}

#[tokio::test]
async fn get_unknown_scan_is_not_found() {
    let world = World::new().await;
    let get = GetScanUseCase::new(world.repositories().scans);

    let err = get.execute(ScanId::generate()).await.unwrap_err();

    assert!(matches!(err, ScanError::NotFound { .. }));
}

#[tokio::test]
async fn list_filters_counts_and_pages() {
    let world = World::new().await;
    let use_case = world.create_use_case();
    let host_plan = world.add_plan(TargetType::Host, &["nmap:1.0"]).await;

    for _ in 0..3 {
        use_case
            .execute(world.web_command(&world.web_plan), world.owner)
            .await
            .unwrap();
        // Distinct creation instants keep ordering observable
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    let host_scan = use_case
        .execute(
            command(
                &world.project.id.to_string(),
                &world.host_target.id.to_string(),
                &host_plan.id.to_string(),
            ),
            world.owner,
        )
        .await
        .unwrap();

    let list = ListScansUseCase::new(world.repositories().scans);

    let all = list.execute(ScanFilter::default()).await.unwrap();
    assert_eq!(all.count, 4);
    assert_eq!(all.results[0].id, host_scan.id, "newest first");
    assert!(
        all.results
            .windows(2)
            .all(|pair| pair[0].dates.created >= pair[1].dates.created)
    );

    let web_only = list
        .execute(ScanFilter {
            plan: Some(world.web_plan.id),
            skip: 1,
            limit: Some(1),
            ..ScanFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(web_only.count, 3);
    assert_eq!(web_only.results.len(), 1);
    assert_eq!(web_only.results[0].plan, world.web_plan.id);

    let queued = list
        .execute(ScanFilter {
            status: Some(ScanStatus::Queued),
            ..ScanFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(queued.count, 0);
    assert!(queued.results.is_empty());
}

#[tokio::test]
async fn scan_follows_the_status_machine() {
    let world = World::new().await;
    let scan = world
        .create_use_case()
        .execute(world.web_command(&world.web_plan), world.owner)
        .await
        .unwrap();
    let transition = TransitionScanUseCase::new(world.repositories().scans);

    let queued = transition.execute(scan.id, ScanStatus::Queued).await.unwrap();
    assert_eq!(queued.status, ScanStatus::Queued);
    assert!(queued.dates.updated >= queued.dates.created);
    assert!(
        queued
            .sessions
            .iter()
            .all(|s| s.status == ScanStatus::Created),
        "sessions move on their own"
    );

    let err = transition
        .execute(scan.id, ScanStatus::Finished)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ScanError::InvalidTransition {
            from: ScanStatus::Queued,
            to: ScanStatus::Finished,
        }
    );

    transition.execute(scan.id, ScanStatus::Working).await.unwrap();
    transition.execute(scan.id, ScanStatus::Paused).await.unwrap();
    transition.execute(scan.id, ScanStatus::Working).await.unwrap();
    let finished = transition
        .execute(scan.id, ScanStatus::Finished)
        .await
        .unwrap();
    assert!(finished.status.is_terminal());

    assert!(
        transition
            .execute(scan.id, ScanStatus::Failed)
            .await
            .is_err(),
        "terminal scans stay put"
    );
}

#[tokio::test]
async fn session_transition_touches_one_session() {
    let world = World::new().await;
    let scan = world
        .create_use_case()
        .execute(world.web_command(&world.web_plan), world.owner)
        .await
        .unwrap();
    let transition = TransitionSessionUseCase::new(world.repositories().scans);
    let first = scan.sessions[0].id;

    let updated = transition
        .execute(scan.id, first, ScanStatus::Queued)
        .await
        .unwrap();

    assert_eq!(updated.status, ScanStatus::Created);
    assert_eq!(updated.session(&first).unwrap().status, ScanStatus::Queued);
    assert_eq!(updated.sessions[1].status, ScanStatus::Created);
}

#[tokio::test]
async fn session_transition_on_unknown_ids() {
    let world = World::new().await;
    let scan = world
        .create_use_case()
        .execute(world.web_command(&world.web_plan), world.owner)
        .await
        .unwrap();
    let transition = TransitionSessionUseCase::new(world.repositories().scans);

    let err = transition
        .execute(scan.id, SessionId::generate(), ScanStatus::Queued)
        .await
        .unwrap_err();
    assert!(matches!(err, ScanError::SessionNotFound { .. }));

    let err = transition
        .execute(ScanId::generate(), scan.sessions[0].id, ScanStatus::Queued)
        .await
        .unwrap_err();
    assert!(matches!(err, ScanError::NotFound { .. }));
}
