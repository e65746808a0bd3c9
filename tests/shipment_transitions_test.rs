//! Rejection, diversion, cancellation, termination and the status updater.

mod common;

use assert_matches::assert_matches;
use shipment_lifecycle::{
    commands::shipments::{
        approve_diversion_command::ApproveDiversionCommand,
        approve_shipment_command::ApproveShipmentCommand,
        cancel_shipment_command::CancelShipmentCommand,
        reject_shipment_command::RejectShipmentCommand,
        request_cancellation_command::RequestCancellationCommand,
        request_diversion_command::RequestDiversionCommand,
        terminate_shipment_command::{TerminateShipmentCommand, TERMINATION_PREFIX},
        update_shipment_status_command::UpdateShipmentStatusCommand,
    },
    errors::{ConflictStatusError, ServiceError},
    events::Event,
    models::{
        move_task_order::MoveStatus,
        mto_shipment::{self, ShipmentStatus, ShipmentType},
    },
    ShipmentLifecycleService,
};

use common::{date, etag_of, TestHarness};

/// Inserts a shipment already in `status` on a fresh approved move.
async fn shipment_in(
    h: &TestHarness,
    status: ShipmentStatus,
    tweak: impl FnOnce(&mut mto_shipment::Model),
) -> mto_shipment::Model {
    let move_task_order = h.seed_move(MoveStatus::Approved).await;
    h.seed_entitlement(move_task_order.id, Some(5_000), Some(90))
        .await;
    let mut shipment = TestHarness::shipment(move_task_order.id);
    shipment.status = status;
    tweak(&mut shipment);
    h.insert_shipment(shipment).await
}

fn service(h: &TestHarness) -> ShipmentLifecycleService {
    ShipmentLifecycleService::new(h.ctx.clone())
}

fn reject(shipment: &mto_shipment::Model, reason: Option<&str>) -> RejectShipmentCommand {
    RejectShipmentCommand {
        shipment_id: shipment.id,
        etag: etag_of(shipment),
        rejection_reason: reason.map(str::to_string),
    }
}

#[tokio::test]
async fn rejection_needs_a_reason() {
    let mut h = TestHarness::new().await;
    let shipment = shipment_in(&h, ShipmentStatus::Submitted, |_| {}).await;

    for missing in [None, Some(""), Some("   ")] {
        let result = service(&h).reject_shipment(reject(&shipment, missing)).await;
        assert_matches!(result, Err(ServiceError::Conflict { .. }));
    }
    assert_eq!(h.reload(shipment.id).await.status, ShipmentStatus::Submitted);

    let rejected = service(&h)
        .reject_shipment(reject(&shipment, Some("duplicate shipment")))
        .await
        .expect("rejection succeeds");
    assert_eq!(rejected.status, ShipmentStatus::Rejected);
    assert_eq!(rejected.rejection_reason.as_deref(), Some("duplicate shipment"));
    assert_matches!(
        h.drain_events().as_slice(),
        [Event::ShipmentRejected { reason, .. }] if reason == "duplicate shipment"
    );
}

#[tokio::test]
async fn rejecting_an_approved_shipment_reports_allowed_statuses() {
    let h = TestHarness::new().await;
    let shipment = shipment_in(&h, ShipmentStatus::Approved, |_| {}).await;

    let result = service(&h)
        .reject_shipment(reject(&shipment, Some("too late")))
        .await;

    assert_matches!(
        result,
        Err(ServiceError::ConflictStatus(ConflictStatusError { from: ShipmentStatus::Approved, to: ShipmentStatus::Rejected, allowed_from, .. }))
            if allowed_from == vec![ShipmentStatus::Submitted]
    );
}

#[tokio::test]
async fn stale_etag_is_precondition_failed() {
    let h = TestHarness::new().await;
    let shipment = shipment_in(&h, ShipmentStatus::Submitted, |_| {}).await;
    let mut command = reject(&shipment, Some("duplicate"));
    command.etag = shipment_lifecycle::etag::generate(shipment.updated_at - chrono::Duration::seconds(1));

    let result = service(&h).reject_shipment(command).await;

    assert_matches!(result, Err(ServiceError::PreconditionFailed { .. }));
}

#[tokio::test]
async fn diversion_is_requested_on_an_approved_shipment() {
    let mut h = TestHarness::new().await;
    let shipment = shipment_in(&h, ShipmentStatus::Approved, |_| {}).await;

    let diverted = service(&h)
        .request_diversion(RequestDiversionCommand {
            shipment_id: shipment.id,
            etag: etag_of(&shipment),
            diversion_reason: Some("new duty station".into()),
        })
        .await
        .expect("diversion request succeeds");

    assert_eq!(diverted.status, ShipmentStatus::DiversionRequested);
    assert_eq!(diverted.diversion_reason.as_deref(), Some("new duty station"));
    // The open diversion sends the move back for office review
    assert_eq!(
        h.reload_move(shipment.move_id).await.status,
        MoveStatus::ApprovalsRequested
    );
    assert_matches!(
        h.drain_events().as_slice(),
        [
            Event::ShipmentDiversionRequested { .. },
            Event::MoveStatusChanged { new_status: MoveStatus::ApprovalsRequested, .. },
        ]
    );

    // The parent is not itself a diversion, so it cannot be re-approved directly
    let result = service(&h)
        .approve_shipment(ApproveShipmentCommand::new(diverted.id, etag_of(&diverted)))
        .await;
    assert_matches!(result, Err(ServiceError::ConflictStatus(_)));
}

#[tokio::test]
async fn diversion_shipment_is_approved() {
    let mut h = TestHarness::new().await;
    let parent = shipment_in(&h, ShipmentStatus::DiversionRequested, |_| {}).await;
    let mut child = TestHarness::shipment(parent.move_id);
    child.diversion = true;
    child.diverted_from_shipment_id = Some(parent.id);
    let child = h.insert_shipment(child).await;

    let approved = service(&h)
        .approve_diversion(ApproveDiversionCommand {
            shipment_id: child.id,
            etag: etag_of(&child),
        })
        .await
        .expect("diversion approval succeeds");

    assert_eq!(approved.status, ShipmentStatus::Approved);
    assert!(approved.approved_date.is_some());
    // The parent still awaits its own decision
    assert_matches!(
        h.drain_events().as_slice(),
        [
            Event::ShipmentDiversionApproved { shipment_id },
            Event::MoveStatusChanged { new_status: MoveStatus::ApprovalsRequested, .. },
        ] if *shipment_id == child.id
    );
}

#[tokio::test]
async fn approving_a_diversion_needs_the_diversion_flag() {
    let h = TestHarness::new().await;
    let shipment = shipment_in(&h, ShipmentStatus::Submitted, |_| {}).await;

    let result = service(&h)
        .approve_diversion(ApproveDiversionCommand {
            shipment_id: shipment.id,
            etag: etag_of(&shipment),
        })
        .await;

    assert_matches!(result, Err(ServiceError::Conflict { message, .. }) if message.contains("Diversion field set to false"));
}

#[tokio::test]
async fn cancellation_is_requested_then_confirmed() {
    let mut h = TestHarness::new().await;
    let shipment = shipment_in(&h, ShipmentStatus::Approved, |s| {
        s.actual_pickup_date = Some(date(2024, 6, 10));
    })
    .await;

    let requested = service(&h)
        .request_cancellation(RequestCancellationCommand {
            shipment_id: shipment.id,
            etag: etag_of(&shipment),
        })
        .await
        .expect("cancellation request succeeds");
    assert_eq!(requested.status, ShipmentStatus::CancellationRequested);

    let canceled = service(&h)
        .cancel_shipment(CancelShipmentCommand {
            shipment_id: requested.id,
            etag: etag_of(&requested),
        })
        .await
        .expect("cancellation succeeds");
    assert_eq!(canceled.status, ShipmentStatus::Canceled);

    assert_matches!(
        h.drain_events().as_slice(),
        [
            Event::ShipmentCancellationRequested { .. },
            Event::ShipmentCanceled { .. },
        ]
    );
}

#[tokio::test]
async fn cancellation_is_refused_once_picked_up() {
    let h = TestHarness::new().await;
    // today is pinned to 2024-06-01
    let shipment = shipment_in(&h, ShipmentStatus::Approved, |s| {
        s.actual_pickup_date = Some(date(2024, 6, 1));
    })
    .await;

    let result = service(&h)
        .request_cancellation(RequestCancellationCommand {
            shipment_id: shipment.id,
            etag: etag_of(&shipment),
        })
        .await;

    assert_matches!(result, Err(ServiceError::Conflict { .. }));
    assert_eq!(h.reload(shipment.id).await.status, ShipmentStatus::Approved);
}

#[tokio::test]
async fn cancel_without_request_is_conflict() {
    let h = TestHarness::new().await;
    let shipment = shipment_in(&h, ShipmentStatus::Approved, |_| {}).await;

    let result = service(&h)
        .cancel_shipment(CancelShipmentCommand {
            shipment_id: shipment.id,
            etag: etag_of(&shipment),
        })
        .await;

    assert_matches!(
        result,
        Err(ServiceError::ConflictStatus(ConflictStatusError { to: ShipmentStatus::Canceled, .. }))
    );
}

fn terminate(shipment: &mto_shipment::Model, comments: &str) -> TerminateShipmentCommand {
    TerminateShipmentCommand {
        shipment_id: shipment.id,
        etag: etag_of(shipment),
        termination_comments: comments.to_string(),
    }
}

#[tokio::test]
async fn termination_stamps_time_and_comments() {
    let mut h = TestHarness::new().await;
    let shipment = shipment_in(&h, ShipmentStatus::Approved, |_| {}).await;

    let terminated = service(&h)
        .terminate_shipment(terminate(&shipment, "contractor failed to perform"))
        .await
        .expect("termination succeeds");

    assert_eq!(terminated.status, ShipmentStatus::TerminatedForCause);
    assert!(terminated.terminated_at.is_some());
    assert_eq!(
        terminated.termination_comments,
        Some(format!("{}contractor failed to perform", TERMINATION_PREFIX))
    );
    assert_matches!(
        h.drain_events().as_slice(),
        [Event::ShipmentTerminated { terminated_at, .. }] if Some(*terminated_at) == terminated.terminated_at
    );
}

#[tokio::test]
async fn termination_guards() {
    let h = TestHarness::new().await;

    let ppm = shipment_in(&h, ShipmentStatus::Approved, |s| {
        s.shipment_type = ShipmentType::Ppm;
    })
    .await;
    assert_matches!(
        service(&h).terminate_shipment(terminate(&ppm, "no show")).await,
        Err(ServiceError::Conflict { .. })
    );

    let picked_up = shipment_in(&h, ShipmentStatus::Approved, |s| {
        s.actual_pickup_date = Some(date(2024, 5, 28));
    })
    .await;
    assert_matches!(
        service(&h).terminate_shipment(terminate(&picked_up, "no show")).await,
        Err(ServiceError::Conflict { .. })
    );

    let submitted = shipment_in(&h, ShipmentStatus::Submitted, |_| {}).await;
    assert_matches!(
        service(&h).terminate_shipment(terminate(&submitted, "no show")).await,
        Err(ServiceError::ConflictStatus(_))
    );

    let approved = shipment_in(&h, ShipmentStatus::Approved, |_| {}).await;
    assert_matches!(
        service(&h).terminate_shipment(terminate(&approved, "")).await,
        Err(ServiceError::InvalidInput { .. })
    );
    assert_matches!(
        service(&h)
            .terminate_shipment(terminate(&approved, &"x".repeat(901)))
            .await,
        Err(ServiceError::InvalidInput { .. })
    );
}

fn update_status(shipment: &mto_shipment::Model, status: ShipmentStatus) -> UpdateShipmentStatusCommand {
    UpdateShipmentStatusCommand {
        shipment_id: shipment.id,
        status,
        rejection_reason: None,
        diversion_reason: None,
        etag: etag_of(shipment),
    }
}

#[tokio::test]
async fn status_updater_approves_and_creates_items() {
    let mut h = TestHarness::new().await;
    let s = h.scenario(MoveStatus::Approved).await;

    let approved = service(&h)
        .update_status(update_status(&s.shipment, ShipmentStatus::Approved))
        .await
        .expect("status update succeeds");

    assert_eq!(approved.status, ShipmentStatus::Approved);
    assert!(approved.required_delivery_date.is_some());
    assert_eq!(h.service_items_for(approved.id).await.len(), 6);
    assert_eq!(
        h.reload_entitlement(s.entitlement.id).await.db_authorized_weight,
        Some(1_100)
    );
    assert_matches!(
        h.drain_events().as_slice(),
        [
            Event::ShipmentStatusChanged {
                old_status: ShipmentStatus::Submitted,
                new_status: ShipmentStatus::Approved,
                ..
            },
            Event::AuthorizedWeightUpdated { authorized_weight: 1_100, .. },
        ]
    );
}

#[tokio::test]
async fn status_updater_flags_excess_weight() {
    let h = TestHarness::new().await;
    let s = h.scenario(MoveStatus::Approved).await;
    let mut sibling = TestHarness::shipment(s.move_task_order.id);
    sibling.status = ShipmentStatus::Approved;
    sibling.prime_estimated_weight = Some(3_600);
    h.insert_shipment(sibling).await;

    service(&h)
        .update_status(update_status(&s.shipment, ShipmentStatus::Approved))
        .await
        .expect("status update succeeds");

    // 4600 lbs reaches 90% of the 5000 lb allowance
    let move_task_order = h.reload_move(s.move_task_order.id).await;
    assert!(move_task_order.excess_weight_qualified_at.is_some());
}

#[tokio::test]
async fn status_updater_re_approval_adds_no_items() {
    let h = TestHarness::new().await;
    let s = h.scenario(MoveStatus::Approved).await;

    let approved = service(&h)
        .update_status(update_status(&s.shipment, ShipmentStatus::Approved))
        .await
        .expect("first approval succeeds");
    let pending = h
        .set_status(&approved, ShipmentStatus::ApprovalsRequested)
        .await;
    service(&h)
        .update_status(update_status(&pending, ShipmentStatus::Approved))
        .await
        .expect("re-approval succeeds");

    assert_eq!(h.service_items_for(s.shipment.id).await.len(), 6);
}

#[tokio::test]
async fn rejecting_the_last_pending_shipment_approves_the_move() {
    let mut h = TestHarness::new().await;
    let s = h.scenario(MoveStatus::ApprovalsRequested).await;

    service(&h)
        .reject_shipment(reject(&s.shipment, Some("duplicate shipment")))
        .await
        .expect("rejection succeeds");

    assert_eq!(
        h.reload_move(s.move_task_order.id).await.status,
        MoveStatus::Approved
    );
    assert_matches!(
        h.drain_events().as_slice(),
        [
            Event::ShipmentRejected { .. },
            Event::MoveStatusChanged { new_status: MoveStatus::Approved, .. },
        ]
    );
}

#[tokio::test]
async fn status_updater_clears_stale_rejection_reason() {
    let h = TestHarness::new().await;
    let shipment = shipment_in(&h, ShipmentStatus::Submitted, |s| {
        s.rejection_reason = Some("earlier attempt".into());
    })
    .await;

    let approved = service(&h)
        .update_status(update_status(&shipment, ShipmentStatus::Approved))
        .await
        .expect("status update succeeds");

    assert_eq!(approved.rejection_reason, None);
}

#[tokio::test]
async fn status_updater_rejects_with_reason() {
    let h = TestHarness::new().await;
    let shipment = shipment_in(&h, ShipmentStatus::Submitted, |_| {}).await;
    let mut command = update_status(&shipment, ShipmentStatus::Rejected);
    command.rejection_reason = Some("not entitled".into());

    let rejected = service(&h)
        .update_status(command)
        .await
        .expect("status update succeeds");

    assert_eq!(rejected.status, ShipmentStatus::Rejected);
    assert_eq!(rejected.rejection_reason.as_deref(), Some("not entitled"));
}

#[tokio::test]
async fn status_updater_refuses_customer_targets() {
    let h = TestHarness::new().await;
    let shipment = shipment_in(&h, ShipmentStatus::Submitted, |_| {}).await;

    for target in [ShipmentStatus::Draft, ShipmentStatus::TerminatedForCause] {
        let result = service(&h)
            .update_status(update_status(&shipment, target))
            .await;
        assert_matches!(
            result,
            Err(ServiceError::ConflictStatus(ConflictStatusError { allowed_from, .. })) if allowed_from.is_empty()
        );
    }
}

#[tokio::test]
async fn re_approving_a_diversion_skips_service_items() {
    let h = TestHarness::new().await;
    let shipment = shipment_in(&h, ShipmentStatus::DiversionRequested, |s| {
        s.diversion = true;
    })
    .await;

    let approved = service(&h)
        .update_status(update_status(&shipment, ShipmentStatus::Approved))
        .await
        .expect("status update succeeds");

    assert_eq!(approved.status, ShipmentStatus::Approved);
    assert!(h.service_items_for(approved.id).await.is_empty());
}
