//! Customer, office and Prime edits through the shipment updater, and reweighs.

mod common;

use assert_matches::assert_matches;
use shipment_lifecycle::{
    commands::shipments::{
        request_reweigh_command::RequestReweighCommand,
        update_shipment_command::{ShipmentPatch, UpdateShipmentCommand, UpdatedBy},
    },
    errors::ServiceError,
    events::Event,
    models::{
        move_task_order::MoveStatus,
        mto_shipment::{self, ShipmentStatus, ShipmentType},
        reweigh::ReweighRequester,
    },
    services::validation::OfficeRole,
    ShipmentLifecycleService,
};

use common::{date, etag_of, TestHarness};

async fn shipment_in(
    h: &TestHarness,
    status: ShipmentStatus,
    tweak: impl FnOnce(&mut mto_shipment::Model),
) -> mto_shipment::Model {
    let move_task_order = h.seed_move(MoveStatus::Approved).await;
    h.seed_entitlement(move_task_order.id, Some(8_000), Some(90))
        .await;
    let mut shipment = TestHarness::shipment(move_task_order.id);
    shipment.status = status;
    tweak(&mut shipment);
    h.insert_shipment(shipment).await
}

async fn update(
    h: &TestHarness,
    shipment: &mto_shipment::Model,
    updated_by: UpdatedBy,
    patch: ShipmentPatch,
) -> Result<mto_shipment::Model, ServiceError> {
    ShipmentLifecycleService::new(h.ctx.clone())
        .update_shipment(UpdateShipmentCommand {
            shipment_id: shipment.id,
            etag: etag_of(shipment),
            updated_by,
            patch,
        })
        .await
}

const COUNSELOR: UpdatedBy = UpdatedBy::Office {
    role: Some(OfficeRole::ServicesCounselor),
};

#[tokio::test]
async fn customer_submits_a_draft() {
    let mut h = TestHarness::new().await;
    let shipment = shipment_in(&h, ShipmentStatus::Draft, |_| {}).await;

    let submitted = update(
        &h,
        &shipment,
        UpdatedBy::Customer,
        ShipmentPatch {
            status: Some(ShipmentStatus::Submitted),
            customer_remarks: Some("fragile piano".into()),
            ..ShipmentPatch::default()
        },
    )
    .await
    .expect("submission succeeds");

    assert_eq!(submitted.status, ShipmentStatus::Submitted);
    assert_eq!(submitted.customer_remarks.as_deref(), Some("fragile piano"));
    assert_matches!(
        h.drain_events().as_slice(),
        [Event::ShipmentUpdated { shipment_id }] if *shipment_id == shipment.id
    );
}

#[tokio::test]
async fn customer_cannot_approve_their_own_shipment() {
    let h = TestHarness::new().await;
    let shipment = shipment_in(&h, ShipmentStatus::Submitted, |_| {}).await;

    let result = update(
        &h,
        &shipment,
        UpdatedBy::Customer,
        ShipmentPatch {
            status: Some(ShipmentStatus::Approved),
            ..ShipmentPatch::default()
        },
    )
    .await;

    assert_matches!(result, Err(ServiceError::InvalidInput { errors, .. }) if errors.contains("status"));
    assert_eq!(h.reload(shipment.id).await, shipment);
}

#[tokio::test]
async fn office_roles_are_limited_by_status() {
    let h = TestHarness::new().await;
    let shipment = shipment_in(&h, ShipmentStatus::Submitted, |_| {}).await;
    let remarks = ShipmentPatch {
        counselor_remarks: Some("confirmed dates".into()),
        ..ShipmentPatch::default()
    };

    let invoicing = UpdatedBy::Office {
        role: Some(OfficeRole::TransportationInvoicingOfficer),
    };
    assert_matches!(
        update(&h, &shipment, invoicing, remarks.clone()).await,
        Err(ServiceError::Forbidden { .. })
    );
    assert_matches!(
        update(&h, &shipment, UpdatedBy::Office { role: None }, remarks.clone()).await,
        Err(ServiceError::Forbidden { .. })
    );

    let updated = update(&h, &shipment, COUNSELOR, remarks)
        .await
        .expect("counselor update succeeds");
    assert_eq!(updated.counselor_remarks.as_deref(), Some("confirmed dates"));
}

#[tokio::test]
async fn office_and_prime_cannot_change_status_here() {
    let h = TestHarness::new().await;
    let shipment = shipment_in(&h, ShipmentStatus::Submitted, |_| {}).await;

    for updated_by in [COUNSELOR, UpdatedBy::Prime] {
        let result = update(
            &h,
            &shipment,
            updated_by,
            ShipmentPatch {
                status: Some(ShipmentStatus::Approved),
                ..ShipmentPatch::default()
            },
        )
        .await;
        assert_matches!(result, Err(ServiceError::Conflict { .. }));
    }
}

#[tokio::test]
async fn field_errors_from_every_guard_are_reported_together() {
    let h = TestHarness::new().await;
    let shipment = shipment_in(&h, ShipmentStatus::Submitted, |_| {}).await;
    let tertiary = h.seed_address("VA", "22030").await;

    let result = update(
        &h,
        &shipment,
        COUNSELOR,
        ShipmentPatch {
            // today is pinned to 2024-06-01
            requested_pickup_date: Some(date(2024, 6, 1)),
            tertiary_pickup_address_id: Some(tertiary.id),
            ..ShipmentPatch::default()
        },
    )
    .await;

    assert_matches!(
        result,
        Err(ServiceError::InvalidInput { errors, .. })
            if errors.len() == 2
                && errors.contains("requested_pickup_date")
                && errors.contains("tertiary_pickup_address")
    );
}

#[tokio::test]
async fn tomorrow_is_a_valid_requested_pickup_date() {
    let h = TestHarness::new().await;
    let shipment = shipment_in(&h, ShipmentStatus::Submitted, |_| {}).await;

    let updated = update(
        &h,
        &shipment,
        UpdatedBy::Customer,
        ShipmentPatch {
            requested_pickup_date: Some(date(2024, 6, 2)),
            scheduled_pickup_date: Some(date(2024, 6, 5)),
            ..ShipmentPatch::default()
        },
    )
    .await
    .expect("update succeeds");

    assert_eq!(updated.scheduled_pickup_date, Some(date(2024, 6, 5)));
}

#[tokio::test]
async fn unaccompanied_baggage_needs_an_oconus_address() {
    let h = TestHarness::new().await;
    let pickup = h.seed_address("CA", "90210").await;
    let shipment = shipment_in(&h, ShipmentStatus::Draft, |s| {
        s.shipment_type = ShipmentType::UnaccompaniedBaggage;
        s.pickup_address_id = Some(pickup.id);
    })
    .await;

    let result = update(&h, &shipment, UpdatedBy::Customer, ShipmentPatch::default()).await;

    assert_matches!(result, Err(ServiceError::InvalidInput { errors, .. }) if errors.contains("shipment_type"));
}

#[tokio::test]
async fn prime_cannot_see_external_vendor_shipments() {
    let h = TestHarness::new().await;
    let shipment = shipment_in(&h, ShipmentStatus::Approved, |s| {
        s.uses_external_vendor = true;
    })
    .await;

    let result = update(
        &h,
        &shipment,
        UpdatedBy::Prime,
        ShipmentPatch {
            actual_pickup_date: Some(date(2024, 6, 3)),
            ..ShipmentPatch::default()
        },
    )
    .await;

    assert_matches!(result, Err(ServiceError::NotFound { .. }));
}

#[tokio::test]
async fn prime_estimates_once_and_feeds_authorized_weight() {
    let h = TestHarness::new().await;
    let shipment = shipment_in(&h, ShipmentStatus::Approved, |_| {}).await;

    let estimated = update(
        &h,
        &shipment,
        UpdatedBy::Prime,
        ShipmentPatch {
            prime_estimated_weight: Some(1_500),
            ..ShipmentPatch::default()
        },
    )
    .await
    .expect("first estimate succeeds");
    assert_eq!(estimated.prime_estimated_weight, Some(1_500));

    let entitlement = shipment_lifecycle::repositories::shipment_repository::find_entitlement(
        h.db.as_ref(),
        shipment.move_id,
    )
    .await
    .expect("entitlement exists");
    assert_eq!(entitlement.db_authorized_weight, Some(1_650));

    let result = update(
        &h,
        &estimated,
        UpdatedBy::Prime,
        ShipmentPatch {
            prime_estimated_weight: Some(1_800),
            ..ShipmentPatch::default()
        },
    )
    .await;
    assert_matches!(result, Err(ServiceError::InvalidInput { errors, .. }) if errors.contains("prime_estimated_weight"));
}

#[tokio::test]
async fn stale_etag_is_refused() {
    let h = TestHarness::new().await;
    let shipment = shipment_in(&h, ShipmentStatus::Submitted, |_| {}).await;
    let updated = update(
        &h,
        &shipment,
        UpdatedBy::Customer,
        ShipmentPatch {
            customer_remarks: Some("first".into()),
            ..ShipmentPatch::default()
        },
    )
    .await
    .expect("first update succeeds");
    assert_ne!(etag_of(&updated), etag_of(&shipment));

    let result = update(
        &h,
        &shipment,
        UpdatedBy::Customer,
        ShipmentPatch {
            customer_remarks: Some("second".into()),
            ..ShipmentPatch::default()
        },
    )
    .await;
    assert_matches!(result, Err(ServiceError::PreconditionFailed { .. }));
}

#[tokio::test]
async fn diversion_inherits_the_parent_actual_weight() {
    let h = TestHarness::new().await;
    let parent = shipment_in(&h, ShipmentStatus::DiversionRequested, |s| {
        s.prime_actual_weight = Some(4_000);
    })
    .await;
    let child = h
        .insert_shipment(TestHarness::shipment(parent.move_id))
        .await;

    let diverted = update(
        &h,
        &child,
        COUNSELOR,
        ShipmentPatch {
            diversion: Some(true),
            diverted_from_shipment_id: Some(parent.id),
            ..ShipmentPatch::default()
        },
    )
    .await
    .expect("diversion update succeeds");

    assert!(diverted.diversion);
    assert_eq!(diverted.prime_actual_weight, Some(4_000));
}

#[tokio::test]
async fn flagging_an_approved_shipment_as_a_diversion_sends_it_back_for_review() {
    let mut h = TestHarness::new().await;
    let parent = shipment_in(&h, ShipmentStatus::Approved, |s| {
        s.prime_actual_weight = Some(4_000);
    })
    .await;
    let mut child = TestHarness::shipment(parent.move_id);
    child.status = ShipmentStatus::Approved;
    let child = h.insert_shipment(child).await;

    let diverted = update(
        &h,
        &child,
        COUNSELOR,
        ShipmentPatch {
            diversion: Some(true),
            diverted_from_shipment_id: Some(parent.id),
            ..ShipmentPatch::default()
        },
    )
    .await
    .expect("diversion update succeeds");

    assert!(diverted.diversion);
    assert_eq!(diverted.status, ShipmentStatus::Submitted);
    assert_eq!(diverted.prime_actual_weight, Some(4_000));

    let move_task_order = h.reload_move(parent.move_id).await;
    assert_eq!(move_task_order.status, MoveStatus::ApprovalsRequested);
    assert!(move_task_order.approvals_requested_at.is_some());
    assert_matches!(
        h.drain_events().as_slice(),
        [
            Event::ShipmentUpdated { shipment_id },
            Event::MoveStatusChanged { new_status: MoveStatus::ApprovalsRequested, .. },
        ] if *shipment_id == child.id
    );

    // Already a diversion, so a later edit leaves the status alone
    let edited = update(
        &h,
        &diverted,
        COUNSELOR,
        ShipmentPatch {
            counselor_remarks: Some("confirmed with member".into()),
            ..ShipmentPatch::default()
        },
    )
    .await
    .expect("follow-up edit succeeds");
    assert_eq!(edited.status, ShipmentStatus::Submitted);
}

#[tokio::test]
async fn diversion_references_are_checked() {
    let h = TestHarness::new().await;
    let parent = shipment_in(&h, ShipmentStatus::DiversionRequested, |s| {
        s.prime_actual_weight = Some(4_000);
    })
    .await;
    let child = h
        .insert_shipment(TestHarness::shipment(parent.move_id))
        .await;
    let elsewhere = shipment_in(&h, ShipmentStatus::Approved, |_| {}).await;

    let cases = [
        ShipmentPatch {
            diversion: Some(true),
            ..ShipmentPatch::default()
        },
        ShipmentPatch {
            diverted_from_shipment_id: Some(parent.id),
            ..ShipmentPatch::default()
        },
        ShipmentPatch {
            diversion: Some(true),
            diverted_from_shipment_id: Some(child.id),
            ..ShipmentPatch::default()
        },
        ShipmentPatch {
            diversion: Some(true),
            diverted_from_shipment_id: Some(uuid::Uuid::new_v4()),
            ..ShipmentPatch::default()
        },
        ShipmentPatch {
            diversion: Some(true),
            diverted_from_shipment_id: Some(elsewhere.id),
            ..ShipmentPatch::default()
        },
        ShipmentPatch {
            diversion: Some(true),
            diverted_from_shipment_id: Some(parent.id),
            prime_actual_weight: Some(3_000),
            ..ShipmentPatch::default()
        },
    ];
    for patch in cases {
        let result = update(&h, &child, COUNSELOR, patch.clone()).await;
        assert_matches!(result, Err(ServiceError::Conflict { .. }), "patch {:?}", patch);
    }
    assert_eq!(h.reload(child.id).await, child);
}

#[tokio::test]
async fn diversion_chains_cannot_loop() {
    let h = TestHarness::new().await;
    let first = shipment_in(&h, ShipmentStatus::Submitted, |_| {}).await;
    let mut second = TestHarness::shipment(first.move_id);
    second.diversion = true;
    second.diverted_from_shipment_id = Some(first.id);
    let second = h.insert_shipment(second).await;

    let result = update(
        &h,
        &first,
        COUNSELOR,
        ShipmentPatch {
            diversion: Some(true),
            diverted_from_shipment_id: Some(second.id),
            ..ShipmentPatch::default()
        },
    )
    .await;

    assert_matches!(result, Err(ServiceError::Conflict { message, .. }) if message.contains("cycle"));
}

fn reweigh(shipment: &mto_shipment::Model) -> RequestReweighCommand {
    RequestReweighCommand {
        shipment_id: shipment.id,
        etag: etag_of(shipment),
        requested_by: ReweighRequester::Prime,
    }
}

#[tokio::test]
async fn reweigh_is_requested_once() {
    let mut h = TestHarness::new().await;
    let shipment = shipment_in(&h, ShipmentStatus::Approved, |_| {}).await;
    let service = ShipmentLifecycleService::new(h.ctx.clone());

    let created = service
        .request_reweigh(reweigh(&shipment))
        .await
        .expect("reweigh request succeeds");
    assert_eq!(created.shipment_id, shipment.id);
    assert_eq!(created.requested_by, ReweighRequester::Prime);
    assert_eq!(created.weight, None);

    assert_matches!(
        service.request_reweigh(reweigh(&shipment)).await,
        Err(ServiceError::Conflict { message, .. }) if message.contains("already requested")
    );
    assert_matches!(
        h.drain_events().as_slice(),
        [Event::ReweighRequested { reweigh_id, .. }] if *reweigh_id == created.id
    );
}

#[tokio::test]
async fn reweigh_needs_an_active_shipment() {
    let h = TestHarness::new().await;
    let shipment = shipment_in(&h, ShipmentStatus::Submitted, |_| {}).await;

    let result = ShipmentLifecycleService::new(h.ctx.clone())
        .request_reweigh(reweigh(&shipment))
        .await;

    assert_matches!(result, Err(ServiceError::Conflict { .. }));
}
