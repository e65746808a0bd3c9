use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::models::move_task_order::MoveStatus;
use crate::models::mto_shipment::ShipmentStatus;

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Creates a sender together with the receiving end of a bounded channel.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self::new(tx), rx)
    }

    /// Builds the channel sized by `event_channel_capacity`.
    pub fn from_config(config: &AppConfig) -> (Self, mpsc::Receiver<Event>) {
        debug!(capacity = config.event_channel_capacity, "Creating event channel");
        Self::channel(config.event_channel_capacity)
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event, logging instead of failing when nobody is listening.
    ///
    /// Events go out after the transaction has committed, so a closed channel
    /// must not turn a completed use case into an error.
    pub async fn send_or_log(&self, event: Event) {
        let name = event.name();
        if let Err(e) = self.send(event).await {
            warn!(event = name, "Dropping domain event: {}", e);
        } else {
            debug!(event = name, "Domain event published");
        }
    }
}

/// Domain events published once a use case has committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    ShipmentApproved {
        shipment_id: Uuid,
        move_id: Uuid,
        required_delivery_date: Option<NaiveDate>,
    },
    ShipmentRejected {
        shipment_id: Uuid,
        reason: String,
    },
    ShipmentDiversionRequested {
        shipment_id: Uuid,
    },
    ShipmentDiversionApproved {
        shipment_id: Uuid,
    },
    ShipmentCancellationRequested {
        shipment_id: Uuid,
    },
    ShipmentCanceled {
        shipment_id: Uuid,
    },
    ShipmentTerminated {
        shipment_id: Uuid,
        terminated_at: DateTime<Utc>,
    },
    ShipmentStatusChanged {
        shipment_id: Uuid,
        old_status: ShipmentStatus,
        new_status: ShipmentStatus,
    },
    ShipmentUpdated {
        shipment_id: Uuid,
    },
    ReweighRequested {
        shipment_id: Uuid,
        reweigh_id: Uuid,
    },
    SitExtensionCreated {
        shipment_id: Uuid,
        sit_extension_id: Uuid,
    },
    SitExtensionApproved {
        shipment_id: Uuid,
        sit_extension_id: Uuid,
        approved_days: i32,
    },
    SitExtensionDenied {
        shipment_id: Uuid,
        sit_extension_id: Uuid,
    },
    MoveStatusChanged {
        move_id: Uuid,
        new_status: MoveStatus,
    },
    AuthorizedWeightUpdated {
        move_id: Uuid,
        authorized_weight: i32,
    },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::ShipmentApproved { .. } => "ShipmentApproved",
            Event::ShipmentRejected { .. } => "ShipmentRejected",
            Event::ShipmentDiversionRequested { .. } => "ShipmentDiversionRequested",
            Event::ShipmentDiversionApproved { .. } => "ShipmentDiversionApproved",
            Event::ShipmentCancellationRequested { .. } => "ShipmentCancellationRequested",
            Event::ShipmentCanceled { .. } => "ShipmentCanceled",
            Event::ShipmentTerminated { .. } => "ShipmentTerminated",
            Event::ShipmentStatusChanged { .. } => "ShipmentStatusChanged",
            Event::ShipmentUpdated { .. } => "ShipmentUpdated",
            Event::ReweighRequested { .. } => "ReweighRequested",
            Event::SitExtensionCreated { .. } => "SitExtensionCreated",
            Event::SitExtensionApproved { .. } => "SitExtensionApproved",
            Event::SitExtensionDenied { .. } => "SitExtensionDenied",
            Event::MoveStatusChanged { .. } => "MoveStatusChanged",
            Event::AuthorizedWeightUpdated { .. } => "AuthorizedWeightUpdated",
        }
    }
}

/// Drains the channel, logging each event. Downstream delivery (webhooks,
/// notifications) subscribes by replacing this loop.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match serde_json::to_string(&event) {
            Ok(payload) => info!(event = event.name(), %payload, "Received event"),
            Err(e) => warn!(event = event.name(), "Failed to serialize event: {}", e),
        }
    }

    info!("Event channel closed; stopping event processing loop");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_or_log_survives_closed_channel() {
        let (sender, rx) = EventSender::channel(1);
        drop(rx);
        sender
            .send_or_log(Event::ShipmentCanceled {
                shipment_id: Uuid::new_v4(),
            })
            .await;
    }

    #[test]
    fn channel_is_sized_from_config() {
        let mut config = AppConfig::new("sqlite::memory:".into(), "test".into());
        config.event_channel_capacity = 7;

        let (sender, _rx) = EventSender::from_config(&config);

        assert_eq!(sender.sender.max_capacity(), 7);
    }

    #[tokio::test]
    async fn events_arrive_in_order() {
        let (sender, mut rx) = EventSender::channel(4);
        let id = Uuid::new_v4();
        sender
            .send(Event::ShipmentCancellationRequested { shipment_id: id })
            .await
            .unwrap();
        sender
            .send(Event::ShipmentCanceled { shipment_id: id })
            .await
            .unwrap();

        assert_eq!(
            rx.recv().await,
            Some(Event::ShipmentCancellationRequested { shipment_id: id })
        );
        assert_eq!(rx.recv().await, Some(Event::ShipmentCanceled { shipment_id: id }));
    }
}
