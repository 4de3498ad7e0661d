//! In-process idea events.
//!
//! Services publish after a mutation has been committed. Subscribers (the
//! SSE endpoint, tests) each get their own bounded buffer; a slow subscriber
//! loses the oldest events instead of blocking publishers.

use serde::Serialize;
use tokio::sync::broadcast;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::shared::constants::EVENT_BUS_CAPACITY;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IdeaEvent {
    Created {
        idea_id: Uuid,
        slug: String,
    },
    StatusChanged {
        idea_id: Uuid,
        old_status: String,
        new_status: String,
    },
    MarkedAsSpam {
        idea_id: Uuid,
        spam_reports: i32,
    },
    MarkedAsNotSpam {
        idea_id: Uuid,
    },
    Deleted {
        idea_id: Uuid,
    },
}

impl IdeaEvent {
    /// SSE event name
    pub fn name(&self) -> &'static str {
        match self {
            IdeaEvent::Created { .. } => "created",
            IdeaEvent::StatusChanged { .. } => "status_changed",
            IdeaEvent::MarkedAsSpam { .. } => "marked_as_spam",
            IdeaEvent::MarkedAsNotSpam { .. } => "marked_as_not_spam",
            IdeaEvent::Deleted { .. } => "deleted",
        }
    }
}

#[derive(Clone)]
pub struct IdeaEventBus {
    tx: broadcast::Sender<IdeaEvent>,
}

impl IdeaEventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_BUS_CAPACITY);
        Self { tx }
    }

    /// Publish to current subscribers; having none is not an error
    pub fn publish(&self, event: IdeaEvent) {
        let delivered = self.tx.send(event).unwrap_or(0);
        tracing::debug!("Idea event delivered to {} subscribers", delivered);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<IdeaEvent> {
        self.tx.subscribe()
    }
}

impl Default for IdeaEventBus {
    fn default() -> Self {
        Self::new()
    }
}
