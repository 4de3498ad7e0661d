use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    response::{
        sse::{Event, KeepAlive},
        IntoResponse, Response, Sse,
    },
};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::features::ideas::events::IdeaEvent;
use crate::features::ideas::services::IdeaService;

/// Stream idea events as Server-Sent Events
#[utoipa::path(
    get,
    path = "/api/ideas/events",
    responses(
        (status = 200, description = "SSE stream of idea events", content_type = "text/event-stream", body = IdeaEvent),
    ),
    tag = "ideas"
)]
pub async fn idea_events(State(service): State<Arc<IdeaService>>) -> Response {
    let stream = BroadcastStream::new(service.subscribe()).filter_map(|item| match item {
        Ok(event) => to_sse_event(&event).map(Ok::<_, Infallible>),
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::warn!("SSE subscriber lagged, {} idea events dropped", skipped);
            None
        }
    });

    Sse::new(stream)
        .keep_alive(
            KeepAlive::new()
                .interval(Duration::from_secs(15))
                .text("ping"),
        )
        .into_response()
}

fn to_sse_event(event: &IdeaEvent) -> Option<Event> {
    match Event::default().event(event.name()).json_data(event) {
        Ok(sse) => Some(sse),
        Err(e) => {
            tracing::error!("Failed to serialize idea event: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_every_event_converts() {
        let idea_id = Uuid::now_v7();
        let events = [
            IdeaEvent::Created {
                idea_id,
                slug: "dark-mode".to_string(),
            },
            IdeaEvent::MarkedAsSpam {
                idea_id,
                spam_reports: 2,
            },
            IdeaEvent::Deleted { idea_id },
        ];

        for event in &events {
            assert!(to_sse_event(event).is_some());
        }
    }
}
