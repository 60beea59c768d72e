use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::{AppState, SimEvent};

#[derive(Debug, Serialize)]
pub struct NewsFeed {
    pub month: String,
    pub news: String,
    pub id: String,
}

/// GET /news_feed: serve the next headline on the shared timeline.
///
/// Each call consumes one entry for everyone; once the timeline is used up
/// every call returns the same final item.
pub async fn news_feed(State(app): State<AppState>) -> Json<NewsFeed> {
    let served = {
        let mut sim = app.sim.lock().await;
        sim.next_news(app.clock.now())
    };

    if let Some(crisis) = &served.fired {
        tracing::info!(
            crisis = %crisis.id,
            headline = %served.item.id,
            month = %served.item.month,
            "crisis fired for all teams"
        );
        app.publish(SimEvent::CrisisFired {
            crisis: crisis.clone(),
        });
    }
    if !served.item.terminal {
        tracing::debug!(headline = %served.item.id, month = %served.item.month, "served headline");
        app.publish(SimEvent::News {
            item: served.item.clone(),
        });
    }

    let item = served.item;
    Json(NewsFeed {
        month: item.month,
        news: item.text,
        id: item.id,
    })
}
