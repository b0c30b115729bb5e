use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub quantity: u32,
}

/// Payload element for `POST /widgets`. Any client-side `id` is ignored.
#[derive(Deserialize)]
pub struct NewWidget {
    pub name: String,
    #[serde(default)]
    pub quantity: u32,
}

/// Payload element for `DELETE /widgets`. Only the `id` is read.
#[derive(Deserialize)]
pub struct WidgetRef {
    pub id: String,
}

/// Widgets in insertion order, so list responses are stable.
pub type Db = Arc<RwLock<Vec<Widget>>>;

pub fn app() -> Router {
    let db: Db = Arc::default();
    Router::new()
        .route(
            "/widgets",
            get(list_widgets)
                .post(create_widgets)
                .put(update_widgets)
                .delete(delete_widgets),
        )
        .route("/widgets/{id}", get(get_widget))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_widgets(State(db): State<Db>) -> Json<Vec<Widget>> {
    Json(db.read().await.clone())
}

async fn create_widgets(
    State(db): State<Db>,
    Json(input): Json<Vec<NewWidget>>,
) -> (StatusCode, Json<Vec<Widget>>) {
    let created: Vec<Widget> = input
        .into_iter()
        .map(|new| Widget {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            quantity: new.quantity,
        })
        .collect();
    debug!(count = created.len(), "created widgets");
    db.write().await.extend(created.iter().cloned());
    (StatusCode::CREATED, Json(created))
}

async fn get_widget(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Widget>, StatusCode> {
    let widgets = db.read().await;
    widgets
        .iter()
        .find(|w| w.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// Replace every listed widget; nothing changes unless all ids exist.
async fn update_widgets(
    State(db): State<Db>,
    Json(input): Json<Vec<Widget>>,
) -> Result<Json<Vec<Widget>>, StatusCode> {
    let mut widgets = db.write().await;
    if !input.iter().all(|new| widgets.iter().any(|w| w.id == new.id)) {
        return Err(StatusCode::NOT_FOUND);
    }
    for new in &input {
        if let Some(existing) = widgets.iter_mut().find(|w| w.id == new.id) {
            *existing = new.clone();
        }
    }
    Ok(Json(input))
}

/// Remove the listed widgets and return the ones that existed.
async fn delete_widgets(
    State(db): State<Db>,
    Json(input): Json<Vec<WidgetRef>>,
) -> Json<Vec<Widget>> {
    let mut widgets = db.write().await;
    let (removed, kept): (Vec<Widget>, Vec<Widget>) = widgets
        .drain(..)
        .partition(|w| input.iter().any(|r| r.id == w.id));
    *widgets = kept;
    debug!(count = removed.len(), "deleted widgets");
    Json(removed)
}
