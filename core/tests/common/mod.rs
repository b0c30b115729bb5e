#![allow(dead_code)]

use jsonable_core::{HttpResult, Resource, ResponseHooks};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub quantity: u32,
}

impl Resource for Widget {
    const URL_NAME: &'static str = "widgets";
}

pub fn widget(name: &str, quantity: u32) -> Widget {
    Widget {
        id: String::new(),
        name: name.to_string(),
        quantity,
    }
}

/// Copies server-assigned ids from a create response into the local widgets.
#[derive(Debug, Default)]
pub struct MergeIds {
    pub merged: usize,
}

impl ResponseHooks<Widget> for MergeIds {
    fn on_create_response(
        &mut self,
        index: usize,
        entity: &mut Widget,
        json: &Value,
        _: &HttpResult,
    ) {
        if let Some(id) = json[index]["id"].as_str() {
            entity.id = id.to_string();
            self.merged += 1;
        }
    }
}

/// Start the mock server on a random port and return its base URL.
pub fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}/")
}
