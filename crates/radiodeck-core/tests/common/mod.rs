#![allow(dead_code)]

use radiodeck_core::api::DirectoryClient;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// `n` station records shaped like radio-browser's, named `{prefix}-{i}`.
pub fn stations_json(prefix: &str, n: usize) -> Value {
    let records: Vec<Value> = (0..n)
        .map(|i| {
            json!({
                "stationuuid": format!("{}-{}", prefix, i),
                "name": format!("{}-{}", prefix, i),
                "url_resolved": format!("http://stream.example/{}/{}", prefix, i),
                "favicon": if i % 2 == 0 { Value::String(format!("https://img.example/{}.png", i)) } else { Value::Null },
                "tags": "jazz,news",
                "country": "Germany",
                "codec": "MP3",
                "bitrate": 128,
                "votes": i,
            })
        })
        .collect();
    Value::Array(records)
}

pub async fn mount_json(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub async fn mount_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

pub fn client_for(server: &MockServer) -> DirectoryClient {
    DirectoryClient::with_base_url(server.uri()).expect("client builds")
}
