//! HTTP surface tests, served in-process against a scripted OGC server.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use map_common::LayerCatalog;
use serde_json::{json, Value};
use test_utils::{
    empty_body, kansas_body, raster_layer, states_layer, MockFetcher, MockReply, WFS_URL, WMS_URL,
};
use tower::ServiceExt;
use viewer_api::config::ViewerConfig;
use viewer_api::state::AppState;

fn app_with(mock: MockFetcher) -> (Router, Arc<AppState>) {
    let config = ViewerConfig {
        wms_url: WMS_URL.to_string(),
        wfs_url: WFS_URL.to_string(),
        ..Default::default()
    };
    let catalog = LayerCatalog::new(vec![
        states_layer(),
        raster_layer("counties", "topp:counties").with_visible(false),
    ])
    .unwrap();
    let state = Arc::new(AppState::with_fetcher(config, catalog, Arc::new(mock)));
    (viewer_api::build_router(state.clone()), state)
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn click_body() -> Value {
    json!({
        "viewport": {"center": {"lat": 39.0, "lng": -98.0}, "zoom": 4, "width": 1024, "height": 768},
        "point": {"x": 512, "y": 384}
    })
}

#[tokio::test]
async fn test_health() {
    let (app, _) = app_with(MockFetcher::new());
    let (status, body) = send(app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_config_lists_visible_tile_sources() {
    let (app, _) = app_with(MockFetcher::new());
    let (status, body) = send(app, Method::GET, "/config", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["initial_view"]["center"], json!([39.0, -98.0]));
    assert_eq!(body["initial_view"]["zoom"], 4.0);
    assert_eq!(
        body["basemap"]["attribution"],
        "© OpenStreetMap contributors"
    );
    let sources = body["tile_sources"].as_array().unwrap();
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0]["layers"], "topp:states");
    assert_eq!(sources[0]["url"], WMS_URL);
    assert_eq!(sources[0]["format"], "image/png");
    assert_eq!(sources[0]["transparent"], true);
}

#[tokio::test]
async fn test_layers_reflect_visibility_toggle() {
    let (app, state) = app_with(MockFetcher::new());

    let (status, body) = send(
        app.clone(),
        Method::PUT,
        "/layers/counties/visibility",
        Some(json!({"visible": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[1]["id"], "counties");
    assert_eq!(body[1]["visible"], true);
    assert_eq!(state.map_state.visibility().get("counties"), Some(&true));

    let (_, body) = send(app, Method::GET, "/layers", None).await;
    assert_eq!(body[0]["id"], "states");
    assert_eq!(body[0]["visible"], true);
    assert_eq!(body[0]["wfs_type_name"], "topp:states");
    assert_eq!(body[0]["info_format"], "application/json");
    assert_eq!(body[1]["visible"], true);
}

#[tokio::test]
async fn test_unknown_layer_visibility_is_404() {
    let (app, state) = app_with(MockFetcher::new());
    let (status, body) = send(
        app,
        Method::PUT,
        "/layers/roads/visibility",
        Some(json!({"visible": false})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "LayerNotDefined");
    assert!(state.map_state.visibility().get("roads").is_none());
}

#[tokio::test]
async fn test_identify_publishes_and_popup_closes() {
    let mock = MockFetcher::new().on_wms("topp:states", MockReply::ok(kansas_body()));
    let (app, _) = app_with(mock);

    let (status, body) = send(app.clone(), Method::POST, "/identify", Some(click_body())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"]["result"], "matched");
    assert_eq!(body["outcome"]["layer_id"], "states");
    assert_eq!(body["outcome"]["source"], "wms");
    assert_eq!(body["popup"]["attributes"], json!({"STATE_NAME": "Kansas"}));
    assert_eq!(body["highlight"]["geometry"]["type"], "MultiPolygon");

    let (_, body) = send(app.clone(), Method::GET, "/state", None).await;
    assert_eq!(body["popup_rows"], json!([["STATE_NAME", "Kansas"]]));
    assert_eq!(body["style"]["weight"], 3);

    let (status, body) = send(app, Method::DELETE, "/popup", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["popup"].is_null());
    assert_eq!(body["highlight"]["properties"]["STATE_NAME"], "Kansas");
}

#[tokio::test]
async fn test_identify_no_match() {
    let mock = MockFetcher::new()
        .on_wms("topp:states", MockReply::ok(empty_body()))
        .on_wfs("topp:states", vec![MockReply::ok(empty_body())]);
    let (app, _) = app_with(mock);

    let (status, body) = send(app, Method::POST, "/identify", Some(click_body())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"]["result"], "no_match");
    assert!(body["popup"].is_null());
    assert!(body["highlight"].is_null());
}

#[tokio::test]
async fn test_identify_rejects_invalid_viewport() {
    let (app, _) = app_with(MockFetcher::new());
    let mut body = click_body();
    body["viewport"]["width"] = json!(0);

    let (status, body) = send(app, Method::POST, "/identify", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "InvalidViewport");
}

#[tokio::test]
async fn test_metrics_without_recorder_is_empty() {
    let (app, _) = app_with(MockFetcher::new());
    let response = app
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/plain; version=0.0.4"
    );
}
