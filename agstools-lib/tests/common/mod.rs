//! Fake ArcGIS endpoints for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::AtomicI64;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use agstools_lib::auth::Token;
use agstools_lib::FeatureLayerClient;
use serde_json::json;
use serde_json::Value;
use wiremock::matchers::method;
use wiremock::matchers::path;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::Request;
use wiremock::Respond;
use wiremock::ResponseTemplate;

pub const TOKEN: &str = "test-token";
pub const LAYER_PATH: &str = "/arcgis/rest/services/Parcels/FeatureServer/0";

/// Parses a form-encoded request body.
pub fn form(request: &Request) -> HashMap<String, String> {
    url::form_urlencoded::parse(&request.body)
        .into_owned()
        .collect()
}

/// Builds `count` parcel features with object ids starting at 1.
pub fn parcels(count: usize) -> Vec<Value> {
    (1..=count)
        .map(|id| {
            json!({
                "attributes": {"OBJECTID": id, "PARCEL_ID": format!("P-{:05}", id)},
                "geometry": {"x": id as f64, "y": -(id as f64)}
            })
        })
        .collect()
}

pub fn arcgis_error(code: i64, message: &str, details: &[&str]) -> Value {
    json!({"error": {"code": code, "message": message, "details": details}})
}

/// A feature layer `query` endpoint serving a fixed dataset.
///
/// Honours `resultOffset` / `resultRecordCount`, caps pages at
/// `max_record_count` and sets `exceededTransferLimit` when records remain,
/// the way ArcGIS Server does.
pub struct FakeLayer {
    features: Vec<Value>,
    max_record_count: usize,
    /// Answer with an invalid-token error from this request on (0-based).
    reject_token_from: Option<usize>,
    served: AtomicUsize,
}

impl FakeLayer {
    pub fn new(features: Vec<Value>, max_record_count: usize) -> Self {
        Self {
            features,
            max_record_count,
            reject_token_from: None,
            served: AtomicUsize::new(0),
        }
    }

    pub fn reject_token_from(mut self, request: usize) -> Self {
        self.reject_token_from = Some(request);
        self
    }
}

impl Respond for FakeLayer {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let n = self.served.fetch_add(1, Ordering::SeqCst);
        let params = form(request);

        if params.get("token").map(String::as_str) != Some(TOKEN) {
            return ResponseTemplate::new(200).set_body_json(arcgis_error(499, "Token Required", &[]));
        }
        if self.reject_token_from.is_some_and(|from| n >= from) {
            return ResponseTemplate::new(200).set_body_json(arcgis_error(498, "Invalid token.", &[]));
        }

        let offset: usize = params
            .get("resultOffset")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        let requested: usize = params
            .get("resultRecordCount")
            .and_then(|v| v.parse().ok())
            .unwrap_or(self.max_record_count)
            .min(self.max_record_count);

        let start = offset.min(self.features.len());
        let end = (offset + requested).min(self.features.len());

        ResponseTemplate::new(200).set_body_json(json!({
            "objectIdFieldName": "OBJECTID",
            "geometryType": "esriGeometryPoint",
            "features": &self.features[start..end],
            "exceededTransferLimit": end < self.features.len()
        }))
    }
}

/// `addFeatures` / `deleteFeatures` endpoints.
///
/// Added features get object ids counting up from `first_object_id`. A
/// feature whose `REJECT` attribute is `true` fails. With
/// `rollbackOnFailure=true` one failure fails the whole request, the way
/// ArcGIS Server reports a rolled-back edit.
pub struct EditEndpoint {
    next_object_id: AtomicI64,
    ignore_rollback: bool,
}

impl EditEndpoint {
    pub fn new(first_object_id: i64) -> Self {
        Self {
            next_object_id: AtomicI64::new(first_object_id),
            ignore_rollback: false,
        }
    }

    /// Reports per-feature success even when the request asked for rollback.
    pub fn ignore_rollback(mut self) -> Self {
        self.ignore_rollback = true;
        self
    }
}

impl Respond for EditEndpoint {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let params = form(request);

        if request.url.path().ends_with("/addFeatures") {
            let features: Vec<Value> = serde_json::from_str(&params["features"]).unwrap();
            let rejected = |feature: &Value| feature["attributes"]["REJECT"] == json!(true);
            let rolled_back = !self.ignore_rollback
                && params.get("rollbackOnFailure").map(String::as_str) == Some("true")
                && features.iter().any(rejected);

            let results: Vec<Value> = features
                .iter()
                .map(|feature| {
                    if rejected(feature) {
                        json!({
                            "objectId": null,
                            "success": false,
                            "error": {"code": 1000, "description": "rejected by test"}
                        })
                    } else if rolled_back {
                        json!({
                            "objectId": null,
                            "success": false,
                            "error": {"code": 1003, "description": "Operation rolled back."}
                        })
                    } else {
                        let id = self.next_object_id.fetch_add(1, Ordering::SeqCst);
                        json!({"objectId": id, "success": true})
                    }
                })
                .collect();
            return ResponseTemplate::new(200).set_body_json(json!({"addResults": results}));
        }

        let results: Vec<Value> = params["objectIds"]
            .split(',')
            .map(|id| json!({"objectId": id.trim().parse::<i64>().unwrap(), "success": true}))
            .collect();
        ResponseTemplate::new(200).set_body_json(json!({"deleteResults": results}))
    }
}

/// Definition of a layer with the given string fields plus `OBJECTID`.
pub fn layer_definition(name: &str, fields: &[&str]) -> Value {
    let mut all = vec![json!({"name": "OBJECTID", "type": "esriFieldTypeOID", "alias": "OBJECTID"})];
    all.extend(
        fields
            .iter()
            .map(|f| json!({"name": f, "type": "esriFieldTypeString", "alias": f})),
    );
    json!({
        "id": 0,
        "name": name,
        "type": "Feature Layer",
        "geometryType": "esriGeometryPoint",
        "objectIdField": "OBJECTID",
        "maxRecordCount": 2000,
        "fields": all
    })
}

pub async fn mount_definition(server: &MockServer, layer_path: &str, definition: Value) {
    Mock::given(method("POST"))
        .and(path(layer_path))
        .respond_with(ResponseTemplate::new(200).set_body_json(definition))
        .mount(server)
        .await;
}

pub async fn mount_edits(server: &MockServer, layer_path: &str, endpoint: EditEndpoint) {
    let endpoint = std::sync::Arc::new(endpoint);
    for operation in ["addFeatures", "deleteFeatures"] {
        Mock::given(method("POST"))
            .and(path(format!("{}/{}", layer_path, operation)))
            .respond_with(SharedResponder(endpoint.clone()))
            .mount(server)
            .await;
    }
}

struct SharedResponder<R>(std::sync::Arc<R>);

impl<R: Respond> Respond for SharedResponder<R> {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        self.0.respond(request)
    }
}

/// Form bodies of every request sent to `<layer_path>/<operation>`, in order.
pub async fn operation_forms(
    server: &MockServer,
    layer_path: &str,
    operation: &str,
) -> Vec<HashMap<String, String>> {
    let target = format!("{}/{}", layer_path, operation);
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == target)
        .map(form)
        .collect()
}

pub async fn mount_query(server: &MockServer, responder: impl Respond + 'static) {
    Mock::given(method("POST"))
        .and(path(format!("{}/query", LAYER_PATH)))
        .respond_with(responder)
        .mount(server)
        .await;
}

pub fn layer_client(server: &MockServer) -> FeatureLayerClient {
    layer_client_at(server, LAYER_PATH)
}

pub fn layer_client_at(server: &MockServer, layer_path: &str) -> FeatureLayerClient {
    FeatureLayerClient::builder()
        .url(format!("{}{}", server.uri(), layer_path))
        .token(Token::new(TOKEN))
        .build()
        .expect("valid layer client")
}

/// `resultOffset` of every query request received, in order.
pub async fn requested_offsets(server: &MockServer) -> Vec<u64> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path().ends_with("/query"))
        .map(|r| form(r)["resultOffset"].parse().unwrap())
        .collect()
}
