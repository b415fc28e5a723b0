//! Common test utilities: a scripted Kubernetes API server

#![allow(dead_code)]

use http::{Request, Response, StatusCode};
use kube::client::Body;
use kube::Client;
use riju_api::kubernetes::client::K8sClient;
use serde_json::{json, Value};
use tower_test::mock::{self, Handle};

pub const NAMESPACE: &str = "riju-user";

pub type ApiServerHandle = Handle<Request<Body>, Response<Body>>;

/// Client whose requests are answered through the returned handle
pub fn mock_client() -> (K8sClient, ApiServerHandle) {
    let (service, handle) = mock::pair::<Request<Body>, Response<Body>>();
    let client = Client::new(service, NAMESPACE);
    (K8sClient::from_client(client, NAMESPACE, "http://mock-apiserver"), handle)
}

/// Wait for the next request and answer it with a JSON body
pub async fn respond(
    handle: &mut ApiServerHandle,
    status: StatusCode,
    body: Value,
) -> (http::request::Parts, Value) {
    let (request, send) = handle.next_request().await.expect("no request received");
    let (parts, body_in) = request.into_parts();
    let bytes = body_in.collect_bytes().await.expect("readable request body");
    let request_json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("request body is JSON")
    };

    let response = Response::builder()
        .status(status)
        .body(Body::from(serde_json::to_vec(&body).expect("serializable body")))
        .expect("valid response");
    send.send_response(response);

    (parts, request_json)
}

/// A session pod as the API server would return it
pub fn session_pod(session_id: &str, phase: &str) -> Value {
    json!({
        "apiVersion": "v1",
        "kind": "Pod",
        "metadata": {
            "name": format!("riju-user-session-{}", session_id),
            "namespace": NAMESPACE,
            "labels": { "riju.codes/user-session-id": session_id }
        },
        "spec": { "containers": [ { "name": "session" } ] },
        "status": { "phase": phase }
    })
}

pub fn pod_list(items: Vec<Value>) -> Value {
    json!({
        "apiVersion": "v1",
        "kind": "PodList",
        "metadata": { "resourceVersion": "1" },
        "items": items
    })
}

/// Kubernetes Status object for a failed request
pub fn status_error(code: u16, reason: &str, message: &str) -> Value {
    json!({
        "apiVersion": "v1",
        "kind": "Status",
        "metadata": {},
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    })
}
