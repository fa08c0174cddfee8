use axum::body::{self, Body};
use axum::http::{Method, Request};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Used in tests to both extract the raw bytes from the HTTP response body and then deserialize them into the
/// requested type. Will panic and fail the test if either step fails somehow.
pub async fn deserialize_body<T: DeserializeOwned>(response_body: Body) -> T {
    let bytes = body::to_bytes(response_body, usize::MAX)
        .await
        .expect("Could not read data from response body!");

    serde_json::from_slice(&bytes).unwrap_or_else(|err| {
        panic!(
            "Could not parse body content into data structure! Error: {}, Received body: {:?}",
            err, bytes
        )
    })
}

/// Builds a request carrying [payload] as its JSON body
pub fn json_request(method: Method, uri: &str, payload: &impl Serialize) -> Request<Body> {
    let body = serde_json::to_vec(payload).expect("test payload should serialize");

    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .expect("test request should build")
}
