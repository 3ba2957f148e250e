use axum::body;
use serde::de::DeserializeOwned;

async fn body_bytes(response_body: body::Body) -> body::Bytes {
    body::to_bytes(response_body, usize::MAX)
        .await
        .expect("Could not read data from response body!")
}

/// Used in tests to both extract the raw bytes from the HTTP response body and then deserialize them into the
/// requested type. Will panic and fail the test if either step fails somehow.
pub async fn deserialize_body<T: DeserializeOwned>(response_body: body::Body) -> T {
    let bytes = body_bytes(response_body).await;

    serde_json::from_slice(&bytes).unwrap_or_else(|err| {
        panic!(
            "Could not parse body content into data structure! Error: {}, Received body: {:?}",
            err, bytes
        )
    })
}

/// Reads a response body as text, for endpoints that don't speak JSON
pub async fn body_text(response_body: body::Body) -> String {
    let bytes = body_bytes(response_body).await;

    String::from_utf8(bytes.to_vec()).expect("Response body was not valid UTF-8")
}
