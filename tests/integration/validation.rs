use crate::*;

const PUT_REJECTED: &str = "invalid json of PreparePutPeer";
const READ_REJECTED: &str = "invalid json of ReadPeer";

/// Rejected bodies get a 400 and never open a store handle.
async fn assert_rejected(server: &TestServer, method: reqwest::Method, path: &str, body: Value) {
    let opened_before = server.store.connections_opened();
    let expected = if path == "/peer" {
        PUT_REJECTED
    } else {
        READ_REJECTED
    };

    let (status, resp) = server.send(method, path, &body).await.unwrap();
    assert_eq!(status, 400, "body {body} should be rejected, got {resp}");
    assert_eq!(resp["message"], expected);

    assert_eq!(
        server.store.connections_opened(),
        opened_before,
        "store touched for rejected body {body}"
    );
}

#[tokio::test]
async fn test_put_missing_fields_rejected() {
    let server = start_server("val-put", LookupStrategy::PerRow).await.unwrap();
    let full = serde_json::json!({
        "peer_id": "p", "addr": "a", "credential": "c", "longitude": 1.0, "latitude": 2.0,
    });

    for field in ["peer_id", "addr", "credential", "longitude", "latitude"] {
        let mut body = full.clone();
        body.as_object_mut().unwrap().remove(field);
        assert_rejected(&server, reqwest::Method::POST, "/peer", body).await;
    }

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_put_bad_values_rejected() {
    let server = start_server("val-put-bad", LookupStrategy::PerRow).await.unwrap();

    let bodies = [
        serde_json::json!({ "peer_id": "", "addr": "a", "credential": "c", "longitude": 1.0, "latitude": 2.0 }),
        serde_json::json!({ "peer_id": "p", "addr": "a", "credential": "c", "longitude": "east", "latitude": 2.0 }),
        serde_json::json!({ "peer_id": 7, "addr": "a", "credential": "c", "longitude": 1.0, "latitude": 2.0 }),
        serde_json::json!([1, 2, 3]),
    ];
    for body in bodies {
        assert_rejected(&server, reqwest::Method::POST, "/peer", body).await;
    }

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_read_missing_fields_rejected() {
    let server = start_server("val-read", LookupStrategy::PerRow).await.unwrap();
    let full = serde_json::json!({ "longitude": 1.0, "latitude": 2.0, "radius": 100.0 });

    for field in ["longitude", "latitude", "radius"] {
        let mut body = full.clone();
        body.as_object_mut().unwrap().remove(field);
        assert_rejected(&server, reqwest::Method::GET, "/peer/read", body).await;
    }

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_non_json_body_rejected() {
    let server = start_server("val-raw", LookupStrategy::PerRow).await.unwrap();
    let opened_before = server.store.connections_opened();

    let resp = server
        .client
        .post(server.url("/peer"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], PUT_REJECTED);

    let resp = server
        .client
        .get(server.url("/peer/read"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], READ_REJECTED);

    assert_eq!(server.store.connections_opened(), opened_before);
    server.stop().await.unwrap();
}

/// Well-formed JSON is accepted without a JSON content type.
#[tokio::test]
async fn test_json_accepted_without_json_content_type() {
    let server = start_server("val-ctype", LookupStrategy::PerRow).await.unwrap();

    let put = serde_json::json!({
        "peer_id": "plain", "addr": "a", "credential": "c", "longitude": 10.0, "latitude": 20.0,
    });
    let resp = server
        .client
        .post(server.url("/peer"))
        .body(put.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let read = serde_json::json!({ "longitude": 10.0, "latitude": 20.0, "radius": 10.0 });
    let resp = server
        .client
        .get(server.url("/peer/read"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body(read.to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["location"], serde_json::json!(["plain"]));

    server.stop().await.unwrap();
}
