use crate::*;

async fn seed_abc(server: &TestServer) {
    for (id, lng, lat) in [("A", 0.0, 0.0), ("B", 0.0, 0.0005), ("C", 10.0, 10.0)] {
        let (status, _) = server.put_peer(id, lng, lat).await.unwrap();
        assert_eq!(status, 200);
    }
}

#[tokio::test]
async fn test_read_returns_peers_within_radius() {
    let server = start_server("read", LookupStrategy::PerRow).await.unwrap();
    seed_abc(&server).await;

    let (status, body) = server.read(0.0, 0.0, 100.0).await.unwrap();
    assert_eq!(status, 200);
    assert_eq!(body, serde_json::json!({ "location": ["A", "B"] }));

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_read_empty_store() {
    let server = start_server("read-empty", LookupStrategy::PerRow).await.unwrap();

    let (status, body) = server.read(0.0, 0.0, 100.0).await.unwrap();
    assert_eq!(status, 200);
    assert_eq!(body["location"], serde_json::json!([]));

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_read_zero_radius_exact_match() {
    let server = start_server("read-zero", LookupStrategy::PerRow).await.unwrap();
    seed_abc(&server).await;

    assert_eq!(server.read_ids(0.0, 0.0005, 0.0).await.unwrap(), ["B"]);
    assert!(server.read_ids(0.0, 0.0004, 0.0).await.unwrap().is_empty());

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_read_is_repeatable() {
    let server = start_server("read-repeat", LookupStrategy::PerRow).await.unwrap();
    for i in 0..10 {
        let (status, _) = server
            .put_peer(&format!("n{i}"), (i as f64) * 0.0002, 0.0)
            .await
            .unwrap();
        assert_eq!(status, 200);
    }

    let first = server.read_ids(0.0, 0.0, 100.0).await.unwrap();
    let second = server.read_ids(0.0, 0.0, 100.0).await.unwrap();
    assert_eq!(first, ["n0", "n1", "n2", "n3", "n4"]);
    assert_eq!(first, second);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_single_query_strategy_matches_reference() {
    let reference = start_server("read-ref", LookupStrategy::PerRow).await.unwrap();
    let single = start_server("read-single", LookupStrategy::SingleQuery).await.unwrap();
    for server in [&reference, &single] {
        seed_abc(server).await;
        server.put_peer("D", 0.0006, -0.0006).await.unwrap();
    }

    for (lng, lat, radius) in [(0.0, 0.0, 100.0), (10.0, 10.0, 0.0), (0.0, 0.0, 5_000_000.0)] {
        assert_eq!(
            reference.read_ids(lng, lat, radius).await.unwrap(),
            single.read_ids(lng, lat, radius).await.unwrap()
        );
    }

    let (_, status) = single
        .send(reqwest::Method::GET, "/status", &Value::Null)
        .await
        .unwrap();
    assert_eq!(status["lookup_strategy"], "single_query");

    reference.stop().await.unwrap();
    single.stop().await.unwrap();
}

#[tokio::test]
async fn test_read_store_failure_is_500() {
    let server = start_broken_server("read-broken").await.unwrap();

    let (status, body) = server.read(0.0, 0.0, 100.0).await.unwrap();
    assert_eq!(status, 500);
    assert_eq!(body["message"], "Failed read peer information");
    assert!(body.get("location").is_none());

    server.stop().await.unwrap();
}
