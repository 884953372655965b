//! End-to-end tests wiring auth, the executor, and the query runner
//! against a mock service.

use recordkit::{
    AuthFlow, Client, ClientConfig, Credentials, PageSource, QueryConfig, QueryPages, QueryRunner,
};
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, serde::Deserialize)]
struct Prospect {
    id: u64,
}

fn auth_flow(server: &MockServer) -> AuthFlow {
    AuthFlow::OauthPassword {
        token_url: format!("{}/oauth2/token", server.uri()),
        credentials: Credentials::new("cid", "secret", "user@example.com", "hunter2"),
    }
}

fn client(server: &MockServer) -> Arc<Client> {
    let config = ClientConfig::builder()
        .base_url(format!("{}/api", server.uri()))
        .auth(auth_flow(server))
        .no_rate_limit()
        .build()
        .unwrap();
    Arc::new(Client::new(config).unwrap())
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "access_token": "tok-1" })),
        )
        .mount(server)
        .await;
}

fn page_body(from: u64, count: u64) -> serde_json::Value {
    let records: Vec<serde_json::Value> =
        (from..from + count).map(|id| serde_json::json!({ "id": id })).collect();
    serde_json::json!({ "result": { "total_results": 450, "record": records } })
}

fn empty_body() -> serde_json::Value {
    serde_json::json!({ "result": { "total_results": 450 } })
}

async fn mount_dataset(server: &MockServer) {
    for (offset, count) in [(0u64, 200u64), (200, 200), (400, 50)] {
        Mock::given(method("GET"))
            .and(path("/api/record/do/query"))
            .and(query_param("offset", offset.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(offset, count)))
            .mount(server)
            .await;
    }

    // Every other offset is past the end of the dataset
    Mock::given(method("GET"))
        .and(path("/api/record/do/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_body()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn query_all_collects_every_record() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_dataset(&server).await;

    let source = Arc::new(QueryPages::new(
        client(&server),
        "record/do/query",
        "record",
    ));
    let runner = QueryRunner::new(QueryConfig::new(4, 200));

    let mut prospects: Vec<Prospect> = runner
        .collect(source as Arc<dyn PageSource>, vec!["id".to_string()])
        .await
        .unwrap();

    assert_eq!(prospects.len(), 450);
    prospects.sort_by_key(|p| p.id);
    assert_eq!(prospects.first().unwrap().id, 0);
    assert_eq!(prospects.last().unwrap().id, 449);
}

#[tokio::test]
async fn query_all_streams_pages_into_sink() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_dataset(&server).await;

    let source = Arc::new(QueryPages::new(
        client(&server),
        "record/do/query",
        "record",
    ));
    let runner = QueryRunner::new(QueryConfig::new(4, 200));

    let pages: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));
    let sink_pages = Arc::clone(&pages);
    runner
        .run(
            source as Arc<dyn PageSource>,
            vec!["id".to_string()],
            move |payload| {
                let count = serde_json::from_slice::<Vec<serde_json::Value>>(&payload)
                    .unwrap()
                    .len();
                sink_pages.lock().unwrap().push(count);
            },
        )
        .await
        .unwrap();

    let mut sizes = pages.lock().unwrap().clone();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![50, 200, 200]);
}

#[tokio::test]
async fn query_all_recovers_from_token_expiry_mid_run() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    // One page response reports an expired token before the dataset
    // mocks get a chance to match; the executor re-authenticates and
    // replays that page transparently
    Mock::given(method("GET"))
        .and(path("/api/record/do/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "err": "API key expired",
            "@attributes": { "err_code": 1 }
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    mount_dataset(&server).await;

    let source = Arc::new(QueryPages::new(
        client(&server),
        "record/do/query",
        "record",
    ));
    let runner = QueryRunner::new(QueryConfig::new(4, 200));

    let prospects: Vec<Prospect> = runner
        .collect(source as Arc<dyn PageSource>, vec!["id".to_string()])
        .await
        .unwrap();
    assert_eq!(prospects.len(), 450);
}

#[tokio::test]
async fn query_all_surfaces_server_failure() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/record/do/query"))
        .respond_with(ResponseTemplate::new(503).set_body_string("{}"))
        .mount(&server)
        .await;

    let source = Arc::new(QueryPages::new(
        client(&server),
        "record/do/query",
        "record",
    ));
    let runner = QueryRunner::new(QueryConfig::new(4, 200));

    let err = runner
        .run(source as Arc<dyn PageSource>, vec!["id".to_string()], |_| {})
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        recordkit::Error::HttpStatus { status: 503, .. }
    ));
}
