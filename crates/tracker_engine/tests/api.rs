use std::collections::BTreeSet;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use tracker_core::{ListQuery, RowId, StatusValue};
use tracker_engine::{ApiSettings, FailureKind, JobsApi, ReqwestJobsApi};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings_for(server: &MockServer) -> ApiSettings {
    ApiSettings {
        base_url: server.uri(),
        ..ApiSettings::default()
    }
}

fn api_for(server: &MockServer) -> ReqwestJobsApi {
    ReqwestJobsApi::new(settings_for(server)).expect("api client")
}

#[tokio::test]
async fn list_sends_non_default_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/jobs"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "25"))
        .and(query_param("search", "engineer"))
        .and(query_param("status[]", "applied"))
        .and(query_param("status[]", "offer"))
        .and(query_param("source[]", "LinkedIn"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"id": 1, "jobTitle": "Frontend Developer", "company": "TechCorp"},
                {"id": 2, "jobTitle": "Backend Engineer", "company": "DataSystems"}
            ],
            "total": 27
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = ListQuery {
        page: 2,
        page_size: 25,
        search_text: "engineer".to_string(),
        status_filter: BTreeSet::from([StatusValue::Applied, StatusValue::Offer]),
        source_filter: BTreeSet::from(["LinkedIn".to_string()]),
    };
    let page = api_for(&server).list(&query).await.expect("list ok");

    assert_eq!(page.total_count(), 27);
    let ids: Vec<_> = page.rows().iter().map(|row| row.id().to_string()).collect();
    assert_eq!(ids, vec!["1", "2"]);
}

#[tokio::test]
async fn default_query_sends_no_query_string() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [], "total": 0})))
        .mount(&server)
        .await;

    let page = api_for(&server)
        .list(&ListQuery::default())
        .await
        .expect("list ok");
    assert!(page.is_empty());

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn credentials_are_sent_as_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/jobs"))
        .and(header("x-xsrf-token", "token-123"))
        .and(header("cookie", "laravel_session=abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [], "total": 0})))
        .expect(1)
        .mount(&server)
        .await;

    let settings = ApiSettings {
        xsrf_token: Some("token-123".to_string()),
        cookie: Some("laravel_session=abc".to_string()),
        ..settings_for(&server)
    };
    let api = ReqwestJobsApi::new(settings).expect("api client");
    api.list(&ListQuery::default()).await.expect("list ok");
}

#[tokio::test]
async fn error_status_carries_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/jobs"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"message": "The limit is invalid."})),
        )
        .mount(&server)
        .await;

    let err = api_for(&server)
        .list(&ListQuery::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(422));
    assert_eq!(err.message, "The limit is invalid.");
}

#[tokio::test]
async fn unauthorized_is_classified() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/jobs/4"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Unauthenticated."})))
        .mount(&server)
        .await;

    let err = api_for(&server).delete(&RowId::from(4)).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Unauthorized(401));
    assert!(err.is_unauthorized());
    assert_eq!(err.message, "Unauthenticated.");
}

#[tokio::test]
async fn update_puts_patch_and_returns_server_row() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/jobs/7"))
        .and(body_json(json!({"status": "offer"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": 7, "status": "offer", "company": "CloudTech"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let patch = json!({"status": "offer"}).as_object().cloned().unwrap();
    let row = api_for(&server)
        .update(&RowId::from(7), &patch)
        .await
        .expect("update ok")
        .expect("server row");
    assert_eq!(row.id(), &RowId::from(7));
    assert_eq!(row.text("company").as_deref(), Some("CloudTech"));
}

#[tokio::test]
async fn delete_accepts_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/jobs/3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    api_for(&server)
        .delete(&RowId::from(3))
        .await
        .expect("delete ok");
}

#[tokio::test]
async fn times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/jobs"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({"data": [], "total": 0})),
        )
        .mount(&server)
        .await;

    let settings = ApiSettings {
        request_timeout: Duration::from_millis(50),
        ..settings_for(&server)
    };
    let api = ReqwestJobsApi::new(settings).expect("api client");
    let err = api.list(&ListQuery::default()).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn rejects_too_large_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_string("01234567890"))
        .mount(&server)
        .await;

    let settings = ApiSettings {
        max_bytes: 10,
        ..settings_for(&server)
    };
    let api = ReqwestJobsApi::new(settings).expect("api client");
    let err = api.list(&ListQuery::default()).await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(11)
        }
    );
}

#[tokio::test]
async fn row_ids_are_encoded_as_one_segment() {
    let api = ReqwestJobsApi::new(ApiSettings::default()).expect("api client");
    assert_eq!(
        api.row_url(&RowId::new("a/b")).as_str(),
        "http://localhost:8000/api/v1/jobs/a%2Fb"
    );
    assert_eq!(
        api.list_url(&ListQuery::from_query_string("status[]=offer")).as_str(),
        "http://localhost:8000/api/v1/jobs?status%5B%5D=offer"
    );
}

#[tokio::test]
async fn invalid_base_url_is_rejected() {
    let settings = ApiSettings {
        base_url: "not a url".to_string(),
        ..ApiSettings::default()
    };
    let err = ReqwestJobsApi::new(settings).unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
