use admin_console_sdk::codec::{PaginationRequest, SortDirection, SortEntry};
use admin_console_sdk::error::{ApiError, ErrorKind};
use admin_console_sdk::resources::{AdminApis, CourseLevel, CourseRequest, UserFilter};
use admin_console_sdk::{ClientConfig, ReqwestClient};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn apis(server: &MockServer) -> AdminApis {
    let uri = server.uri();
    let config = ClientConfig::from_lookup(|key| match key {
        "ADMIN_API_BASE_URL" => Some(uri.clone()),
        "ADMIN_API_TOKEN" => Some("secret".into()),
        _ => None,
    })
    .unwrap();
    AdminApis::new(Arc::new(ReqwestClient::from_config(&config))).unwrap()
}

fn user(id: i64, username: &str) -> serde_json::Value {
    json!({"id": id, "username": username, "email": format!("{}@example.org", username)})
}

#[tokio::test]
async fn search_sends_query_and_reads_legacy_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users"))
        .and(query_param("keyword", "tran"))
        .and(query_param("page", "1"))
        .and(query_param("size", "5"))
        .and(query_param("sort", "fullName,desc"))
        .and(query_param("sort", "id,asc"))
        .and(query_param("active", "true"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [user(2, "tran")],
            "page": 1,
            "size": 5,
            "totalElements": 6,
            "totalPages": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let p = PaginationRequest::new(1, 5).with_sort(vec![
        SortEntry::new("fullName", SortDirection::Desc),
        SortEntry::new("id", SortDirection::Asc),
    ]);
    let filter = UserFilter {
        active: Some(true),
        ..UserFilter::default()
    };
    let page = apis(&server).users.search("tran", Some(&p), Some(&filter)).await.unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].username, "tran");
    assert_eq!(page.page, 1);
    assert_eq!(page.total_elements, 6);
}

#[tokio::test]
async fn non_success_status_becomes_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/99"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "user 99 not found"})),
        )
        .mount(&server)
        .await;

    let err = apis(&server).users.get_by_id(99).await.unwrap_err();
    match &err {
        ApiError::Http { status, body } => {
            assert_eq!(*status, 404);
            assert!(body.contains("user 99 not found"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.message(), "user 99 not found");
}

#[tokio::test]
async fn create_posts_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/courses"))
        .and(body_json(json!({
            "code": "RS-201",
            "title": "Async Rust",
            "level": "INTERMEDIATE",
            "published": false
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 7,
            "code": "RS-201",
            "title": "Async Rust",
            "level": "INTERMEDIATE",
            "published": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let course = apis(&server)
        .courses
        .create(&CourseRequest {
            code: "RS-201".into(),
            title: "Async Rust".into(),
            level: CourseLevel::Intermediate,
            department_id: None,
            published: false,
            duration_hours: None,
        })
        .await
        .unwrap();
    assert_eq!(course.id, 7);
    assert_eq!(course.level, CourseLevel::Intermediate);
}

#[tokio::test]
async fn delete_accepts_empty_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/roles/3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    apis(&server).roles.delete(3).await.unwrap();
}

#[tokio::test]
async fn undecodable_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "one"})))
        .mount(&server)
        .await;

    let err = apis(&server).users.get_by_id(1).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = ReqwestClient::new(&format!("{}/api/v1", uri));
    let apis = AdminApis::new(Arc::new(client)).unwrap();
    let err = apis.users.search("", None, None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}
