//! Resource API Tests
//!
//! End-to-end behaviour of the five operations through the HTTP router:
//! status codes, payload shapes, nested blog comments, cascades and tweet
//! ownership.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{get, item_field, post, router, send, token_for};

fn employee(id: &str, name: &str, designation: &str) -> Value {
    json!({"emp_id": id, "emp_name": name, "emp_designation": designation})
}

// =============================================================================
// CRUD Lifecycle
// =============================================================================

#[tokio::test]
async fn test_employee_lifecycle() {
    let app = router();

    let (status, created) = post(&app, "/employees/", employee("E1", "Asha", "Engineer")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created, employee("E1", "Asha", "Engineer"));

    let (status, fetched) = get(&app, "/employees/E1/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, replaced) = send(
        &app,
        Method::PUT,
        "/employees/E1/",
        Some(json!({"emp_name": "Asha R", "emp_designation": "Lead"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced, employee("E1", "Asha R", "Lead"));

    let (status, patched) = send(
        &app,
        Method::PATCH,
        "/employees/E1/",
        Some(json!({"emp_designation": "Manager"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched, employee("E1", "Asha R", "Manager"));

    let (status, body) = send(&app, Method::DELETE, "/employees/E1/", None, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = get(&app, "/employees/E1/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Retrieve after create returns the created representation.
#[tokio::test]
async fn test_create_then_retrieve_round_trip() {
    let app = router();
    let (_, created) = post(
        &app,
        "/students/",
        json!({"name": "Meera", "email": "meera@example.com", "phone": "+91 98200 00000"}),
    )
    .await;

    assert_eq!(created["id"], 1);
    let (_, fetched) = get(&app, "/students/1/").await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_paths_without_trailing_slash() {
    let app = router();
    let (status, _) = post(&app, "/blogs", json!({"blog_title": "No slash"})).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, blog) = get(&app, "/blogs/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(blog["blog_title"], "No slash");

    let (status, page) = get(&app, "/blogs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total_count"], 1);
}

// =============================================================================
// Error Mapping
// =============================================================================

#[tokio::test]
async fn test_validation_errors_name_every_field() {
    let app = router();
    let (status, body) = post(&app, "/employees/", json!({"emp_id": "", "emp_name": "x".repeat(31)})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"]["emp_id"], json!(["This field may not be blank."]));
    assert_eq!(
        body["errors"]["emp_name"],
        json!(["Ensure this field has no more than 30 characters."])
    );
    assert_eq!(body["errors"]["emp_designation"], json!(["This field is required."]));

    let (_, page) = get(&app, "/employees/").await;
    assert_eq!(page["total_count"], 0);
}

#[tokio::test]
async fn test_duplicate_key_conflicts() {
    let app = router();
    post(&app, "/employees/", employee("E7", "A", "B")).await;

    let (status, body) = post(&app, "/employees/", employee("E7", "C", "D")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 409);

    let (_, fetched) = get(&app, "/employees/E7/").await;
    assert_eq!(fetched["emp_name"], "A");
}

#[tokio::test]
async fn test_employee_key_is_immutable() {
    let app = router();
    post(&app, "/employees/", employee("E1", "A", "B")).await;

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/employees/E1/",
        Some(json!({"emp_id": "E2"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"]["emp_id"], json!(["Primary key cannot be changed."]));
}

#[tokio::test]
async fn test_put_requires_every_required_field() {
    let app = router();
    post(&app, "/blogs/", json!({"blog_title": "Keep me"})).await;

    let (status, body) = send(&app, Method::PUT, "/blogs/1/", Some(json!({})), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"]["blog_title"], json!(["This field is required."]));

    let (status, _) = send(&app, Method::PATCH, "/blogs/1/", Some(json!({})), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = router();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/blogs/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"blog_title\": "))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_object_payload() {
    let app = router();
    let (status, body) = post(&app, "/blogs/", json!(["not", "an", "object"])).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errors"]["non_field_errors"],
        json!(["Invalid data. Expected a dictionary, but got list."])
    );
}

#[tokio::test]
async fn test_missing_and_unparseable_ids_are_not_found() {
    let app = router();
    for uri in ["/blogs/99/", "/blogs/abc/", "/tweets/-1/", "/employees/nobody/"] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(body["code"], 404);
    }

    let (status, _) = send(&app, Method::DELETE, "/comments/5/", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// A path segment that is not valid UTF-8 names no record
#[tokio::test]
async fn test_undecodable_id_is_not_found() {
    let app = router();
    post(&app, "/employees/", employee("E1", "A", "B")).await;

    let (status, body) = get(&app, "/employees/%FF/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/employees/%FF",
        Some(json!({"emp_name": "Z"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);

    let (status, _) = send(&app, Method::DELETE, "/blogs/%C3%28/", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Nested Serialization
// =============================================================================

#[tokio::test]
async fn test_blog_embeds_comments_read_only() {
    let app = router();
    post(
        &app,
        "/blogs/",
        json!({"blog_title": "Tea notes", "comments": [{"text": "ignored"}]}),
    )
    .await;
    post(&app, "/comments/", json!({"blog": 1, "text": "first"})).await;
    post(&app, "/comments/", json!({"blog": 1, "text": "second"})).await;

    let (_, blog) = get(&app, "/blogs/1/").await;
    assert_eq!(
        blog,
        json!({
            "id": 1,
            "blog_title": "Tea notes",
            "comments": [
                {"id": 1, "blog": 1, "text": "first"},
                {"id": 2, "blog": 1, "text": "second"},
            ],
        })
    );
}

#[tokio::test]
async fn test_comment_on_missing_blog_rejected() {
    let app = router();
    let (status, body) = post(&app, "/comments/", json!({"blog": 42, "text": "orphan"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errors"]["blog"],
        json!(["Invalid pk \"42\" - object does not exist."])
    );
}

#[tokio::test]
async fn test_blog_delete_cascades_to_comments() {
    let app = router();
    post(&app, "/blogs/", json!({"blog_title": "Doomed"})).await;
    post(&app, "/blogs/", json!({"blog_title": "Survivor"})).await;
    post(&app, "/comments/", json!({"blog": 1, "text": "a"})).await;
    post(&app, "/comments/", json!({"blog": 2, "text": "b"})).await;

    let (status, _) = send(&app, Method::DELETE, "/blogs/1/", None, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, comments) = get(&app, "/comments/").await;
    assert_eq!(comments["total_count"], 1);
    assert_eq!(item_field(&comments, "text"), vec![json!("b")]);
}

// =============================================================================
// Chai Varieties
// =============================================================================

#[tokio::test]
async fn test_chai_type_label_and_default_date() {
    let app = router();
    let (status, chai) = post(
        &app,
        "/chai/",
        json!({"name": "Sencha", "image": "chai/sencha.png", "chai_type": "Green Tea"}),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(chai["chai_type"], "GR");
    assert!(chai["date_added"].as_str().is_some_and(|d| d.ends_with('Z')));

    let (status, body) = post(
        &app,
        "/chai/",
        json!({"name": "Mystery", "image": "x.png", "chai_type": "Purple"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"]["chai_type"], json!(["\"Purple\" is not a valid choice."]));
}

// =============================================================================
// Tweet Ownership
// =============================================================================

#[tokio::test]
async fn test_tweet_create_needs_identity() {
    let app = router();

    let (status, _) = send(&app, Method::POST, "/tweets/", Some(json!({"text": "hi"})), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        Method::POST,
        "/tweets/",
        Some(json!({"text": "hi"})),
        Some("not-a-token"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let alice = token_for("alice");
    let (status, tweet) = send(
        &app,
        Method::POST,
        "/tweets/",
        Some(json!({"text": "hi", "user": "mallory"})),
        Some(&alice),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(tweet["user"], "alice");
    assert_eq!(tweet["photo"], Value::Null);
}

#[tokio::test]
async fn test_only_owner_edits_or_deletes_tweet() {
    let app = router();
    let alice = token_for("alice");
    let bob = token_for("bob");
    send(&app, Method::POST, "/tweets/", Some(json!({"text": "mine"})), Some(&alice)).await;

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/tweets/1/",
        Some(json!({"text": "hijacked"})),
        Some(&bob),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, "/tweets/1/", None, Some(&bob)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, tweet) = get(&app, "/tweets/1/").await;
    assert_eq!(tweet["text"], "mine");

    let (status, _) = send(&app, Method::DELETE, "/tweets/1/", None, Some(&alice)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_tweets_list_newest_first() {
    let app = router();
    let alice = token_for("alice");
    for text in ["one", "two", "three"] {
        send(&app, Method::POST, "/tweets/", Some(json!({"text": text})), Some(&alice)).await;
    }

    let (_, page) = get(&app, "/tweets/").await;
    assert_eq!(
        item_field(&page, "text"),
        vec![json!("three"), json!("two"), json!("one")]
    );
}

// =============================================================================
// Health and Metrics
// =============================================================================

#[tokio::test]
async fn test_health_and_metrics() {
    let app = router();
    let (status, health) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "ok");

    post(&app, "/blogs/", json!({"blog_title": "counted"})).await;
    post(&app, "/blogs/", json!({})).await;

    let (_, metrics) = get(&app, "/metrics").await;
    assert_eq!(metrics["records_created"], 1);
    assert_eq!(metrics["validation_rejections"], 1);
    assert!(metrics["requests_total"].as_u64().is_some_and(|n| n >= 3));
}
