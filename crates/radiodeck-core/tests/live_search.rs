mod common;

use common::{client_for, mount_status, stations_json};
use radiodeck_core::api::SEARCH_PATH;
use radiodeck_core::nav::Category;
use radiodeck_core::page::Page;
use radiodeck_core::search::{SearchOutcome, STATUS_FAILED, STATUS_NOT_FOUND, STATUS_SEARCHING};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn search_sends_lowercased_name_and_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("name", "jazz"))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stations_json("jazz", 20)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut page = Page::new(Category::All);

    let ticket = page.on_search_input("  Jazz ").expect("request issued");
    assert_eq!(ticket.query, "jazz");
    assert_eq!(page.search.status(), STATUS_SEARCHING);
    assert!(page.visible_feeds().is_empty());

    let result = client.search(&ticket.query).await;
    assert_eq!(page.on_search_response(ticket.seq, result), SearchOutcome::Shown(20));
    assert_eq!(page.search.status(), "");

    let names: Vec<String> = page
        .search
        .results()
        .cards()
        .iter()
        .map(|c| c.name().to_string())
        .collect();
    let expected: Vec<String> = (0..20).map(|i| format!("jazz-{}", i)).collect();
    assert_eq!(names, expected);
}

#[tokio::test]
async fn query_with_spaces_is_escaped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("name", "radio paradise & co"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stations_json("rp", 1)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let stations = client.search("radio paradise & co").await.unwrap();
    assert_eq!(stations.len(), 1);
}

#[tokio::test]
async fn empty_result_shows_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut page = Page::default();
    let ticket = page.on_search_input("qqqqzzzz").unwrap();
    let result = client.search(&ticket.query).await;

    assert_eq!(page.on_search_response(ticket.seq, result), SearchOutcome::NotFound);
    assert_eq!(page.search.status(), STATUS_NOT_FOUND);
    assert!(page.search.results().is_empty());
}

#[tokio::test]
async fn server_error_shows_failure_message() {
    let server = MockServer::start().await;
    mount_status(&server, SEARCH_PATH, 503).await;

    let client = client_for(&server);
    let mut page = Page::default();
    let ticket = page.on_search_input("rock").unwrap();
    let result = client.search(&ticket.query).await;

    assert_eq!(page.on_search_response(ticket.seq, result), SearchOutcome::Failed);
    assert_eq!(page.search.status(), STATUS_FAILED);
}

#[tokio::test]
async fn emptying_the_field_restores_every_feed_without_a_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(stations_json("x", 1)))
        .expect(0)
        .mount(&server)
        .await;

    let mut page = Page::new(Category::from_key("podcast").unwrap());
    page.on_search_input("a");
    assert!(page.on_search_input("").is_none());
    assert_eq!(page.visible_feeds().len(), 5);
    assert!(!page.search.results_visible());
    // the mock's expect(0) is verified when the server drops
}

#[tokio::test]
async fn late_response_for_old_query_is_ignored() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("name", "j"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stations_json("j", 5)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("name", "ja"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stations_json("ja", 2)))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut page = Page::default();
    let first = page.on_search_input("j").unwrap();
    let second = page.on_search_input("ja").unwrap();

    let second_result = client.search(&second.query).await;
    let first_result = client.search(&first.query).await;

    assert_eq!(page.on_search_response(second.seq, second_result), SearchOutcome::Shown(2));
    assert_eq!(page.on_search_response(first.seq, first_result), SearchOutcome::Stale);
    assert_eq!(page.search.results().len(), 2);
    assert_eq!(page.search.results().cards()[0].name(), "ja-0");
}
