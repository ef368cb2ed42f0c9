use rstest::*;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ticktick_client::task::TickTickTask;

use crate::helpers::{api_path, load_json_fixture_file, TEST_ACCESS_TOKEN};

#[fixture]
pub fn ticktick_parent_task_response() -> TickTickTask {
    load_json_fixture_file("ticktick_parent_task_response.json")
}

/// Task as TickTick answers to a creation request
pub fn created_ticktick_task(
    task_id: &str,
    title: &str,
    project_id: &str,
    parent_id: Option<&str>,
    sort_order: i64,
) -> TickTickTask {
    serde_json::from_value(json!({
        "id": task_id,
        "projectId": project_id,
        "title": title,
        "parentId": parent_id,
        "priority": 0,
        "status": 0,
        "sortOrder": sort_order,
        "items": []
    }))
    .unwrap()
}

pub async fn mock_ticktick_get_task_service(
    ticktick_mock_server: &MockServer,
    project_id: &str,
    task_id: &str,
    response: ResponseTemplate,
) {
    Mock::given(method("GET"))
        .and(path(api_path(&format!(
            "/project/{project_id}/task/{task_id}"
        ))))
        .and(header(
            "authorization",
            format!("Bearer {TEST_ACCESS_TOKEN}").as_str(),
        ))
        .respond_with(response)
        .expect(1)
        .mount(ticktick_mock_server)
        .await;
}

pub async fn mock_ticktick_create_task_service(
    ticktick_mock_server: &MockServer,
    expected_body: Value,
    response: ResponseTemplate,
) {
    Mock::given(method("POST"))
        .and(path(api_path("/task")))
        .and(body_partial_json(expected_body))
        .and(header(
            "authorization",
            format!("Bearer {TEST_ACCESS_TOKEN}").as_str(),
        ))
        .respond_with(response)
        .expect(1)
        .mount(ticktick_mock_server)
        .await;
}

pub async fn mock_ticktick_update_task_service(
    ticktick_mock_server: &MockServer,
    task_id: &str,
    expected_body: Value,
    result: &TickTickTask,
) {
    Mock::given(method("POST"))
        .and(path(api_path(&format!("/task/{task_id}"))))
        .and(body_partial_json(expected_body))
        .and(header(
            "authorization",
            format!("Bearer {TEST_ACCESS_TOKEN}").as_str(),
        ))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/json")
                .set_body_json(result),
        )
        .expect(1)
        .mount(ticktick_mock_server)
        .await;
}

pub async fn mock_ticktick_complete_task_service(
    ticktick_mock_server: &MockServer,
    project_id: &str,
    task_id: &str,
) {
    Mock::given(method("POST"))
        .and(path(api_path(&format!(
            "/project/{project_id}/task/{task_id}/complete"
        ))))
        .and(header(
            "authorization",
            format!("Bearer {TEST_ACCESS_TOKEN}").as_str(),
        ))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(ticktick_mock_server)
        .await;
}

pub async fn mock_ticktick_delete_task_service(
    ticktick_mock_server: &MockServer,
    project_id: &str,
    task_id: &str,
) {
    Mock::given(method("DELETE"))
        .and(path(api_path(&format!(
            "/project/{project_id}/task/{task_id}"
        ))))
        .and(header(
            "authorization",
            format!("Bearer {TEST_ACCESS_TOKEN}").as_str(),
        ))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(ticktick_mock_server)
        .await;
}
