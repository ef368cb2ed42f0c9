use pretty_assertions::assert_eq;
use rstest::*;
use serde_json::json;
use wiremock::ResponseTemplate;

use ticktick_client::{
    project::{CreateProjectRequest, TickTickProject, TickTickProjectData},
    RequestMethod,
};

use crate::helpers::{
    project::{
        mock_ticktick_create_project_service, mock_ticktick_delete_project_service,
        mock_ticktick_get_project_data_service, mock_ticktick_list_projects_service,
        ticktick_project_data_response, ticktick_projects_response,
    },
    tested_client, TestedClient,
};

#[rstest]
#[tokio::test]
async fn test_get_projects(
    #[future] tested_client: TestedClient,
    ticktick_projects_response: Vec<TickTickProject>,
) {
    let mut tested_client = tested_client.await;
    mock_ticktick_list_projects_service(
        &tested_client.ticktick_mock_server,
        &ticktick_projects_response,
    )
    .await;

    let projects = tested_client.client.get_projects().await.unwrap();

    assert_eq!(projects, ticktick_projects_response);
    assert_eq!(projects[0].name, "Inbox");
}

#[rstest]
#[tokio::test]
async fn test_get_project_with_data(
    #[future] tested_client: TestedClient,
    ticktick_project_data_response: TickTickProjectData,
) {
    let mut tested_client = tested_client.await;
    mock_ticktick_get_project_data_service(
        &tested_client.ticktick_mock_server,
        "tt_proj_1111",
        ResponseTemplate::new(200)
            .insert_header("content-type", "application/json")
            .set_body_json(&ticktick_project_data_response),
    )
    .await;

    let project_data = tested_client
        .client
        .get_project_with_data("tt_proj_1111")
        .await
        .unwrap();

    assert_eq!(project_data, ticktick_project_data_response);
    assert_eq!(project_data.tasks.len(), 4);
    assert_eq!(project_data.root_tasks().count(), 3);
}

#[rstest]
#[tokio::test]
async fn test_create_project_with_default_attributes(
    #[future] tested_client: TestedClient,
    ticktick_projects_response: Vec<TickTickProject>,
) {
    let mut tested_client = tested_client.await;
    mock_ticktick_create_project_service(
        &tested_client.ticktick_mock_server,
        json!({
            "name": "Work",
            "color": "#F18181",
            "viewMode": "list",
            "kind": "TASK"
        }),
        &ticktick_projects_response[1],
    )
    .await;

    let project = tested_client
        .client
        .create_project(&CreateProjectRequest::new("Work"))
        .await
        .unwrap();

    assert_eq!(project.id, "tt_proj_1111");
}

#[rstest]
#[case::no_content(ResponseTemplate::new(204))]
#[case::empty_body(ResponseTemplate::new(200))]
#[tokio::test]
async fn test_delete_project_without_response_body(
    #[future] tested_client: TestedClient,
    #[case] response: ResponseTemplate,
) {
    let mut tested_client = tested_client.await;
    mock_ticktick_delete_project_service(
        &tested_client.ticktick_mock_server,
        "tt_proj_1111",
        response,
    )
    .await;

    let result = tested_client
        .client
        .dispatch(
            RequestMethod::Delete,
            "/project/tt_proj_1111",
            None::<&()>,
        )
        .await;

    assert_eq!(result, Ok(json!({})));
}

#[rstest]
#[tokio::test]
async fn test_delete_project(#[future] tested_client: TestedClient) {
    let mut tested_client = tested_client.await;
    mock_ticktick_delete_project_service(
        &tested_client.ticktick_mock_server,
        "tt_proj_1111",
        ResponseTemplate::new(200),
    )
    .await;

    assert_eq!(
        tested_client.client.delete_project("tt_proj_1111").await,
        Ok(())
    );
}

#[rstest]
#[tokio::test]
async fn test_get_unknown_project_is_an_error_value(#[future] tested_client: TestedClient) {
    let mut tested_client = tested_client.await;
    mock_ticktick_get_project_data_service(
        &tested_client.ticktick_mock_server,
        "unknown",
        ResponseTemplate::new(404).set_body_string("project not found"),
    )
    .await;

    let error = tested_client
        .client
        .get_project_with_data("unknown")
        .await
        .unwrap_err();

    assert_eq!(error.status, Some(404));
    assert_eq!(error.body, Some("project not found".to_string()));
    assert!(error.message.starts_with("404 Client Error"));
}

#[rstest]
#[tokio::test]
async fn test_invalid_json_response_is_an_error_value(#[future] tested_client: TestedClient) {
    let mut tested_client = tested_client.await;
    mock_ticktick_get_project_data_service(
        &tested_client.ticktick_mock_server,
        "tt_proj_1111",
        ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"),
    )
    .await;

    let error = tested_client
        .client
        .get_project_with_data("tt_proj_1111")
        .await
        .unwrap_err();

    assert_eq!(error.status, None);
    assert_eq!(error.body, Some("<html>maintenance</html>".to_string()));
}
