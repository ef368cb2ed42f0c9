use std::{fmt, str::FromStr};

use http::HeaderMap;
use reqwest_middleware::reqwest::{Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use tracing::{error, info, warn};

use crate::{
    configuration::Settings,
    credentials::CredentialManager,
    error::{ApiError, ApiResult, TickTickError},
    project::{CreateProjectRequest, TickTickProject, TickTickProjectData, UpdateProjectRequest},
    sort_order::{batch_sort_orders, next_sort_order, SortOrderPolicy},
    task::{
        CreateSubtaskRequest, CreateTaskRequest, SubtaskDraft, TickTickTask, UpdateTaskRequest,
    },
    utils::api::ApiClient,
};

/// HTTP methods the TickTick open API is called with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Post,
    Delete,
}

impl RequestMethod {
    fn as_method(self) -> Method {
        match self {
            RequestMethod::Get => Method::GET,
            RequestMethod::Post => Method::POST,
            RequestMethod::Delete => Method::DELETE,
        }
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_method())
    }
}

impl FromStr for RequestMethod {
    type Err = TickTickError;

    fn from_str(method: &str) -> Result<Self, Self::Err> {
        match method {
            "GET" => Ok(RequestMethod::Get),
            "POST" => Ok(RequestMethod::Post),
            "DELETE" => Ok(RequestMethod::Delete),
            _ => Err(TickTickError::UnsupportedMethod(method.to_string())),
        }
    }
}

impl TryFrom<Method> for RequestMethod {
    type Error = TickTickError;

    fn try_from(method: Method) -> Result<Self, Self::Error> {
        method.as_str().parse()
    }
}

/// Client of the TickTick open API.
///
/// Every call borrows the client mutably: an expired access token is
/// refreshed in place and the request is sent again, once.
#[derive(Debug)]
pub struct TickTickClient {
    base_url: String,
    api_client: ApiClient,
    credentials: CredentialManager,
    root_task_sort_order: SortOrderPolicy,
    subtask_sort_order: SortOrderPolicy,
    batch_sort_order_spacing: i64,
}

impl TickTickClient {
    pub fn new(settings: &Settings) -> Result<Self, TickTickError> {
        Ok(TickTickClient {
            base_url: settings.api_base_url(),
            api_client: ApiClient::build(HeaderMap::new())?,
            credentials: CredentialManager::new(settings)?,
            root_task_sort_order: settings.root_task_sort_order,
            subtask_sort_order: settings.subtask_sort_order,
            batch_sort_order_spacing: settings.batch_sort_order_spacing,
        })
    }

    /// Client configured from the credential file and `TICKTICK_*` variables
    pub fn from_env() -> Result<Self, TickTickError> {
        TickTickClient::new(&Settings::new()?)
    }

    pub fn credentials(&self) -> &CredentialManager {
        &self.credentials
    }

    /// Call `endpoint` (relative to the base URL) and return its JSON body.
    ///
    /// A 401 answer triggers one token refresh and, when it succeeds, one
    /// resend of the same request. 204 and empty bodies yield `{}`.
    #[tracing::instrument(level = "debug", skip(self, request_body), err)]
    pub async fn dispatch<T: Serialize + ?Sized>(
        &mut self,
        method: RequestMethod,
        endpoint: &str,
        request_body: Option<&T>,
    ) -> ApiResult<Value> {
        let url = format!("{}{endpoint}", self.base_url);
        let result = self.send_with_refresh(method, &url, request_body).await;
        if let Err(err) = &result {
            error!("API request failed: {err}");
        }
        result
    }

    async fn send_with_refresh<T: Serialize + ?Sized>(
        &mut self,
        method: RequestMethod,
        url: &str,
        request_body: Option<&T>,
    ) -> ApiResult<Value> {
        let mut response = self
            .api_client
            .send(
                method.as_method(),
                url,
                self.credentials.authorization_header(),
                request_body,
            )
            .await?;

        if response.status == StatusCode::UNAUTHORIZED {
            info!("Access token expired. Attempting to refresh...");
            if self.credentials.refresh(&self.api_client).await {
                response = self
                    .api_client
                    .send(
                        method.as_method(),
                        url,
                        self.credentials.authorization_header(),
                        request_body,
                    )
                    .await?;
            }
        }

        if response.status.is_client_error() || response.status.is_server_error() {
            return Err(ApiError::from_status(response.status, url, response.body));
        }

        if response.status == StatusCode::NO_CONTENT || response.body.is_empty() {
            return Ok(Value::Object(Map::new()));
        }

        serde_json::from_str(&response.body)
            .map_err(|err| ApiError::from_json_serde_error(err, response.body.clone()))
    }

    /// Same as [`TickTickClient::dispatch`], decoding the body as `R`.
    ///
    /// A successful answer without body is `{}` here, so typed results such as
    /// [`TickTickClient::update_task`] report it as a decode error with no
    /// status. Use [`TickTickClient::dispatch`] when the endpoint may answer empty.
    pub async fn dispatch_as<R: DeserializeOwned, T: Serialize + ?Sized>(
        &mut self,
        method: RequestMethod,
        endpoint: &str,
        request_body: Option<&T>,
    ) -> ApiResult<R> {
        let value = self.dispatch(method, endpoint, request_body).await?;
        serde_json::from_value(value.clone())
            .map_err(|err| ApiError::from_json_serde_error(err, value.to_string()))
    }

    #[tracing::instrument(level = "debug", skip_all, err)]
    pub async fn get_projects(&mut self) -> ApiResult<Vec<TickTickProject>> {
        self.dispatch_as(RequestMethod::Get, "/project", None::<&()>)
            .await
    }

    #[tracing::instrument(level = "debug", skip_all, fields(project_id = project_id), err)]
    pub async fn get_project(&mut self, project_id: &str) -> ApiResult<TickTickProject> {
        self.dispatch_as(
            RequestMethod::Get,
            &format!("/project/{project_id}"),
            None::<&()>,
        )
        .await
    }

    /// Project with its tasks and columns
    #[tracing::instrument(level = "debug", skip_all, fields(project_id = project_id), err)]
    pub async fn get_project_with_data(
        &mut self,
        project_id: &str,
    ) -> ApiResult<TickTickProjectData> {
        self.dispatch_as(
            RequestMethod::Get,
            &format!("/project/{project_id}/data"),
            None::<&()>,
        )
        .await
    }

    #[tracing::instrument(level = "debug", skip_all, fields(name = request.name), err)]
    pub async fn create_project(
        &mut self,
        request: &CreateProjectRequest,
    ) -> ApiResult<TickTickProject> {
        self.dispatch_as(RequestMethod::Post, "/project", Some(request))
            .await
    }

    #[tracing::instrument(level = "debug", skip_all, fields(project_id = project_id), err)]
    pub async fn update_project(
        &mut self,
        project_id: &str,
        request: &UpdateProjectRequest,
    ) -> ApiResult<TickTickProject> {
        self.dispatch_as(
            RequestMethod::Post,
            &format!("/project/{project_id}"),
            Some(request),
        )
        .await
    }

    #[tracing::instrument(level = "debug", skip_all, fields(project_id = project_id), err)]
    pub async fn delete_project(&mut self, project_id: &str) -> ApiResult<()> {
        self.dispatch(
            RequestMethod::Delete,
            &format!("/project/{project_id}"),
            None::<&()>,
        )
        .await?;
        Ok(())
    }

    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(project_id = project_id, task_id = task_id),
        err
    )]
    pub async fn get_task(&mut self, project_id: &str, task_id: &str) -> ApiResult<TickTickTask> {
        self.dispatch_as(
            RequestMethod::Get,
            &format!("/project/{project_id}/task/{task_id}"),
            None::<&()>,
        )
        .await
    }

    #[tracing::instrument(level = "debug", skip_all, fields(project_id = request.project_id), err)]
    pub async fn create_task(&mut self, request: &CreateTaskRequest) -> ApiResult<TickTickTask> {
        self.dispatch_as(RequestMethod::Post, "/task", Some(request))
            .await
    }

    /// Create a top level task placed after the existing ones, unless the
    /// request already carries a sort order
    pub async fn create_task_at_end(
        &mut self,
        mut request: CreateTaskRequest,
    ) -> ApiResult<TickTickTask> {
        if request.sort_order.is_none() {
            request.sort_order = Some(self.next_root_task_sort_order(&request.project_id).await);
        }
        self.create_task(&request).await
    }

    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(project_id = request.project_id, task_id = task_id),
        err
    )]
    pub async fn update_task(
        &mut self,
        task_id: &str,
        request: &UpdateTaskRequest,
    ) -> ApiResult<TickTickTask> {
        self.dispatch_as(
            RequestMethod::Post,
            &format!("/task/{task_id}"),
            Some(request),
        )
        .await
    }

    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(project_id = project_id, task_id = task_id),
        err
    )]
    pub async fn complete_task(&mut self, project_id: &str, task_id: &str) -> ApiResult<()> {
        self.dispatch(
            RequestMethod::Post,
            &format!("/project/{project_id}/task/{task_id}/complete"),
            None::<&()>,
        )
        .await?;
        Ok(())
    }

    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(project_id = project_id, task_id = task_id),
        err
    )]
    pub async fn delete_task(&mut self, project_id: &str, task_id: &str) -> ApiResult<()> {
        self.dispatch(
            RequestMethod::Delete,
            &format!("/project/{project_id}/task/{task_id}"),
            None::<&()>,
        )
        .await?;
        Ok(())
    }

    /// Sort order placing a new top level task after the project root tasks.
    ///
    /// Falls back to the base sort order when the project cannot be fetched.
    pub async fn next_root_task_sort_order(&mut self, project_id: &str) -> i64 {
        match self.get_project_with_data(project_id).await {
            Ok(project_data) => {
                let root_tasks: Vec<&TickTickTask> = project_data.root_tasks().collect();
                info!(
                    "Found {} root tasks in project {project_id}",
                    root_tasks.len()
                );
                next_sort_order(root_tasks, self.root_task_sort_order)
            }
            Err(err) => {
                warn!(
                    "Cannot fetch project {project_id} to compute the next sort order, using {}: {err}",
                    self.root_task_sort_order.base
                );
                self.root_task_sort_order.base
            }
        }
    }

    /// Sort order placing a new subtask after the items of `parent_task_id`
    pub async fn next_subtask_sort_order(
        &mut self,
        project_id: &str,
        parent_task_id: &str,
    ) -> ApiResult<i64> {
        let parent_task = self.get_task(project_id, parent_task_id).await?;
        info!(
            "Found {} existing subtasks for parent task {parent_task_id}",
            parent_task.items.len()
        );
        Ok(next_sort_order(&parent_task.items, self.subtask_sort_order))
    }

    /// Create a subtask after the existing items of its parent task.
    ///
    /// Any sort order already set on `request` is replaced.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(project_id = request.project_id, parent_id = request.parent_id),
        err
    )]
    pub async fn create_subtask(
        &mut self,
        mut request: CreateSubtaskRequest,
    ) -> ApiResult<TickTickTask> {
        let sort_order = self
            .next_subtask_sort_order(&request.project_id, &request.parent_id)
            .await?;
        request.sort_order = Some(sort_order);
        self.dispatch_as(RequestMethod::Post, "/task", Some(&request))
            .await
    }

    /// Create a subtask with a sort order computed by the caller
    pub async fn create_subtask_with_order(
        &mut self,
        mut request: CreateSubtaskRequest,
        sort_order: Option<i64>,
    ) -> ApiResult<TickTickTask> {
        request.sort_order = sort_order;
        self.dispatch_as(RequestMethod::Post, "/task", Some(&request))
            .await
    }

    /// Create `subtasks` under `parent_task_id`, in order, after its existing items.
    ///
    /// The parent task is fetched once. When that fetch fails, every entry of
    /// the result is the same error and nothing is created.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(
            project_id = project_id,
            parent_id = parent_task_id,
            subtasks_count = subtasks.len()
        )
    )]
    pub async fn create_subtasks_batch(
        &mut self,
        parent_task_id: &str,
        project_id: &str,
        subtasks: Vec<SubtaskDraft>,
    ) -> Vec<ApiResult<TickTickTask>> {
        if subtasks.is_empty() {
            return vec![];
        }

        let base_sort_order = match self
            .next_subtask_sort_order(project_id, parent_task_id)
            .await
        {
            Ok(base_sort_order) => base_sort_order,
            Err(err) => return vec![Err(err); subtasks.len()],
        };
        info!(
            "Starting new batch of {} subtasks at sort order {base_sort_order}",
            subtasks.len()
        );

        let sort_orders =
            batch_sort_orders(base_sort_order, self.batch_sort_order_spacing, subtasks.len());
        let mut results = Vec::with_capacity(subtasks.len());
        for (draft, sort_order) in subtasks.into_iter().zip(sort_orders) {
            let request = CreateSubtaskRequest::from_draft(draft, parent_task_id, project_id);
            results.push(
                self.create_subtask_with_order(request, Some(sort_order))
                    .await,
            );
        }
        results
    }
}
