//! Typed client for the production dashboard REST API.
//!
//! Every call except [`ApiClient::login`] takes the [`Session`] explicitly.
//! Failures are returned as [`ApiError`] carrying the server's message; no
//! call is retried.

use std::time::Duration;

use production_environment::order::NewOrder;
use production_environment::order::Order;
use production_environment::order::OrderId;
use production_environment::order::OrderStatus;
use production_environment::order::OrderStatusOption;
use production_environment::order::OrderUpdate;
use production_environment::task::NewTask;
use production_environment::task::Task;
use production_environment::task::TaskId;
use production_environment::task::TaskStatusOption;
use production_environment::task::TaskStatusUpdate;
use production_environment::task::TaskUpdate;
use production_environment::worker::NewWorker;
use production_environment::worker::Role;
use production_environment::worker::RoleId;
use production_environment::worker::Worker;
use production_environment::worker::WorkerId;
use production_environment::worker::WorkerUpdate;
use reqwest::Client;
use reqwest::Method;
use reqwest::RequestBuilder;
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Map;
use serde_json::Value;
use tracing::debug;
use tracing::warn;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::error::error_message;
use crate::session::Credentials;
use crate::session::LoginResponse;
use crate::session::Session;

const API_KEY_HEADER: &str = "x-api-key";

/// Responses come either wrapped as `{"data": ...}` or as the bare payload.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T>
{
    Wrapped
    {
        data: T,
    },
    Direct(T),
}

impl<T> Envelope<T>
{
    pub fn into_inner(self) -> T
    {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Direct(data) => data,
        }
    }
}

/// Acknowledgement returned by create, update and delete calls.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiMessage
{
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Serialize)]
struct RoleBody<'a>
{
    roleworker: &'a str,
}

#[derive(Serialize)]
struct OrderStatusBody<'a>
{
    statusorder: &'a OrderStatus,
}

#[derive(Debug, Clone)]
pub struct ApiClient
{
    client: Client,
    base_url: String,
    api_key: String,
}

impl ApiClient
{
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError>
    {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|source| ApiError::Transport {
                url: config.base_url.clone(),
                source,
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<Session, ApiError>
    {
        let response: LoginResponse = self
            .send_json(Method::POST, None, "/users/login", credentials, "Login failed")
            .await?;

        debug!(user = credentials.name(), "logged in");
        Ok(Session::new(response.token))
    }
}

/// Roles (job positions).
impl ApiClient
{
    pub async fn fetch_roles(&self, session: &Session) -> Result<Vec<Role>, ApiError>
    {
        self.get::<Envelope<Vec<Role>>>(session, "/roles", "Failed to fetch roles")
            .await
            .map(Envelope::into_inner)
    }

    pub async fn add_role(&self, session: &Session, roleworker: &str) -> Result<ApiMessage, ApiError>
    {
        let body = RoleBody {
            roleworker: roleworker.trim(),
        };
        self.send_json(Method::POST, Some(session), "/roles", &body, "Failed to add role").await
    }

    pub async fn edit_role(&self, session: &Session, role_id: RoleId, roleworker: &str) -> Result<ApiMessage, ApiError>
    {
        let body = RoleBody {
            roleworker: roleworker.trim(),
        };
        self.send_json(Method::PUT, Some(session), &format!("/roles/{role_id}"), &body, "Failed to update role")
            .await
    }

    pub async fn delete_role(&self, session: &Session, role_id: RoleId) -> Result<ApiMessage, ApiError>
    {
        self.delete(session, &format!("/roles/{role_id}"), "Failed to delete role").await
    }
}

/// Workers.
impl ApiClient
{
    pub async fn fetch_workers(&self, session: &Session) -> Result<Vec<Worker>, ApiError>
    {
        self.get::<Envelope<Vec<Worker>>>(session, "/workers", "Failed to fetch workers")
            .await
            .map(Envelope::into_inner)
    }

    pub async fn fetch_worker(&self, session: &Session, worker_id: WorkerId) -> Result<Worker, ApiError>
    {
        self.get::<Envelope<Worker>>(session, &format!("/workers/{worker_id}"), "Failed to fetch worker")
            .await
            .map(Envelope::into_inner)
    }

    pub async fn add_worker(&self, session: &Session, worker: &NewWorker) -> Result<ApiMessage, ApiError>
    {
        self.send_json(Method::POST, Some(session), "/workers", worker, "Failed to add worker").await
    }

    pub async fn update_worker(&self, session: &Session, worker_id: WorkerId, update: &WorkerUpdate) -> Result<ApiMessage, ApiError>
    {
        self.send_json(Method::PUT, Some(session), &format!("/workers/{worker_id}"), update, "Failed to update worker")
            .await
    }

    pub async fn delete_worker(&self, session: &Session, worker_id: WorkerId) -> Result<ApiMessage, ApiError>
    {
        self.delete(session, &format!("/workers/{worker_id}"), "Failed to delete worker").await
    }
}

/// Orders.
impl ApiClient
{
    pub async fn fetch_orders(&self, session: &Session, page: u32) -> Result<Vec<Order>, ApiError>
    {
        self.get::<Envelope<Vec<Order>>>(session, &format!("/orders?page={page}"), "Failed to fetch orders")
            .await
            .map(Envelope::into_inner)
    }

    pub async fn fetch_order(&self, session: &Session, order_id: OrderId) -> Result<Order, ApiError>
    {
        self.get::<Envelope<Order>>(session, &format!("/orders/{order_id}"), "Failed to fetch order")
            .await
            .map(Envelope::into_inner)
    }

    pub async fn add_order(&self, session: &Session, order: &NewOrder) -> Result<ApiMessage, ApiError>
    {
        self.send_json(Method::POST, Some(session), "/orders", order, "Failed to add order").await
    }

    pub async fn update_order(&self, session: &Session, order_id: OrderId, update: &OrderUpdate) -> Result<ApiMessage, ApiError>
    {
        self.send_json(Method::PUT, Some(session), &format!("/orders/{order_id}"), update, "Failed to update order")
            .await
    }

    pub async fn update_order_status(&self, session: &Session, order_id: OrderId, status: &OrderStatus) -> Result<ApiMessage, ApiError>
    {
        let body = OrderStatusBody { statusorder: status };
        self.send_json(
            Method::PUT,
            Some(session),
            &format!("/orders/{order_id}/status"),
            &body,
            "Failed to update order status",
        )
        .await
    }

    pub async fn delete_order(&self, session: &Session, order_id: OrderId) -> Result<ApiMessage, ApiError>
    {
        self.delete(session, &format!("/orders/{order_id}"), "Failed to delete order").await
    }

    pub async fn fetch_order_statuses(&self, session: &Session) -> Result<Vec<OrderStatusOption>, ApiError>
    {
        self.get::<Envelope<Vec<OrderStatusOption>>>(session, "/order-status", "Failed to fetch order statuses")
            .await
            .map(Envelope::into_inner)
    }
}

/// Tasks.
impl ApiClient
{
    pub async fn fetch_tasks_by_worker(&self, session: &Session, worker_id: WorkerId) -> Result<Vec<Task>, ApiError>
    {
        self.get::<Envelope<Vec<Task>>>(session, &format!("/tasks/worker/{worker_id}"), "Failed to fetch tasks")
            .await
            .map(Envelope::into_inner)
    }

    pub async fn fetch_tasks_by_order(&self, session: &Session, order_id: OrderId, page: u32) -> Result<Vec<Task>, ApiError>
    {
        self.get::<Envelope<Vec<Task>>>(session, &format!("/tasks/order/{order_id}?page={page}"), "Failed to fetch tasks")
            .await
            .map(Envelope::into_inner)
    }

    pub async fn add_task(&self, session: &Session, task: &NewTask) -> Result<ApiMessage, ApiError>
    {
        self.send_json(Method::POST, Some(session), "/tasks", task, "Failed to add task").await
    }

    pub async fn update_task(&self, session: &Session, task_id: TaskId, update: &TaskUpdate) -> Result<ApiMessage, ApiError>
    {
        self.send_json(Method::PUT, Some(session), &format!("/tasks/{task_id}"), update, "Failed to update task")
            .await
    }

    pub async fn update_task_status(&self, session: &Session, task_id: TaskId, update: &TaskStatusUpdate) -> Result<ApiMessage, ApiError>
    {
        self.send_json(
            Method::PUT,
            Some(session),
            &format!("/tasks/{task_id}/status"),
            update,
            "Failed to update task status",
        )
        .await
    }

    pub async fn delete_task(&self, session: &Session, task_id: TaskId) -> Result<ApiMessage, ApiError>
    {
        self.delete(session, &format!("/tasks/{task_id}"), "Failed to delete task").await
    }

    pub async fn fetch_task_statuses(&self, session: &Session) -> Result<Vec<TaskStatusOption>, ApiError>
    {
        self.get::<Envelope<Vec<TaskStatusOption>>>(session, "/task-status", "Failed to fetch task statuses")
            .await
            .map(Envelope::into_inner)
    }
}

/// Private methods.
impl ApiClient
{
    fn url(&self, path: &str) -> String
    {
        format!("{}{}", self.base_url, path)
    }

    fn builder(&self, method: Method, url: &str, session: Option<&Session>) -> RequestBuilder
    {
        let request = self.client.request(method, url).header(API_KEY_HEADER, self.api_key.as_str());
        match session {
            Some(session) => request.bearer_auth(session.token()),
            None => request,
        }
    }

    async fn get<T: DeserializeOwned>(&self, session: &Session, path: &str, fallback: &str) -> Result<T, ApiError>
    {
        let url = self.url(path);
        let request = self.builder(Method::GET, &url, Some(session));
        self.dispatch(request, &url, fallback).await
    }

    async fn delete(&self, session: &Session, path: &str, fallback: &str) -> Result<ApiMessage, ApiError>
    {
        let url = self.url(path);
        let request = self.builder(Method::DELETE, &url, Some(session));
        self.dispatch(request, &url, fallback).await
    }

    async fn send_json<B, T>(&self, method: Method, session: Option<&Session>, path: &str, body: &B, fallback: &str) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let request = self.builder(method, &url, session).json(body);
        self.dispatch(request, &url, fallback).await
    }

    async fn dispatch<T: DeserializeOwned>(&self, request: RequestBuilder, url: &str, fallback: &str) -> Result<T, ApiError>
    {
        debug!(%url, "sending request");

        let transport = |source| ApiError::Transport {
            url: url.to_string(),
            source,
        };
        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        if !status.is_success() {
            let message = error_message(&body, fallback);
            warn!(%url, %status, %message, "request failed");
            return Err(ApiError::Status { status, message });
        }

        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests
{
    use production_environment::order::Order;
    use production_environment::worker::Role;
    use reqwest::Method;

    use super::ApiClient;
    use super::ApiMessage;
    use super::Envelope;
    use crate::config::ClientConfig;
    use crate::session::Session;

    fn client() -> ApiClient
    {
        ApiClient::new(&ClientConfig {
            base_url: "http://localhost:3000/".to_string(),
            api_key: "key-123".to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_envelope_accepts_wrapped_and_direct()
    {
        let wrapped: Envelope<Vec<Role>> = serde_json::from_str(r#"{"data": [{"role_id": 1, "roleworker": "Penjahit"}], "page": 1}"#).unwrap();
        let direct: Envelope<Vec<Role>> = serde_json::from_str(r#"[{"role_id": 1, "roleworker": "Penjahit"}]"#).unwrap();

        assert_eq!(wrapped.into_inner(), direct.into_inner());

        let order: Envelope<Order> = serde_json::from_str(
            r#"{"order_id": 3, "order_name": "Seragam", "start_date": "2024-02-01", "due_date": "2024-02-03", "statusorder": "Diproses"}"#,
        )
        .unwrap();
        assert_eq!(order.into_inner().order_id, 3);
    }

    #[test]
    fn test_api_message_keeps_extra_fields()
    {
        let message: ApiMessage = serde_json::from_str(r#"{"message": "Order berhasil dihapus", "order_id": 3}"#).unwrap();

        assert_eq!(message.message.as_deref(), Some("Order berhasil dihapus"));
        assert_eq!(message.fields["order_id"], 3);
    }

    #[test]
    fn test_requests_carry_api_key_and_bearer_token()
    {
        let client = client();
        let url = client.url("/orders?page=2");
        assert_eq!(url, "http://localhost:3000/orders?page=2");

        let session = Session::new("token-abc");
        let request = client.builder(Method::GET, &url, Some(&session)).build().unwrap();

        assert_eq!(request.headers()["x-api-key"], "key-123");
        assert_eq!(request.headers()["authorization"], "Bearer token-abc");

        let anonymous = client.builder(Method::POST, &client.url("/users/login"), None).build().unwrap();
        assert!(anonymous.headers().get("authorization").is_none());
    }
}
