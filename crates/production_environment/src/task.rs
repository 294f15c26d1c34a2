use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::order::Order;
use crate::order::OrderId;
use crate::order::Quantity;
use crate::time_range::TimeRange;
use crate::time_range::TimeRangeError;
use crate::wire;
use crate::worker::RoleId;
use crate::worker::WorkerId;

pub type TaskId = u64;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskStatus(String);

impl TaskStatus
{
    pub fn new(status: impl Into<String>) -> Self
    {
        Self(status.into())
    }

    pub fn as_str(&self) -> &str
    {
        &self.0
    }
}

impl fmt::Display for TaskStatus
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(&self.0)
    }
}

/// One entry of the `GET /task-status` enumeration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatusOption
{
    pub statustask: TaskStatus,
}

/// A single worker's assignment against an order.
///
/// The per-worker endpoint joins in `order_name`, the per-order endpoint
/// joins in `worker_name`, so both are optional.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task
{
    #[serde(deserialize_with = "wire::deserialize_id")]
    pub task_id: TaskId,
    #[serde(default, deserialize_with = "wire::deserialize_optional_id")]
    pub order_id: Option<OrderId>,
    #[serde(default, deserialize_with = "wire::deserialize_optional_id")]
    pub worker_id: Option<WorkerId>,
    #[serde(default, deserialize_with = "wire::deserialize_optional_id")]
    pub role_id: Option<RoleId>,
    #[serde(default)]
    pub order_name: Option<String>,
    #[serde(default)]
    pub worker_name: Option<String>,
    #[serde(default)]
    pub roleworker: Option<String>,
    #[serde(default)]
    pub quantity: Quantity,
    #[serde(default)]
    pub note: Option<String>,
    pub statustask: TaskStatus,
    pub start_date: String,
    pub due_date: String,
}

impl Task
{
    pub fn time_range(&self) -> Result<TimeRange, TimeRangeError>
    {
        TimeRange::parse(&self.start_date, &self.due_date)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TaskError
{
    #[error("task quantity must be positive")]
    ZeroQuantity,
    #[error("order {order_id} has unusable dates: {source}")]
    OrderRange
    {
        order_id: OrderId,
        source: TimeRangeError,
    },
    #[error("task {task:?} must lie between {order:?}")]
    OutsideOrderWindow
    {
        task: TimeRange,
        order: TimeRange,
    },
}

/// Checks that a task's dates lie inside its parent order's dates.
pub fn validate_task_window(order: &Order, task_range: TimeRange) -> Result<TimeRange, TaskError>
{
    let order_range = order.time_range().map_err(|source| TaskError::OrderRange {
        order_id: order.order_id,
        source,
    })?;

    if !order_range.contains_range(&task_range) {
        return Err(TaskError::OutsideOrderWindow {
            task: task_range,
            order: order_range,
        });
    }
    Ok(order_range)
}

/// Payload for `POST /tasks`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewTask
{
    order_id: OrderId,
    worker_id: WorkerId,
    role_id: RoleId,
    quantity: Quantity,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
    start_date: String,
    due_date: String,
}

impl NewTask
{
    pub fn new(order: &Order, worker_id: WorkerId, role_id: RoleId, quantity: Quantity, note: Option<String>, range: TimeRange) -> Result<Self, TaskError>
    {
        if quantity == 0 {
            return Err(TaskError::ZeroQuantity);
        }
        validate_task_window(order, range)?;

        Ok(Self {
            order_id: order.order_id,
            worker_id,
            role_id,
            quantity,
            note: note.filter(|note| !note.trim().is_empty()),
            start_date: range.start_date().to_string(),
            due_date: range.end_date().to_string(),
        })
    }

    pub fn order_id(&self) -> OrderId
    {
        self.order_id
    }
}

/// Payload for `PUT /tasks/{id}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TaskUpdate
{
    pub worker_id: WorkerId,
    pub role_id: RoleId,
    pub quantity: Quantity,
    pub note: String,
    pub statustask: TaskStatus,
    pub start_date: String,
    pub due_date: String,
}

impl TaskUpdate
{
    /// Builds the update, applying the same window rule as task creation.
    pub fn new(order: &Order, worker_id: WorkerId, role_id: RoleId, quantity: Quantity, statustask: TaskStatus, range: TimeRange) -> Result<Self, TaskError>
    {
        if quantity == 0 {
            return Err(TaskError::ZeroQuantity);
        }
        validate_task_window(order, range)?;

        Ok(Self {
            worker_id,
            role_id,
            quantity,
            note: String::new(),
            statustask,
            start_date: range.start_date().to_string(),
            due_date: range.end_date().to_string(),
        })
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self
    {
        self.note = note.into();
        self
    }
}

/// Payload for `PUT /tasks/{id}/status`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TaskStatusUpdate
{
    pub statustask: TaskStatus,
}
