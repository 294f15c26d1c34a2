use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::time_range::TimeRange;
use crate::time_range::TimeRangeError;
use crate::wire;

pub type OrderId = u64;
pub type Quantity = u32;

/// Status name of an order as enumerated by `GET /order-status`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderStatus(String);

impl OrderStatus
{
    pub const FINISHED: &'static str = "Selesai";

    pub fn new(status: impl Into<String>) -> Self
    {
        Self(status.into())
    }

    pub fn as_str(&self) -> &str
    {
        &self.0
    }

    pub fn is_finished(&self) -> bool
    {
        self.0.trim().eq_ignore_ascii_case(Self::FINISHED)
    }
}

impl fmt::Display for OrderStatus
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(&self.0)
    }
}

/// One entry of the `GET /order-status` enumeration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatusOption
{
    pub statusorder: OrderStatus,
}

/// A customer job. Dates are kept exactly as the API sent them and only
/// parsed when a [`TimeRange`] is requested.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order
{
    #[serde(deserialize_with = "wire::deserialize_id")]
    pub order_id: OrderId,
    pub order_name: String,
    #[serde(default)]
    pub typeorder: String,
    #[serde(default)]
    pub quantity: Quantity,
    #[serde(default)]
    pub note: Option<String>,
    pub start_date: String,
    pub due_date: String,
    pub statusorder: OrderStatus,
}

impl Order
{
    pub fn time_range(&self) -> Result<TimeRange, TimeRangeError>
    {
        TimeRange::parse(&self.start_date, &self.due_date)
    }

    pub fn is_finished(&self) -> bool
    {
        self.statusorder.is_finished()
    }
}

/// Orders still in progress, in their original order.
pub fn active_orders(orders: &[Order]) -> Vec<&Order>
{
    orders.iter().filter(|order| !order.is_finished()).collect()
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum OrderError
{
    #[error("order name must not be empty")]
    MissingName,
    #[error("order quantity must be positive")]
    ZeroQuantity,
    #[error(transparent)]
    InvalidRange(#[from] TimeRangeError),
}

/// Payload for `POST /orders`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewOrder
{
    order_name: String,
    typeorder: String,
    quantity: Quantity,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
    start_date: String,
    due_date: String,
}

impl NewOrder
{
    pub fn new(order_name: &str, typeorder: &str, quantity: Quantity, note: Option<String>, range: TimeRange) -> Result<Self, OrderError>
    {
        let order_name = order_name.trim();
        if order_name.is_empty() {
            return Err(OrderError::MissingName);
        }
        if quantity == 0 {
            return Err(OrderError::ZeroQuantity);
        }

        Ok(Self {
            order_name: order_name.to_string(),
            typeorder: typeorder.trim().to_string(),
            quantity,
            note: note.filter(|note| !note.trim().is_empty()),
            start_date: range.start_date().to_string(),
            due_date: range.end_date().to_string(),
        })
    }

    /// Same as [`NewOrder::new`] but starting from the raw form strings.
    pub fn parse(order_name: &str, typeorder: &str, quantity: Quantity, note: Option<String>, start_date: &str, due_date: &str) -> Result<Self, OrderError>
    {
        let range = TimeRange::parse(start_date, due_date)?;
        Self::new(order_name, typeorder, quantity, note, range)
    }
}

/// Payload for `PUT /orders/{id}`; the edit form always sends every field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OrderUpdate
{
    pub order_name: String,
    pub typeorder: String,
    pub quantity: Quantity,
    pub note: String,
    pub start_date: String,
    pub due_date: String,
    pub statusorder: OrderStatus,
}

impl OrderUpdate
{
    pub fn from_order(order: &Order, range: TimeRange) -> Self
    {
        Self {
            order_name: order.order_name.clone(),
            typeorder: order.typeorder.clone(),
            quantity: order.quantity,
            note: order.note.clone().unwrap_or_default(),
            start_date: range.start_date().to_string(),
            due_date: range.end_date().to_string(),
            statusorder: order.statusorder.clone(),
        }
    }
}
