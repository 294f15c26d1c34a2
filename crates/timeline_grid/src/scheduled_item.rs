use chrono::NaiveDate;
use production_environment::order::Order;
use production_environment::task::Task;
use production_environment::time_range::TimeRange;
use production_environment::time_range::TimeRangeError;
use serde::Serialize;
use tracing::warn;

use crate::GridError;

pub type ItemId = u64;

/// Where a [`ScheduledItem`] came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ItemKind
{
    Order,
    Task,
}

/// A dated record placed on a calendar grid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScheduledItem
{
    kind: ItemKind,
    id: ItemId,
    label: String,
    status: String,
    #[serde(flatten)]
    range: TimeRange,
}

impl ScheduledItem
{
    pub fn new(kind: ItemKind, id: ItemId, label: impl Into<String>, status: impl Into<String>, range: TimeRange) -> Self
    {
        Self {
            kind,
            id,
            label: label.into(),
            status: status.into(),
            range,
        }
    }

    pub fn kind(&self) -> ItemKind
    {
        self.kind
    }

    pub fn id(&self) -> ItemId
    {
        self.id
    }

    pub fn label(&self) -> &str
    {
        &self.label
    }

    pub fn status(&self) -> &str
    {
        &self.status
    }

    pub fn range(&self) -> TimeRange
    {
        self.range
    }

    pub fn start_date(&self) -> NaiveDate
    {
        self.range.start_date()
    }

    pub fn end_date(&self) -> NaiveDate
    {
        self.range.end_date()
    }

    /// Hover text of a grid cell, e.g. `Seragam SD (Diproses)`.
    pub fn title(&self) -> String
    {
        if self.status.is_empty() {
            return self.label.clone();
        }
        format!("{} ({})", self.label, self.status)
    }
}

/// Records that can be shown on a timeline. Each source kind decides its
/// own label.
pub trait Schedulable
{
    fn item_kind(&self) -> ItemKind;

    fn item_id(&self) -> ItemId;

    fn item_label(&self) -> String;

    fn item_status(&self) -> String;

    fn scheduled_range(&self) -> Result<TimeRange, TimeRangeError>;

    fn to_scheduled_item(&self) -> Result<ScheduledItem, TimeRangeError>
    {
        Ok(ScheduledItem::new(
            self.item_kind(),
            self.item_id(),
            self.item_label(),
            self.item_status(),
            self.scheduled_range()?,
        ))
    }
}

impl Schedulable for Order
{
    fn item_kind(&self) -> ItemKind
    {
        ItemKind::Order
    }

    fn item_id(&self) -> ItemId
    {
        self.order_id
    }

    fn item_label(&self) -> String
    {
        self.order_name.clone()
    }

    fn item_status(&self) -> String
    {
        self.statusorder.to_string()
    }

    fn scheduled_range(&self) -> Result<TimeRange, TimeRangeError>
    {
        self.time_range()
    }
}

impl Schedulable for Task
{
    fn item_kind(&self) -> ItemKind
    {
        ItemKind::Task
    }

    fn item_id(&self) -> ItemId
    {
        self.task_id
    }

    // The worker calendar shows which order a task belongs to; the order
    // calendar only has the worker's name.
    fn item_label(&self) -> String
    {
        self.order_name
            .clone()
            .or_else(|| self.worker_name.clone())
            .unwrap_or_else(|| format!("Task {}", self.task_id))
    }

    fn item_status(&self) -> String
    {
        self.statustask.to_string()
    }

    fn scheduled_range(&self) -> Result<TimeRange, TimeRangeError>
    {
        self.time_range()
    }
}

/// What to do with a record whose dates cannot be placed on a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MalformedItemPolicy
{
    /// Leave the record out and keep rendering.
    #[default]
    Skip,
    /// Fail the whole render with the first error.
    Abort,
}

/// Converts records into [`ScheduledItem`]s, keeping input order.
pub fn collect_items<S: Schedulable>(sources: &[S], policy: MalformedItemPolicy) -> Result<Vec<ScheduledItem>, GridError>
{
    let mut items = Vec::with_capacity(sources.len());
    for source in sources {
        match source.to_scheduled_item() {
            Ok(item) => items.push(item),
            Err(error) => match policy {
                MalformedItemPolicy::Skip => {
                    warn!(kind = ?source.item_kind(), id = source.item_id(), %error, "skipping item with unusable dates");
                }
                MalformedItemPolicy::Abort => {
                    return Err(GridError::MalformedItem {
                        kind: source.item_kind(),
                        id: source.item_id(),
                        source: error,
                    });
                }
            },
        }
    }
    Ok(items)
}
