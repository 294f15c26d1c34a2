use production_environment::time_range::TimeRangeError;
use thiserror::Error;

use crate::scheduled_item::ItemId;
use crate::scheduled_item::ItemKind;

pub mod render;
pub mod scheduled_item;
pub mod timeline_grid;

pub use production_environment::MonthWindow;
pub use production_environment::days_in_month;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError
{
    #[error("{kind:?} {id} cannot be placed on the grid: {source}")]
    MalformedItem
    {
        kind: ItemKind,
        id: ItemId,
        source: TimeRangeError,
    },
    #[error("day cursor stalled at day {day}")]
    StalledCursor
    {
        day: u32,
    },
    #[error("day {day} is outside a month of {days_in_month} days")]
    DayOutOfWindow
    {
        day: u32,
        days_in_month: u32,
    },
}
