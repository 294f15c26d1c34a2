use std::collections::BTreeSet;

use chrono::Datelike;
use production_environment::MonthWindow;
use serde::Serialize;
use serde::Serializer;
use tracing::debug;

use crate::GridError;
use crate::scheduled_item::ScheduledItem;

/// 1-based day of the month.
pub type Day = u32;

/// One calendar cell. An occupied cell covers `span` adjacent day columns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridCell<'a>
{
    Empty,
    Occupied
    {
        item: &'a ScheduledItem,
        span: u32,
    },
}

impl GridCell<'_>
{
    /// Number of day columns this cell covers.
    pub fn span(&self) -> u32
    {
        match self {
            GridCell::Empty => 1,
            GridCell::Occupied { span, .. } => *span,
        }
    }

    pub fn item(&self) -> Option<&ScheduledItem>
    {
        match self {
            GridCell::Empty => None,
            GridCell::Occupied { item, .. } => Some(*item),
        }
    }
}

#[derive(Serialize)]
struct CellView<'a>
{
    kind: &'static str,
    span: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    item: Option<&'a ScheduledItem>,
}

impl Serialize for GridCell<'_>
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let view = match self {
            GridCell::Empty => CellView {
                kind: "Empty",
                span: 1,
                item: None,
            },
            GridCell::Occupied { item, span } => CellView {
                kind: "Occupied",
                span: *span,
                item: Some(*item),
            },
        };
        view.serialize(serializer)
    }
}

/// Days of the window an item covers after clipping to the month.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DaySpan
{
    pub start_day: Day,
    pub end_day: Day,
}

impl DaySpan
{
    pub fn span(&self) -> u32
    {
        self.end_day - self.start_day + 1
    }
}

/// One grid row per visible item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GridRow<'a>
{
    pub item: &'a ScheduledItem,
    pub cells: Vec<GridCell<'a>>,
}

impl GridRow<'_>
{
    /// Day columns covered by the row, counting each cell by its span.
    pub fn day_units(&self) -> u32
    {
        self.cells.iter().map(GridCell::span).sum()
    }
}

/// Lays date-ranged items out on the day columns of one month.
///
/// All methods are pure: the same items and window always give the same
/// cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimelineGridBuilder
{
    window: MonthWindow,
}

/// Public methods
impl TimelineGridBuilder
{
    pub fn new(window: MonthWindow) -> Self
    {
        Self { window }
    }

    pub fn window(&self) -> MonthWindow
    {
        self.window
    }

    pub fn days_in_month(&self) -> u32
    {
        self.window.days_in_month()
    }

    /// An item is visible if either end falls in the month or if it runs
    /// across the whole month.
    pub fn is_visible(&self, item: &ScheduledItem) -> bool
    {
        let starts_inside = self.window.contains(item.start_date());
        let ends_inside = self.window.contains(item.end_date());
        let spans_window = item.start_date() < self.window.first_day() && item.end_date() > self.window.last_day();

        starts_inside || ends_inside || spans_window
    }

    /// `None` for items that are not visible in the window.
    pub fn clipped_span(&self, item: &ScheduledItem) -> Option<DaySpan>
    {
        if !self.is_visible(item) {
            return None;
        }

        let start_day = if self.window.contains(item.start_date()) { item.start_date().day() } else { 1 };
        let end_day = if self.window.contains(item.end_date()) {
            item.end_date().day()
        } else {
            self.days_in_month()
        };

        debug_assert!(1 <= start_day && start_day <= end_day && end_day <= self.days_in_month());
        Some(DaySpan { start_day, end_day })
    }

    /// Empty cells before the item, one merged cell for it, then empty cells
    /// up to the end of the month.
    pub fn build_row<'a>(&self, item: &'a ScheduledItem) -> Option<GridRow<'a>>
    {
        let day_span = self.clipped_span(item)?;

        let mut cells = Vec::with_capacity((self.days_in_month() - day_span.span() + 1) as usize);
        cells.extend((1..day_span.start_day).map(|_| GridCell::Empty));
        cells.push(GridCell::Occupied {
            item,
            span: day_span.span(),
        });
        cells.extend((day_span.end_day + 1..=self.days_in_month()).map(|_| GridCell::Empty));

        Some(GridRow { item, cells })
    }

    /// One row per visible item, in input order.
    pub fn build_grid<'a>(&self, items: &'a [ScheduledItem]) -> Vec<GridRow<'a>>
    {
        let rows = items.iter().filter_map(|item| self.build_row(item)).collect::<Vec<_>>();

        debug!(
            target: "developer",
            year = self.window.year(),
            month0 = self.window.month0(),
            items = items.len(),
            rows = rows.len(),
            "built timeline grid"
        );
        rows
    }

    /// A single shared row where each day shows at most one item.
    ///
    /// The first item (in input order) active on the cursor day claims the
    /// rest of its run inside the month; days with no active item become
    /// single empty cells.
    pub fn build_single_row_index<'a>(&self, items: &'a [ScheduledItem]) -> Result<Vec<GridCell<'a>>, GridError>
    {
        let window = self.window;
        walk_day_cursor(self.days_in_month(), |day| {
            let date = window.date_of(day)?;
            items
                .iter()
                .find(|item| item.range().contains(date))
                .map(|item| (item, (item.end_date() - date).num_days() + 1))
        })
    }

    /// Every item active on the given day of the window, in input order.
    pub fn items_on_day<'a>(&self, items: &'a [ScheduledItem], day: Day) -> Result<Vec<&'a ScheduledItem>, GridError>
    {
        let date = self.window.date_of(day).ok_or(GridError::DayOutOfWindow {
            day,
            days_in_month: self.days_in_month(),
        })?;

        Ok(items.iter().filter(|item| item.range().contains(date)).collect())
    }

    /// Days of the window on which at least one item starts.
    pub fn start_days(&self, items: &[ScheduledItem]) -> BTreeSet<Day>
    {
        items
            .iter()
            .filter(|item| self.window.contains(item.start_date()))
            .map(|item| item.start_date().day())
            .collect()
    }
}

/// Greedy walk over the days of a month. `active_on(day)` returns the item claiming `day` together with the
/// number of days it still covers from `day` onwards, `day` included.
fn walk_day_cursor<'a, F>(days_in_month: u32, mut active_on: F) -> Result<Vec<GridCell<'a>>, GridError>
where
    F: FnMut(Day) -> Option<(&'a ScheduledItem, i64)>,
{
    let mut cells = vec![];
    let mut day: Day = 1;

    while day <= days_in_month {
        let advance = match active_on(day) {
            Some((item, item_days_from_cursor)) => {
                let days_left_in_month = i64::from(days_in_month - day + 1);
                let span = u32::try_from(days_left_in_month.min(item_days_from_cursor))
                    .ok()
                    .filter(|span| *span >= 1)
                    .ok_or(GridError::StalledCursor { day })?;

                cells.push(GridCell::Occupied { item, span });
                span
            }
            None => {
                cells.push(GridCell::Empty);
                1
            }
        };

        day += advance;
    }

    Ok(cells)
}
