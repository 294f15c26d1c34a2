use std::fs;
use std::path::PathBuf;

use production_environment::MonthWindow;
use production_environment::order::Order;
use production_environment::order::active_orders;
use production_environment::task::Task;
use production_environment::task::validate_task_window;
use production_environment::time_range::TimeRangeError;
use timeline_grid::GridError;
use timeline_grid::scheduled_item::ItemKind;
use timeline_grid::scheduled_item::MalformedItemPolicy;
use timeline_grid::scheduled_item::collect_items;
use timeline_grid::timeline_grid::DaySpan;
use timeline_grid::timeline_grid::GridCell;
use timeline_grid::timeline_grid::TimelineGridBuilder;

fn get_test_data_path(filename: &str) -> PathBuf
{
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests")
        .join(filename)
}

fn load_orders() -> Vec<Order>
{
    let orders_json = fs::read_to_string(get_test_data_path("orders.json")).expect("Failed to read orders.json");
    serde_json::from_str(&orders_json).expect("Failed to parse orders.json")
}

fn load_tasks() -> Vec<Task>
{
    let tasks_json = fs::read_to_string(get_test_data_path("tasks.json")).expect("Failed to read tasks.json");
    serde_json::from_str(&tasks_json).expect("Failed to parse tasks.json")
}

#[test]
fn test_order_calendar_for_february()
{
    let orders = load_orders();
    assert_eq!(orders.len(), 10);

    let items = collect_items(&orders, MalformedItemPolicy::Skip).unwrap();
    assert_eq!(
        items.iter().map(|item| item.id()).collect::<Vec<_>>(),
        vec![101, 102, 103, 104, 105, 106, 107, 110]
    );

    let builder = TimelineGridBuilder::new(MonthWindow::new(2024, 1).unwrap());
    let grid = builder.build_grid(&items);

    assert_eq!(grid.iter().map(|row| row.item.id()).collect::<Vec<_>>(), vec![101, 102, 103, 104, 105]);
    assert!(grid.iter().all(|row| row.day_units() == 29));

    let spans = grid.iter().map(|row| builder.clipped_span(row.item).unwrap()).collect::<Vec<_>>();
    assert_eq!(
        spans,
        vec![
            DaySpan { start_day: 1, end_day: 9 },
            DaySpan { start_day: 5, end_day: 16 },
            DaySpan { start_day: 12, end_day: 12 },
            DaySpan { start_day: 1, end_day: 29 },
            DaySpan { start_day: 27, end_day: 29 },
        ]
    );

    assert_eq!(builder.start_days(&items).into_iter().collect::<Vec<_>>(), vec![5, 12, 27]);
}

#[test]
fn test_dashboard_hides_finished_orders()
{
    let orders = load_orders();
    let active = active_orders(&orders).into_iter().cloned().collect::<Vec<_>>();

    let items = collect_items(&active, MalformedItemPolicy::Skip).unwrap();
    let builder = TimelineGridBuilder::new(MonthWindow::new(2024, 1).unwrap());

    let rows = builder.build_grid(&items).iter().map(|row| row.item.id()).collect::<Vec<_>>();
    assert_eq!(rows, vec![101, 102, 104, 105]);
}

#[test]
fn test_abort_policy_reports_inverted_order()
{
    let orders = load_orders();

    let error = collect_items(&orders, MalformedItemPolicy::Abort).unwrap_err();
    assert!(matches!(
        error,
        GridError::MalformedItem {
            kind: ItemKind::Order,
            id: 108,
            source: TimeRangeError::InvariantViolation { .. }
        }
    ));
}

#[test]
fn test_navigating_to_march()
{
    let orders = load_orders();
    let items = collect_items(&orders, MalformedItemPolicy::Skip).unwrap();

    let february = MonthWindow::new(2024, 1).unwrap();
    let builder = TimelineGridBuilder::new(february.next().unwrap());
    assert_eq!(builder.days_in_month(), 31);

    let spans = builder
        .build_grid(&items)
        .iter()
        .map(|row| (row.item.id(), builder.clipped_span(row.item).unwrap()))
        .collect::<Vec<_>>();

    assert_eq!(
        spans,
        vec![
            (104, DaySpan { start_day: 1, end_day: 31 }),
            (105, DaySpan { start_day: 1, end_day: 3 }),
            (106, DaySpan { start_day: 4, end_day: 20 }),
        ]
    );
}

#[test]
fn test_worker_calendar_single_row()
{
    let tasks = load_tasks();
    let items = collect_items(&tasks, MalformedItemPolicy::Abort).unwrap();

    let builder = TimelineGridBuilder::new(MonthWindow::new(2024, 1).unwrap());
    let cells = builder.build_single_row_index(&items).unwrap();

    assert_eq!(cells.len(), 18);
    assert_eq!(cells[0], GridCell::Occupied { item: &items[0], span: 2 });
    assert_eq!(cells[1], GridCell::Empty);
    assert_eq!(cells[2], GridCell::Empty);
    assert_eq!(cells[3], GridCell::Occupied { item: &items[1], span: 5 });
    assert_eq!(cells[4], GridCell::Occupied { item: &items[2], span: 5 });
    assert!(cells[5..17].iter().all(|cell| *cell == GridCell::Empty));
    assert_eq!(cells[17], GridCell::Occupied { item: &items[3], span: 3 });
    assert_eq!(cells.iter().map(GridCell::span).sum::<u32>(), 29);

    let on_ninth = builder.items_on_day(&items, 9).unwrap();
    assert_eq!(on_ninth.iter().map(|item| item.id()).collect::<Vec<_>>(), vec![2, 3]);
}

#[test]
fn test_tasks_lie_inside_their_orders()
{
    let orders = load_orders();
    let tasks = load_tasks();

    for task in &tasks {
        let order = orders.iter().find(|order| Some(order.order_id) == task.order_id).unwrap();
        assert!(validate_task_window(order, task.time_range().unwrap()).is_ok(), "task {} escapes order {}", task.task_id, order.order_id);
    }
}
