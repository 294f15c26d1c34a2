//! Prints a month calendar of the production dashboard to stdout.
//!
//! # Usage
//!
//! ```bash
//! calendar [YEAR MONTH] [--page N] [--worker ID | --order ID]
//! ```
//!
//! `MONTH` is 1-12 and defaults, together with `YEAR`, to the current month.
//! Without a view flag every unfinished order gets its own row.
//! `--worker` shows one worker's tasks on a single row, and `--order` shows
//! the tasks of one order.
//!
//! # Environment Variables
//!
//! - `DASHBOARD_USER`, `DASHBOARD_PASSWORD`: login credentials (required)
//! - `DASHBOARD_API_URL`, `DASHBOARD_API_KEY`: override `dashboard.toml`
//! - `RUST_LOG`: log filter (default: info)

use std::env;

use anyhow::Context;
use anyhow::bail;
use chrono::Local;
use dashboard_client::ApiClient;
use dashboard_client::ClientConfig;
use dashboard_client::Credentials;
use dashboard_client::Session;
use dashboard_client::generation::ViewState;
use production_environment::MonthWindow;
use production_environment::order::OrderId;
use production_environment::order::active_orders;
use production_environment::worker::WorkerId;
use timeline_grid::render::render_grid;
use timeline_grid::render::render_single_row;
use timeline_grid::scheduled_item::MalformedItemPolicy;
use timeline_grid::scheduled_item::collect_items;
use timeline_grid::timeline_grid::TimelineGridBuilder;
use tracing::info;
use tracing_subscriber::EnvFilter;

const USER_ENV: &str = "DASHBOARD_USER";
const PASSWORD_ENV: &str = "DASHBOARD_PASSWORD";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View
{
    Orders,
    Worker(WorkerId),
    Order(OrderId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Args
{
    /// Year and zero-based month.
    month: Option<(i32, u32)>,
    page: u32,
    view: View,
}

fn parse_args<I>(args: I) -> anyhow::Result<Args>
where
    I: IntoIterator<Item = String>,
{
    let mut positional = Vec::new();
    let mut page = 1;
    let mut view = View::Orders;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--page" | "--worker" | "--order" => {
                let value = args.next().with_context(|| format!("{arg} needs a value"))?;
                let number: u64 = value.parse().with_context(|| format!("invalid value for {arg}: {value}"))?;
                match arg.as_str() {
                    "--page" => page = u32::try_from(number).context("page number too large")?,
                    "--worker" => view = View::Worker(number),
                    _ => view = View::Order(number),
                }
            }
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            _ => positional.push(arg),
        }
    }

    let month = match positional.as_slice() {
        [] => None,
        [year, month] => {
            let year: i32 = year.parse().with_context(|| format!("invalid year: {year}"))?;
            let month: u32 = month.parse().with_context(|| format!("invalid month: {month}"))?;
            if !(1..=12).contains(&month) {
                bail!("month must be between 1 and 12, got {month}");
            }
            Some((year, month - 1))
        }
        _ => bail!("expected YEAR and MONTH together"),
    };

    Ok(Args { month, page, view })
}

async fn login(client: &ApiClient) -> anyhow::Result<Session>
{
    let name = env::var(USER_ENV).with_context(|| format!("{USER_ENV} is not set"))?;
    let password = env::var(PASSWORD_ENV).with_context(|| format!("{PASSWORD_ENV} is not set"))?;

    Ok(client.login(&Credentials::new(name, password)).await?)
}

async fn order_calendar(client: &ApiClient, session: &Session, builder: &TimelineGridBuilder, page: u32) -> anyhow::Result<String>
{
    let mut orders = ViewState::new();
    let ticket = orders.begin_fetch();
    let result = client.fetch_orders(session, page).await;
    orders.apply(&ticket, result);
    if let Some(error) = orders.last_error() {
        bail!("{error}");
    }

    let active = active_orders(orders.items()).into_iter().cloned().collect::<Vec<_>>();
    let items = collect_items(&active, MalformedItemPolicy::Skip)?;
    info!(orders = orders.items().len(), active = active.len(), scheduled = items.len(), "building order calendar");

    Ok(render_grid(builder, &builder.build_grid(&items)))
}

async fn worker_calendar(client: &ApiClient, session: &Session, builder: &TimelineGridBuilder, worker_id: WorkerId) -> anyhow::Result<String>
{
    let worker = client.fetch_worker(session, worker_id).await?;

    let mut tasks = ViewState::new();
    let ticket = tasks.begin_fetch();
    let result = client.fetch_tasks_by_worker(session, worker_id).await;
    tasks.apply(&ticket, result);
    if let Some(error) = tasks.last_error() {
        bail!("{error}");
    }

    let items = collect_items(tasks.items(), MalformedItemPolicy::Skip)?;
    let cells = builder.build_single_row_index(&items)?;

    Ok(render_single_row(builder, &worker.name, &cells))
}

async fn tasks_of_order_calendar(
    client: &ApiClient,
    session: &Session,
    builder: &TimelineGridBuilder,
    order_id: OrderId,
    page: u32,
) -> anyhow::Result<String>
{
    let mut tasks = ViewState::new();
    let ticket = tasks.begin_fetch();
    let result = client.fetch_tasks_by_order(session, order_id, page).await;
    tasks.apply(&ticket, result);
    if let Some(error) = tasks.last_error() {
        bail!("{error}");
    }

    let items = collect_items(tasks.items(), MalformedItemPolicy::Skip)?;
    Ok(render_grid(builder, &builder.build_grid(&items)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()>
{
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(env::args().skip(1))?;
    let window = match args.month {
        Some((year, month0)) => MonthWindow::new(year, month0)?,
        None => MonthWindow::from_date(Local::now().date_naive())?,
    };
    let builder = TimelineGridBuilder::new(window);

    let config = ClientConfig::from_default_location()?.with_env_overrides();
    info!(base_url = %config.base_url, year = window.year(), month = window.month0() + 1, "starting calendar");

    let client = ApiClient::new(&config)?;
    let session = login(&client).await?;

    let calendar = match args.view {
        View::Orders => order_calendar(&client, &session, &builder, args.page).await?,
        View::Worker(worker_id) => worker_calendar(&client, &session, &builder, worker_id).await?,
        View::Order(order_id) => tasks_of_order_calendar(&client, &session, &builder, order_id, args.page).await?,
    };

    println!("{calendar}");
    Ok(())
}
