//! Stale-response protection for views that refetch when their inputs
//! change. Each fetch takes a ticket; a response is applied only while its
//! ticket is still the newest one issued.

use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use tracing::debug;
use tracing::warn;

use crate::error::ApiError;

#[derive(Debug, Clone, Default)]
pub struct RequestGenerations
{
    latest: Arc<AtomicU64>,
}

#[derive(Debug, Clone)]
pub struct GenerationTicket
{
    generation: u64,
    latest: Arc<AtomicU64>,
}

impl RequestGenerations
{
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Starts a new fetch, superseding every ticket issued before it.
    pub fn begin(&self) -> GenerationTicket
    {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        GenerationTicket {
            generation,
            latest: Arc::clone(&self.latest),
        }
    }

    /// Supersedes outstanding tickets without starting a fetch, e.g. when a
    /// view is closed.
    pub fn invalidate(&self)
    {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}

impl GenerationTicket
{
    pub fn generation(&self) -> u64
    {
        self.generation
    }

    pub fn is_current(&self) -> bool
    {
        self.latest.load(Ordering::SeqCst) == self.generation
    }
}

/// Items backing one view together with its loading and error state.
#[derive(Debug)]
pub struct ViewState<T>
{
    generations: RequestGenerations,
    items: Vec<T>,
    loading: bool,
    last_error: Option<String>,
}

impl<T> Default for ViewState<T>
{
    fn default() -> Self
    {
        Self {
            generations: RequestGenerations::default(),
            items: Vec::new(),
            loading: false,
            last_error: None,
        }
    }
}

impl<T> ViewState<T>
{
    pub fn new() -> Self
    {
        Self::default()
    }

    pub fn begin_fetch(&mut self) -> GenerationTicket
    {
        self.loading = true;
        self.generations.begin()
    }

    /// Applies a fetch result. Returns `false` when the ticket has been
    /// superseded, in which case nothing changes. A failed fetch keeps the
    /// items from the last successful one.
    pub fn apply(&mut self, ticket: &GenerationTicket, result: Result<Vec<T>, ApiError>) -> bool
    {
        if !ticket.is_current() {
            debug!(generation = ticket.generation(), "discarding stale response");
            return false;
        }

        self.loading = false;
        match result {
            Ok(items) => {
                self.items = items;
                self.last_error = None;
            }
            Err(error) => {
                warn!(%error, "fetch failed, keeping previous items");
                self.last_error = Some(error.to_string());
            }
        }
        true
    }

    pub fn invalidate(&mut self)
    {
        self.loading = false;
        self.generations.invalidate();
    }

    pub fn items(&self) -> &[T]
    {
        &self.items
    }

    pub fn is_loading(&self) -> bool
    {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str>
    {
        self.last_error.as_deref()
    }
}

#[cfg(test)]
mod tests
{
    use reqwest::StatusCode;

    use super::RequestGenerations;
    use super::ViewState;
    use crate::error::ApiError;

    #[test]
    fn test_only_latest_ticket_is_current()
    {
        let generations = RequestGenerations::new();
        let first = generations.begin();
        assert!(first.is_current());

        let second = generations.begin();
        assert!(!first.is_current());
        assert!(second.is_current());

        generations.invalidate();
        assert!(!second.is_current());
    }

    #[test]
    fn test_stale_response_is_discarded()
    {
        let mut view = ViewState::new();
        let january = view.begin_fetch();
        let february = view.begin_fetch();

        assert!(view.apply(&february, Ok(vec!["february"])));
        assert!(!view.apply(&january, Ok(vec!["january"])));

        assert_eq!(view.items(), &["february"]);
        assert!(!view.is_loading());
    }

    #[test]
    fn test_failed_fetch_keeps_previous_items()
    {
        let mut view = ViewState::new();
        let ticket = view.begin_fetch();
        view.apply(&ticket, Ok(vec![1, 2, 3]));

        let ticket = view.begin_fetch();
        assert!(view.is_loading());
        let error = ApiError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Gagal mengambil data".to_string(),
        };
        assert!(view.apply(&ticket, Err(error)));

        assert_eq!(view.items(), &[1, 2, 3]);
        assert_eq!(view.last_error(), Some("Gagal mengambil data (HTTP 500 Internal Server Error)"));
        assert!(!view.is_loading());
    }

    #[test]
    fn test_invalidate_drops_in_flight_fetch()
    {
        let mut view = ViewState::<u32>::new();
        let ticket = view.begin_fetch();
        view.invalidate();

        assert!(!view.apply(&ticket, Ok(vec![7])));
        assert!(view.items().is_empty());
    }
}
