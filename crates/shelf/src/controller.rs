//! The state of a search session and the transitions user events and settled requests cause.
use std::collections::HashSet;

use log::{error, info, trace, warn};

use crate::{
    api::{self, Client},
    view::BookCard,
    BookRecord, Error,
};

/// A key pressed while the query field has focus.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Key {
    /// Submits the current query.
    Enter,
    /// Any other key, it has no effect on the search.
    Other,
}

/// A search that has been issued but not yet settled.
///
/// The request only carries what is needed to perform it, performing it is left to the caller so
/// the controller itself never blocks on the network.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchRequest {
    generation: u64,
    query: String,
}

impl SearchRequest {
    /// The generation this request was issued as, pass it back to [`SearchController::settle`].
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// The query as it was when the search was submitted.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Performs the request against `endpoint` using a new `C` client.
    ///
    /// # Errors
    ///
    /// An [`Err`] is returned when the request fails, the response has a non-success status or
    /// the response does not contain an `items` array of volumes.
    pub fn execute<C: Client>(&self, endpoint: &str) -> Result<Vec<BookRecord>, Error> {
        api::google_books::search_volumes::<C>(endpoint, &self.query)
    }
}

/// What settling a request did to the controller.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Settlement {
    /// The results were replaced by this many records.
    Applied(usize),
    /// The search failed, the previous results are kept.
    Failed,
    /// A newer search was submitted (or the session was reset) after this one, nothing changed.
    Stale,
}

/// Owns the query, the current result set and the in-flight state of a search session.
///
/// Every transition happens through `&mut self` so a session is driven from a single event loop.
/// Only the latest submitted search may settle, the result of an older one is ignored.
#[derive(Debug, Default)]
pub struct SearchController {
    query: String,
    results: Vec<BookRecord>,
    expanded: HashSet<String>,
    searching: bool,
    generation: u64,
}

impl SearchController {
    /// Creates a controller with an empty query and no results.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current text of the query field.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The current result set in the order the API returned it.
    #[must_use]
    pub fn results(&self) -> &[BookRecord] {
        &self.results
    }

    /// Whether the latest submitted search has not settled yet.
    #[must_use]
    pub const fn is_searching(&self) -> bool {
        self.searching
    }

    /// Whether the card of the record with `id` shows its details.
    #[must_use]
    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// The cards to render, one per record and in result order.
    pub fn cards(&self) -> impl Iterator<Item = BookCard<'_>> {
        self.results
            .iter()
            .map(move |record| BookCard::new(record, self.is_expanded(&record.id)))
    }

    /// Replaces the query, any text is accepted including the empty string.
    pub fn update_query<S: Into<String>>(&mut self, text: S) {
        self.query = text.into();
    }

    /// Submits the current query.
    ///
    /// The returned request supersedes any request submitted before it.
    pub fn submit_search(&mut self) -> SearchRequest {
        self.generation += 1;
        self.searching = true;
        info!(
            "Submitting search #{} for '{}'",
            self.generation, self.query
        );
        SearchRequest {
            generation: self.generation,
            query: self.query.clone(),
        }
    }

    /// Clicks the search button.
    ///
    /// The button is disabled while a search is in flight, in which case nothing happens and
    /// `None` is returned.
    pub fn click_search(&mut self) -> Option<SearchRequest> {
        if self.searching {
            trace!("Search button is disabled while searching - ignoring click");
            None
        } else {
            Some(self.submit_search())
        }
    }

    /// Handles a key press in the query field, [`Key::Enter`] is the same as clicking search.
    pub fn key_press(&mut self, key: Key) -> Option<SearchRequest> {
        match key {
            Key::Enter => self.click_search(),
            Key::Other => None,
        }
    }

    /// Applies the outcome of the request issued as `generation`.
    ///
    /// A successful search replaces the results and collapses every card. A failed search is
    /// logged and keeps the previous results. Either way the search is no longer in flight.
    pub fn settle(
        &mut self,
        generation: u64,
        result: Result<Vec<BookRecord>, Error>,
    ) -> Settlement {
        if generation != self.generation {
            match &result {
                Ok(_) => trace!(
                    "Ignoring search #{generation} - search #{} is the latest",
                    self.generation
                ),
                Err(err) => {
                    warn!("Error fetching books for superseded search #{generation}: {err}");
                }
            }
            return Settlement::Stale;
        }

        self.searching = false;
        match result {
            Ok(records) => {
                info!("Search #{generation} found {} book(s)", records.len());
                self.results = records;
                self.expanded.clear();
                Settlement::Applied(self.results.len())
            }
            Err(err) => {
                error!("Error fetching books: {err}");
                Settlement::Failed
            }
        }
    }

    /// Clicks the card of the record with `id`, showing or hiding its details.
    ///
    /// Returns `false` without changing anything when no record in the current results has
    /// that id.
    pub fn toggle_expansion(&mut self, id: &str) -> bool {
        if !self.results.iter().any(|record| record.id == id) {
            trace!("No book with the id '{id}' in the current results");
            return false;
        }

        if !self.expanded.remove(id) {
            self.expanded.insert(id.to_owned());
        }
        true
    }

    /// Returns the session to its initial state.
    ///
    /// A search still in flight is forgotten, its result will settle as [`Settlement::Stale`].
    pub fn reset(&mut self) {
        info!("Resetting search session");
        *self = Self {
            generation: self.generation + 1,
            ..Self::default()
        };
    }
}
