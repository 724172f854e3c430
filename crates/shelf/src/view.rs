//! Text rendering of a search session.
//!
//! Views borrow the state they render and implement [`Display`], so they can be printed directly
//! or turned into a `String` with `to_string`.
use std::fmt::{self, Display, Formatter};

use crate::{BookRecord, SearchController};

/// Title shown in the header, clicking it resets the session.
pub const HEADER: &str = "Google Books App";
/// Shown in the query field while it is empty.
pub const PLACEHOLDER: &str = "Search for books...";
/// Label of the search button while idle.
pub const SEARCH_LABEL: &str = "Search";
/// Label of the search button while a search is in flight.
pub const SEARCHING_LABEL: &str = "Searching...";
/// Shown in place of the list when a settled search found nothing.
pub const NO_RESULTS: &str = "No books found.";

const INDENT: &str = "    ";

/// One book, the front (title and authors) is always shown and the details (publication date and
/// description) only when the card is expanded.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BookCard<'a> {
    record: &'a BookRecord,
    expanded: bool,
}

impl<'a> BookCard<'a> {
    /// Creates the card for `record`.
    #[must_use]
    pub const fn new(record: &'a BookRecord, expanded: bool) -> Self {
        Self { record, expanded }
    }

    /// The record shown by this card.
    #[must_use]
    pub const fn record(&self) -> &'a BookRecord {
        self.record
    }

    /// Whether the details are shown.
    #[must_use]
    pub const fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// The first line of the card, used to label the card in menus.
    #[must_use]
    pub fn label(&self) -> String {
        let marker = if self.expanded { '-' } else { '+' };
        match &self.record.title {
            Some(title) => format!("{marker} {title}"),
            None => marker.to_string(),
        }
    }
}

impl Display for BookCard<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())?;
        if let Some(authors) = self.record.authors_line() {
            write!(f, "\n{INDENT}{authors}")?;
        }

        if self.expanded {
            let details = [&self.record.published_date, &self.record.description];
            for detail in details.into_iter().flatten() {
                write!(f, "\n{INDENT}| {detail}")?;
            }
        }
        Ok(())
    }
}

/// The cards of a result set, numbered from 1 in result order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BookList<'a> {
    cards: Vec<BookCard<'a>>,
}

impl<'a> BookList<'a> {
    /// Creates a list of `cards`, keeping their order.
    #[must_use]
    pub fn new<I: IntoIterator<Item = BookCard<'a>>>(cards: I) -> Self {
        Self {
            cards: cards.into_iter().collect(),
        }
    }
}

impl Display for BookList<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (n, card) in self.cards.iter().enumerate() {
            if n > 0 {
                f.write_str("\n\n")?;
            }
            write!(f, "[{}] {card}", n + 1)?;
        }
        Ok(())
    }
}

/// The whole screen: header, search controls and the list (or the empty state).
#[derive(Clone, Debug)]
pub struct Page<'a> {
    controller: &'a SearchController,
    expand_all: bool,
}

impl<'a> Page<'a> {
    /// Creates the page for the current state of `controller`.
    #[must_use]
    pub const fn new(controller: &'a SearchController) -> Self {
        Self {
            controller,
            expand_all: false,
        }
    }

    /// Renders every card expanded regardless of its expansion state.
    #[must_use]
    pub const fn expand_all(mut self) -> Self {
        self.expand_all = true;
        self
    }

    /// The label the search button currently shows.
    #[must_use]
    pub const fn button_label(&self) -> &'static str {
        if self.controller.is_searching() {
            SEARCHING_LABEL
        } else {
            SEARCH_LABEL
        }
    }

    /// The list to show, `None` when the results are empty.
    #[must_use]
    pub fn list(&self) -> Option<BookList<'a>> {
        let controller = self.controller;
        if controller.results().is_empty() {
            None
        } else if self.expand_all {
            Some(BookList::new(
                controller
                    .results()
                    .iter()
                    .map(|record| BookCard::new(record, true)),
            ))
        } else {
            Some(BookList::new(controller.cards()))
        }
    }

    /// Whether the "no results" indicator is shown, only once a search has settled.
    #[must_use]
    pub fn shows_no_results(&self) -> bool {
        self.controller.results().is_empty() && !self.controller.is_searching()
    }
}

impl Display for Page<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{HEADER}")?;
        writeln!(f, "{}", "=".repeat(HEADER.len()))?;

        let query = match self.controller.query() {
            "" => PLACEHOLDER,
            query => query,
        };
        let disabled = if self.controller.is_searching() {
            " (disabled)"
        } else {
            ""
        };
        writeln!(f, "> {query}  [{}]{disabled}", self.button_label())?;

        if let Some(list) = self.list() {
            write!(f, "\n{list}\n")?;
        } else if self.shows_no_results() {
            write!(f, "\n{NO_RESULTS}\n")?;
        }
        Ok(())
    }
}
