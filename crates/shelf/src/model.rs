//! The book records produced by a search.

/// One book of a result set.
///
/// Records are never edited once a search has produced them, the only per-book state that
/// changes afterwards (whether its card is expanded) is owned by the
/// [`SearchController`](crate::SearchController).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BookRecord {
    /// Identifier supplied by the API, unique within a result set.
    pub id: String,
    /// Title of the book.
    pub title: Option<String>,
    /// Authors in the order given by the API, `None` when the API lists none.
    pub authors: Option<Vec<String>>,
    /// Free-form publication date, e.g. `2004` or `2004-06-09`.
    pub published_date: Option<String>,
    /// Description of the book.
    pub description: Option<String>,
}

impl BookRecord {
    /// Creates a record that only has an id.
    #[must_use]
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// The authors joined by `", "`.
    ///
    /// Returns `None` when there are no authors to show.
    #[must_use]
    pub fn authors_line(&self) -> Option<String> {
        self.authors
            .as_ref()
            .filter(|authors| !authors.is_empty())
            .map(|authors| authors.join(", "))
    }
}

#[test]
fn authors_are_joined_with_comma_and_space() {
    let mut record = BookRecord::new("A");
    assert_eq!(None, record.authors_line());

    record.authors = Some(vec![]);
    assert_eq!(None, record.authors_line());

    record.authors = Some(vec!["X".to_owned(), "Y".to_owned()]);
    assert_eq!(Some("X, Y".to_owned()), record.authors_line());
}
