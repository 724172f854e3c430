use std::{
    marker::PhantomData,
    panic::{self, AssertUnwindSafe},
    sync::mpsc::{self, Receiver, Sender},
    thread,
};

use eyre::{Context, Result};
use log::trace;
use shelf::{
    api::Client, BookRecord, ErrorKind, HttpClient, Key, SearchController, SearchRequest,
};

/// Everything that can happen to a search session.
#[derive(Debug)]
pub enum Event {
    /// The text of the query field changed.
    QueryChanged(String),
    /// A key was pressed in the query field.
    Key(Key),
    /// The search button was clicked.
    SearchClicked,
    /// The card of the book with this id was clicked.
    CardClicked(String),
    /// The header was clicked, starting over.
    HeaderClicked,
    /// A search request settled.
    Settled {
        generation: u64,
        result: Result<Vec<BookRecord>, shelf::Error>,
    },
}

/// Applies events to a [`SearchController`] one at a time.
///
/// Search requests are performed on a worker thread each, which posts the outcome back as an
/// [`Event::Settled`] to be applied like any other event.
pub struct App<C: Client = HttpClient> {
    controller: SearchController,
    endpoint: String,
    sender: Sender<Event>,
    receiver: Receiver<Event>,
    _client: PhantomData<C>,
}

impl<C: Client + 'static> App<C> {
    pub fn new(endpoint: String) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            controller: SearchController::new(),
            endpoint,
            sender,
            receiver,
            _client: PhantomData,
        }
    }

    pub const fn controller(&self) -> &SearchController {
        &self.controller
    }

    pub fn dispatch(&mut self, event: Event) {
        trace!("Dispatching {event:?}");
        let request = match event {
            Event::QueryChanged(text) => {
                self.controller.update_query(text);
                None
            }
            Event::Key(key) => self.controller.key_press(key),
            Event::SearchClicked => self.controller.click_search(),
            Event::CardClicked(id) => {
                self.controller.toggle_expansion(&id);
                None
            }
            Event::HeaderClicked => {
                self.controller.reset();
                None
            }
            Event::Settled { generation, result } => {
                self.controller.settle(generation, result);
                None
            }
        };

        if let Some(request) = request {
            self.spawn(request);
        }
    }

    /// Blocks until the latest search has settled, applying events as they arrive.
    ///
    /// There is no timeout, a request waits for as long as the transport does.
    pub fn wait_until_idle(&mut self) -> Result<()> {
        while self.controller.is_searching() {
            let event = self
                .receiver
                .recv()
                .wrap_err("Search worker stopped without settling")?;
            self.dispatch(event);
        }
        Ok(())
    }

    fn spawn(&self, request: SearchRequest) {
        let sender = self.sender.clone();
        let endpoint = self.endpoint.clone();
        thread::spawn(move || {
            // a panic in the client still settles the search, as a failure
            let result = panic::catch_unwind(AssertUnwindSafe(|| request.execute::<C>(&endpoint)))
                .unwrap_or_else(|_| {
                    Err(shelf::Error::new(
                        ErrorKind::IO,
                        "the client panicked while performing the request",
                    ))
                });
            // the session may have ended while the request was in flight
            let _ = sender.send(Event::Settled {
                generation: request.generation(),
                result,
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_BOOKS: &str = r#"{"items": [
        {"id": "A", "volumeInfo": {"title": "Code Complete", "authors": ["Steve McConnell"]}},
        {"id": "B", "volumeInfo": {"title": "Refactoring"}}
    ]}"#;

    #[derive(Default)]
    struct TwoBooksClient;

    impl Client for TwoBooksClient {
        fn get_json<T>(&self, _: &str) -> Result<T, shelf::Error>
        where
            T: serde::de::DeserializeOwned,
        {
            serde_json::from_str(TWO_BOOKS)
                .map_err(|e| shelf::Error::wrap(ErrorKind::Deserialize, e))
        }
    }

    #[derive(Default)]
    struct OfflineClient;

    impl Client for OfflineClient {
        fn get_json<T>(&self, _: &str) -> Result<T, shelf::Error>
        where
            T: serde::de::DeserializeOwned,
        {
            Err(shelf::Error::new(ErrorKind::IO, "offline"))
        }
    }

    #[derive(Default)]
    struct PanickingClient;

    impl Client for PanickingClient {
        fn get_json<T>(&self, _: &str) -> Result<T, shelf::Error>
        where
            T: serde::de::DeserializeOwned,
        {
            panic!("TLS backend cannot be initialized")
        }
    }

    fn ids<C: Client + 'static>(app: &App<C>) -> Vec<&str> {
        app.controller()
            .results()
            .iter()
            .map(|r| r.id.as_str())
            .collect()
    }

    #[test]
    fn enter_searches_and_settles() {
        let mut app = App::<TwoBooksClient>::new(shelf::GOOGLE_BOOKS_URL.to_owned());
        app.dispatch(Event::QueryChanged("code".to_owned()));
        app.dispatch(Event::Key(Key::Enter));
        assert!(app.controller().is_searching());

        app.wait_until_idle().unwrap();

        assert!(!app.controller().is_searching());
        assert_eq!(vec!["A", "B"], ids(&app));
    }

    #[test]
    fn clicking_a_card_toggles_only_that_card() {
        let mut app = App::<TwoBooksClient>::new(shelf::GOOGLE_BOOKS_URL.to_owned());
        app.dispatch(Event::SearchClicked);
        app.wait_until_idle().unwrap();

        app.dispatch(Event::CardClicked("B".to_owned()));

        assert!(app.controller().is_expanded("B"));
        assert!(!app.controller().is_expanded("A"));
    }

    #[test]
    fn failed_search_settles_without_results() {
        let mut app = App::<OfflineClient>::new(shelf::GOOGLE_BOOKS_URL.to_owned());
        app.dispatch(Event::SearchClicked);
        app.wait_until_idle().unwrap();

        assert!(!app.controller().is_searching());
        assert!(app.controller().results().is_empty());
    }

    #[test]
    fn header_click_starts_over() {
        let mut app = App::<TwoBooksClient>::new(shelf::GOOGLE_BOOKS_URL.to_owned());
        app.dispatch(Event::QueryChanged("code".to_owned()));
        app.dispatch(Event::SearchClicked);
        app.wait_until_idle().unwrap();

        app.dispatch(Event::HeaderClicked);

        assert_eq!("", app.controller().query());
        assert!(app.controller().results().is_empty());
        assert!(!app.controller().is_searching());
        // nothing is in flight, waiting returns straight away
        app.wait_until_idle().unwrap();
    }

    #[test]
    fn header_click_while_searching_drops_the_pending_result() {
        let mut app = App::<TwoBooksClient>::new(shelf::GOOGLE_BOOKS_URL.to_owned());
        app.dispatch(Event::SearchClicked);
        app.dispatch(Event::HeaderClicked);

        // the pending settlement is still delivered, apply it explicitly
        let event = app.receiver.recv().unwrap();
        app.dispatch(event);

        assert!(app.controller().results().is_empty());
        assert!(!app.controller().is_searching());
    }

    #[test]
    fn panicking_client_settles_as_a_failure() {
        let mut app = App::<PanickingClient>::new(shelf::GOOGLE_BOOKS_URL.to_owned());
        app.dispatch(Event::QueryChanged("code".to_owned()));
        app.dispatch(Event::SearchClicked);

        app.wait_until_idle().unwrap();

        assert!(!app.controller().is_searching());
        assert!(app.controller().results().is_empty());
        // the search button is usable again
        app.dispatch(Event::SearchClicked);
        assert!(app.controller().is_searching());
        app.wait_until_idle().unwrap();
    }
}
