use crate::{
    app::{App, Event},
    interact,
};

use shelf::{view::Page, HttpClient, Key};

use clap::Subcommand;
use log::trace;

#[derive(Subcommand)]
#[non_exhaustive]
pub enum Commands {
    /// Search for books once and print the results
    ///
    /// A failed search is logged and the results are shown as empty, an empty query is still
    /// sent to the API.
    Search {
        /// The words to search for
        query: Vec<String>,

        /// Show the publication date and description of every book
        #[clap(short, long)]
        expand: bool,
    },

    /// Search for books interactively
    ///
    /// Books found are shown as cards which can be expanded to show their publication date and
    /// description.
    Browse {
        /// The words to search for when the session starts
        query: Vec<String>,
    },
}

impl Commands {
    pub fn execute(self, endpoint: String) -> Result<String, Box<dyn std::error::Error>> {
        let mut app = App::<HttpClient>::new(endpoint);
        match self {
            Commands::Search { query, expand } => {
                app.dispatch(Event::QueryChanged(query.join(" ")));
                app.dispatch(Event::Key(Key::Enter));
                trace!("Waiting for the search to settle..");
                app.wait_until_idle()?;

                let page = Page::new(app.controller());
                let page = if expand { page.expand_all() } else { page };
                Ok(page.to_string())
            }
            Commands::Browse { query } => {
                if !query.is_empty() {
                    app.dispatch(Event::QueryChanged(query.join(" ")));
                    app.dispatch(Event::Key(Key::Enter));
                }
                interact::browse(&mut app)?;
                Ok("Goodbye!".to_owned())
            }
        }
    }
}
