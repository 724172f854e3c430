use dialoguer::Input;
use eyre::{eyre, Context, Result};
use log::trace;
use shelf::{
    api::Client,
    view::{Page, HEADER, PLACEHOLDER},
    Key, SearchController,
};

use crate::app::{App, Event};

/// Something the user can do from the menu.
#[derive(Clone, Debug, PartialEq, Eq)]
enum MenuAction {
    EditQuery,
    Search,
    Card(String),
    Header,
    Quit,
}

/// Runs an interactive session until the user quits.
pub fn browse<C: Client + 'static>(app: &mut App<C>) -> Result<()> {
    loop {
        println!("{}", Page::new(app.controller()));

        if app.controller().is_searching() {
            app.wait_until_idle()?;
            continue;
        }

        let mut menu = menu(app.controller());
        let labels: Vec<_> = menu.iter().map(|(label, _)| label.as_str()).collect();
        let action = match user_select_opt("Choose an action", &labels)? {
            Some(index) => menu.swap_remove(index).1,
            None => MenuAction::Quit,
        };

        trace!("User chose {action:?}");
        match action {
            MenuAction::EditQuery => {
                let query = user_input(PLACEHOLDER, app.controller().query())?;
                app.dispatch(Event::QueryChanged(query));
                // the query was submitted with enter
                app.dispatch(Event::Key(Key::Enter));
            }
            MenuAction::Search => app.dispatch(Event::SearchClicked),
            MenuAction::Card(id) => app.dispatch(Event::CardClicked(id)),
            MenuAction::Header => app.dispatch(Event::HeaderClicked),
            MenuAction::Quit => return Ok(()),
        }
    }
}

fn menu(controller: &SearchController) -> Vec<(String, MenuAction)> {
    let query = match controller.query() {
        "" => PLACEHOLDER,
        query => query,
    };
    let button = Page::new(controller).button_label();

    let mut items = vec![
        (format!("Edit query: {query}"), MenuAction::EditQuery),
        (format!("[{button}]"), MenuAction::Search),
    ];
    items.extend(
        controller
            .cards()
            .enumerate()
            .map(|(n, card)| {
                (
                    format!("[{}] {}", n + 1, card.label()),
                    MenuAction::Card(card.record().id.clone()),
                )
            }),
    );
    items.push((format!("{HEADER} (start over)"), MenuAction::Header));
    items.push(("Quit".to_owned(), MenuAction::Quit));
    items
}

fn user_select_opt<S: ToString>(prompt: &str, items: &[S]) -> Result<Option<usize>> {
    dialoguer::Select::with_theme(&dialoguer::theme::ColorfulTheme::default())
        .with_prompt(prompt)
        .default(0)
        .items(items)
        .interact_opt()
        .wrap_err_with(|| eyre!("User selection cancelled"))
}

fn user_input(prompt: &str, initial: &str) -> Result<String> {
    Input::<String>::new()
        .with_prompt(prompt)
        .with_initial_text(initial)
        .allow_empty(true)
        .interact_text()
        .wrap_err_with(|| eyre!("User input cancelled"))
}
