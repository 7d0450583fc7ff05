use crate::catalog::{Catalog, StaticCatalog};
use crate::config::Config;
use crate::editor::{Editor, EditorSettings, Submission, Toggle};
use crate::model::{UniversityId, UserId};
use crate::store::Store;
use crate::viewer::{Profile, view_profile};
use clap::{Parser, Subcommand};
use eyre::{Error, bail};
use std::str::FromStr;
use tracing::{info, warn};

mod catalog;
mod checks;
mod config;
mod display;
mod editor;
mod model;
mod store;
mod viewer;

#[derive(Parser)]
#[command(version, about)]
struct Options {
    /// Use FILE instead of unipick.toml
    #[arg(short, long, value_name = "FILE", default_value = "unipick.toml")]
    config: String,
    /// Do not write back changes to the store
    #[arg(short = 'n', long)]
    dry_run: bool,
    /// Set verbosity level
    #[arg(short, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show a user's profile and ranked applications
    Profile {
        user: String,
        /// Look at the profile as this user
        #[arg(long = "as", value_name = "VIEWER")]
        viewer: Option<String>,
    },
    /// Search universities outside the base catalog
    Search { query: String },
    /// Edit a user's application list, then submit it
    Edit {
        user: String,
        /// `toggle:<UNIVERSITY>` or `add:<QUERY>`, applied in order
        actions: Vec<Action>,
    },
}

#[derive(Clone, Debug)]
enum Action {
    Toggle(UniversityId),
    Add(String),
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some(("toggle", id)) if !id.is_empty() => Ok(Action::Toggle(id.into())),
            Some(("add", query)) if !query.is_empty() => Ok(Action::Add(query.to_owned())),
            _ => bail!("unknown action {s:?}, expected toggle:<UNIVERSITY> or add:<QUERY>"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    color_eyre::install()?;
    let options = Options::parse();
    let level = match options.verbose {
        0 => tracing::Level::ERROR,
        1 => tracing::Level::WARN,
        2 => tracing::Level::INFO,
        3 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    let config = Config::load(&options.config)?;
    let catalog = StaticCatalog::from_config(&config)?;
    let mut store = Store::from_config(&config).await?;
    match options.command {
        Command::Profile { user, viewer } => {
            let viewer = viewer.map(UserId);
            show_profile(&mut store, &UserId(user), viewer.as_ref()).await?;
        }
        Command::Search { query } => {
            let results = catalog.search(&query).await?;
            display::display_search_results(&query, &results);
        }
        Command::Edit { user, actions } => {
            let settings = EditorSettings::from_config(&config)?;
            edit(&mut store, &catalog, UserId(user), &actions, settings, options.dry_run).await?;
        }
    }
    Ok(())
}

async fn show_profile(
    store: &mut Store,
    user: &UserId,
    viewer: Option<&UserId>,
) -> Result<(), Error> {
    match view_profile(store, user, viewer).await? {
        Profile::Found(view) => display::display_profile(&view),
        Profile::NotFound => display::display_not_found(),
    }
    Ok(())
}

async fn edit(
    store: &mut Store,
    catalog: &StaticCatalog,
    user: UserId,
    actions: &[Action],
    settings: EditorSettings,
    dry_run: bool,
) -> Result<(), Error> {
    let Some(mut editor) = Editor::open(store, catalog, &user, settings).await? else {
        display::display_not_found();
        return Ok(());
    };
    for action in actions {
        match action {
            Action::Toggle(id) => match editor.toggle(id) {
                None => warn!(university = %id, "editing is closed"),
                Some(Toggle::Unknown) => warn!(university = %id, "unknown university"),
                Some(Toggle::Full) => warn!(university = %id, "application list is full"),
                Some(_) => (),
            },
            Action::Add(query) => {
                let results = editor.search(query).await;
                display::display_search_results(query, results);
                if editor.select_result(0).is_none() {
                    continue;
                }
                if let Some(staged) = editor.search_session().staged() {
                    println!("Adding {staged}");
                }
                if editor.confirm_add().is_none() {
                    warn!(query = %query, "university could not be added");
                    editor.cancel_add();
                }
            }
        }
    }
    display::display_editor(&editor);
    if dry_run {
        info!("dry run, application list not submitted");
        return Ok(());
    }
    let submission = editor.submit().await;
    if let Some(notice) = editor.notice() {
        println!("{notice}");
    }
    match submission {
        Submission::Saved {
            profile,
            redirect_after,
        } => {
            drop(editor);
            tokio::time::sleep(redirect_after).await;
            println!();
            show_profile(store, &profile, Some(&user)).await?;
        }
        Submission::Failed => bail!("application list could not be updated"),
        Submission::Skipped(reason) => info!(?reason, "nothing submitted"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_actions() {
        assert!(matches!(
            "toggle:mit".parse::<Action>().unwrap(),
            Action::Toggle(id) if id.as_str() == "mit"
        ));
        assert!(matches!(
            "add:seoul national".parse::<Action>().unwrap(),
            Action::Add(q) if q == "seoul national"
        ));
        assert!("toggle:".parse::<Action>().is_err());
        assert!("remove:mit".parse::<Action>().is_err());
        assert!("mit".parse::<Action>().is_err());
    }

    #[test]
    fn test_cli() {
        let options = Options::try_parse_from([
            "unipick", "-n", "-vv", "edit", "u1", "toggle:a", "add:stanford",
        ])
        .unwrap();
        assert!(options.dry_run);
        assert_eq!(options.verbose, 2);
        match options.command {
            Command::Edit { user, actions } => {
                assert_eq!(user, "u1");
                assert_eq!(actions.len(), 2);
            }
            _ => panic!("expected edit command"),
        }
    }
}
