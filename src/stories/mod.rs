pub(crate) mod api;
mod error;
mod http;
mod model;
mod page;
mod render;

use anyhow::Result;
use console::style;
use tracing::warn;

use crate::config::RuntimeConfig;
use crate::open_url::open_url;
use crate::ui::{MenuChoice, confirm, prompt_menu, prompt_text};
use crate::util::sanitize::sanitize_for_terminal;

pub use api::StoryApi;
pub use error::ApiError;
pub use http::HttpStoryApi;
pub use model::{NewStory, Story, User};
pub use page::{FavoriteChange, StoryPage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    All,
    Favorites,
    Mine,
}

impl View {
    fn title(self) -> &'static str {
        match self {
            View::All => "All stories",
            View::Favorites => "Favorites",
            View::Mine => "My stories",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Stay,
    Quit,
}

/// Story list view; selecting a row opens its action menu.
pub async fn browse<A: StoryApi>(
    cfg: &RuntimeConfig,
    page: &mut StoryPage<A>,
    view: View,
) -> Result<Flow> {
    let mut status: Option<String> = None;
    loop {
        let rows = match view {
            View::All => page.rows(),
            View::Favorites => page.favorite_rows(),
            View::Mine => page.own_rows(),
        };
        let labels: Vec<String> = rows.iter().map(|r| r.label()).collect();
        let prompt = format!("{} ({}) - select a story (b = back, q = quit)", view.title(), rows.len());

        match prompt_menu(&prompt, &labels, None, cfg.header.as_deref(), status.as_deref())? {
            MenuChoice::Back => return Ok(Flow::Stay),
            MenuChoice::Quit => return Ok(Flow::Quit),
            MenuChoice::Index(i) => {
                let Some(row) = rows.get(i) else { continue };
                match story_actions(cfg, page, &row.story_id, &row.title).await? {
                    (Flow::Quit, _) => return Ok(Flow::Quit),
                    (Flow::Stay, s) => status = s,
                }
            }
        }
    }
}

async fn story_actions<A: StoryApi>(
    cfg: &RuntimeConfig,
    page: &mut StoryPage<A>,
    story_id: &str,
    title: &str,
) -> Result<(Flow, Option<String>)> {
    enum Action {
        Open,
        ToggleFavorite,
        Delete,
    }

    let mut actions = vec![(Action::Open, "Open in browser".to_string())];
    if let Some(user) = page.user() {
        let star = if page.favorite_index(story_id).is_some() { "Unfavorite" } else { "Favorite" };
        actions.push((Action::ToggleFavorite, star.to_string()));
        if page.find_story(story_id).is_some_and(|s| user.is_own(s)) {
            actions.push((Action::Delete, "Delete".to_string()));
        }
    }
    let labels: Vec<&str> = actions.iter().map(|(_, l)| l.as_str()).collect();

    let idx = match prompt_menu(title, &labels, Some(0), cfg.header.as_deref(), None)? {
        MenuChoice::Back => return Ok((Flow::Stay, None)),
        MenuChoice::Quit => return Ok((Flow::Quit, None)),
        MenuChoice::Index(i) => i,
    };

    let status = match actions.get(idx).map(|(a, _)| a) {
        Some(Action::Open) => {
            let url = page.find_story(story_id).map(|s| s.url.clone());
            match url {
                Some(u) => open_url(&u, cfg.open_command.as_deref())
                    .err()
                    .map(|e| format!("could not open link: {e}")),
                None => None,
            }
        }
        Some(Action::ToggleFavorite) => Some(match page.toggle_favorite(story_id).await {
            Ok(FavoriteChange::Added) => format!("{} added to favorites", style("★").yellow()),
            Ok(FavoriteChange::Removed) => "removed from favorites".to_string(),
            Err(e) => failed("favorite", story_id, e),
        }),
        Some(Action::Delete) => {
            if !confirm(&format!("Delete \"{title}\"?"))? {
                return Ok((Flow::Stay, None));
            }
            Some(match page.delete_story(story_id).await {
                Ok(()) => "story deleted".to_string(),
                Err(e) => failed("delete", story_id, e),
            })
        }
        None => None,
    };
    Ok((Flow::Stay, status))
}

/// Submit form. Returns a status line for the caller's next redraw.
pub async fn submit<A: StoryApi>(page: &mut StoryPage<A>) -> Result<String> {
    if page.user().is_none() {
        return Ok(ApiError::NotLoggedIn.to_string());
    }
    println!("{}", style("Submit a story").bold());
    let new = NewStory {
        title: prompt_text("Title")?,
        author: prompt_text("Author")?,
        url: prompt_text("URL")?,
    };
    Ok(match page.submit_story(new).await {
        Ok(story) => posted_status(&story),
        Err(e) => failed("submit", "-", e),
    })
}

fn posted_status(story: &Story) -> String {
    format!("posted \"{}\"", sanitize_for_terminal(&story.title))
}

fn failed(action: &str, story_id: &str, err: ApiError) -> String {
    warn!(action, story_id, error = %err, "story action failed");
    format!("{action} failed: {err}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posted_status_sanitizes_server_title() {
        let mut s = model::story("a", "bob");
        s.title = "\x1b[2Jgotcha\nnow".into();
        assert_eq!(posted_status(&s), "posted \"gotcha now\"");
    }
}
