use console::style;

use super::model::{Story, User};
use crate::util::sanitize::sanitize_for_terminal;

/// One rendered list item.
#[derive(Debug, Clone, PartialEq)]
pub struct StoryRow {
    pub story_id: String,
    pub url: String,
    pub title: String,
    pub host: String,
    pub author: String,
    pub username: String,
    /// `None` when nobody is logged in, otherwise whether the star is filled.
    pub star: Option<bool>,
    pub deletable: bool,
}

pub fn story_row(story: &Story, user: Option<&User>) -> StoryRow {
    StoryRow {
        story_id: story.story_id.clone(),
        url: story.url.clone(),
        title: sanitize_for_terminal(&story.title),
        host: sanitize_for_terminal(&story.host_name()),
        author: sanitize_for_terminal(&story.author),
        username: sanitize_for_terminal(&story.username),
        star: user.map(|u| u.is_favorite(&story.story_id)),
        deletable: user.is_some_and(|u| u.is_own(story)),
    }
}

impl StoryRow {
    pub fn label(&self) -> String {
        let star = match self.star {
            Some(true) => format!("{} ", style("★").yellow()),
            Some(false) => "☆ ".to_string(),
            None => String::new(),
        };
        let mine = if self.deletable {
            format!(" {}", style("[mine]").cyan())
        } else {
            String::new()
        };
        format!(
            "{}{} {} {} {}{}",
            star,
            self.title,
            style(format!("({})", self.host)).dim(),
            style(format!("by {}", self.author)).dim(),
            style(format!("posted by {}", self.username)).dim(),
            mine,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stories::model::story;

    fn user(name: &str, favorites: Vec<Story>) -> User {
        User {
            username: name.into(),
            name: String::new(),
            login_token: "t".into(),
            favorites,
            own_stories: vec![],
        }
    }

    #[test]
    fn row_without_user_has_no_star() {
        let row = story_row(&story("a", "bob"), None);
        assert_eq!(row.star, None);
        assert!(!row.deletable);
        assert_eq!(row.host, "example.com");
        assert!(!row.label().contains('☆'));
    }

    #[test]
    fn row_reflects_favorite_and_ownership() {
        let s = story("a", "bob");
        let u = user("bob", vec![s.clone()]);
        let row = story_row(&s, Some(&u));
        assert_eq!(row.star, Some(true));
        assert!(row.deletable);

        let other = user("carol", vec![]);
        let row = story_row(&s, Some(&other));
        assert_eq!(row.star, Some(false));
        assert!(!row.deletable);
        assert!(row.label().starts_with('☆'));
    }

    #[test]
    fn row_sanitizes_title() {
        let mut s = story("a", "bob");
        s.title = "\x1b[31mred\x1b[0m\nline".into();
        let row = story_row(&s, None);
        assert_eq!(row.title, "red line");
    }
}
