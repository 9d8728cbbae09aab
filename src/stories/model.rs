use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use url::Url;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub story_id: String,
    pub title: String,
    pub author: String,
    pub url: String,
    pub username: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

impl Story {
    /// Host part of the story URL, or the raw URL when it does not parse.
    pub fn host_name(&self) -> String {
        match Url::parse(&self.url) {
            Ok(u) => match u.host_str() {
                Some(h) => h.trim_start_matches("www.").to_string(),
                None => self.url.clone(),
            },
            Err(_) => self.url.clone(),
        }
    }
}

/// Form values for a story that has not been posted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStory {
    pub title: String,
    pub author: String,
    pub url: String,
}

#[derive(Debug, Clone, Default)]
pub struct StoryList {
    pub stories: Vec<Story>,
}

impl StoryList {
    pub fn new(stories: Vec<Story>) -> Self {
        Self { stories }
    }

    pub fn find(&self, story_id: &str) -> Option<&Story> {
        self.stories.iter().find(|s| s.story_id == story_id)
    }

    pub fn prepend(&mut self, story: Story) {
        self.stories.insert(0, story);
    }

    /// Splices out the first story with this id.
    pub fn remove(&mut self, story_id: &str) -> Option<Story> {
        let idx = self.stories.iter().position(|s| s.story_id == story_id)?;
        Some(self.stories.remove(idx))
    }

    pub fn len(&self) -> usize {
        self.stories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub login_token: String,
    #[serde(default)]
    pub favorites: Vec<Story>,
    #[serde(default)]
    pub own_stories: Vec<Story>,
}

impl User {
    pub fn is_favorite(&self, story_id: &str) -> bool {
        self.favorites.iter().any(|s| s.story_id == story_id)
    }

    pub fn is_own(&self, story: &Story) -> bool {
        story.username == self.username
    }

    pub fn favorite_index(&self, story_id: &str) -> Option<usize> {
        self.favorites.iter().position(|s| s.story_id == story_id)
    }

    /// Returns false when the story was already a favorite.
    pub fn push_favorite(&mut self, story: Story) -> bool {
        if self.is_favorite(&story.story_id) {
            return false;
        }
        self.favorites.push(story);
        true
    }

    pub fn remove_favorite(&mut self, story_id: &str) -> Option<Story> {
        let idx = self.favorite_index(story_id)?;
        Some(self.favorites.remove(idx))
    }

    pub fn remove_own_story(&mut self, story_id: &str) -> Option<Story> {
        let idx = self.own_stories.iter().position(|s| s.story_id == story_id)?;
        Some(self.own_stories.remove(idx))
    }
}

#[cfg(test)]
pub(crate) fn story(id: &str, username: &str) -> Story {
    Story {
        story_id: id.to_string(),
        title: format!("Story {id}"),
        author: "Ada".to_string(),
        url: format!("https://www.example.com/{id}"),
        username: username.to_string(),
        created_at: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_name_strips_scheme_path_and_www() {
        let s = story("a1", "bob");
        assert_eq!(s.host_name(), "example.com");
    }

    #[test]
    fn host_name_falls_back_to_raw_url() {
        let mut s = story("a1", "bob");
        s.url = "not a url".into();
        assert_eq!(s.host_name(), "not a url");
    }

    #[test]
    fn story_decodes_api_json() {
        let json = r#"{
            "storyId": "5081e46e-3143-4c0c-bbf4-c22eb11eb3f5",
            "title": "Check out my awesome site",
            "author": "Test User",
            "url": "https://example.org/post",
            "username": "test",
            "createdAt": "2021-03-08T20:12:06.409Z"
        }"#;
        let s: Story = serde_json::from_str(json).unwrap();
        assert_eq!(s.story_id, "5081e46e-3143-4c0c-bbf4-c22eb11eb3f5");
        assert_eq!(s.username, "test");
        assert_eq!(s.created_at.unwrap().year(), 2021);
    }

    #[test]
    fn remove_missing_story_is_noop() {
        let mut list = StoryList::new(vec![story("a", "x"), story("b", "x")]);
        assert!(list.remove("zzz").is_none());
        assert_eq!(list.len(), 2);
        assert_eq!(list.remove("a").unwrap().story_id, "a");
        assert_eq!(list.stories[0].story_id, "b");
    }

    #[test]
    fn prepend_inserts_at_front() {
        let mut list = StoryList::new(vec![story("a", "x")]);
        list.prepend(story("b", "x"));
        assert_eq!(list.stories[0].story_id, "b");
    }

    #[test]
    fn favorites_do_not_duplicate() {
        let mut u = User {
            username: "x".into(),
            name: String::new(),
            login_token: "t".into(),
            favorites: vec![],
            own_stories: vec![],
        };
        assert!(u.push_favorite(story("a", "y")));
        assert!(!u.push_favorite(story("a", "y")));
        assert_eq!(u.favorites.len(), 1);
        assert_eq!(u.favorite_index("a"), Some(0));
        assert!(u.remove_favorite("b").is_none());
        assert!(u.remove_favorite("a").is_some());
        assert!(!u.is_favorite("a"));
    }
}
