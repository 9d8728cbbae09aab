use tracing::{debug, info};

use super::api::StoryApi;
use super::error::{ApiError, ApiResult};
use super::model::{NewStory, Story, StoryList, User};
use super::render::{StoryRow, story_row};

/// Which star action a toggle resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteChange {
    Added,
    Removed,
}

/// In-memory story list plus the current user, kept in step with the backend.
///
/// Every action mutates local state first and then issues the matching API
/// call. A failed call is returned to the caller but the local change stays.
pub struct StoryPage<A: StoryApi> {
    api: A,
    list: StoryList,
    user: Option<User>,
}

impl<A: StoryApi> StoryPage<A> {
    pub async fn load(api: A, user: Option<User>) -> ApiResult<Self> {
        let stories = api.get_stories().await?;
        info!(count = stories.len(), "loaded stories");
        Ok(Self {
            api,
            list: StoryList::new(stories),
            user,
        })
    }

    pub async fn reload(&mut self) -> ApiResult<()> {
        self.list = StoryList::new(self.api.get_stories().await?);
        Ok(())
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn stories(&self) -> &StoryList {
        &self.list
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn set_user(&mut self, user: Option<User>) {
        self.user = user;
    }

    pub fn rows(&self) -> Vec<StoryRow> {
        self.rows_for(&self.list.stories)
    }

    pub fn favorite_rows(&self) -> Vec<StoryRow> {
        match &self.user {
            Some(u) => self.rows_for(&u.favorites),
            None => Vec::new(),
        }
    }

    pub fn own_rows(&self) -> Vec<StoryRow> {
        match &self.user {
            Some(u) => self.rows_for(&u.own_stories),
            None => Vec::new(),
        }
    }

    fn rows_for(&self, stories: &[Story]) -> Vec<StoryRow> {
        stories.iter().map(|s| story_row(s, self.user.as_ref())).collect()
    }

    pub fn find_story(&self, story_id: &str) -> Option<&Story> {
        self.list.find(story_id).or_else(|| {
            let u = self.user.as_ref()?;
            u.favorites
                .iter()
                .chain(u.own_stories.iter())
                .find(|s| s.story_id == story_id)
        })
    }

    pub fn favorite_index(&self, story_id: &str) -> Option<usize> {
        self.user.as_ref()?.favorite_index(story_id)
    }

    pub async fn submit_story(&mut self, new: NewStory) -> ApiResult<Story> {
        let user = self.user.as_mut().ok_or(ApiError::NotLoggedIn)?;
        let story = self.api.add_story(user, &new).await?;
        info!(story_id = %story.story_id, "story submitted");
        self.list.prepend(story.clone());
        user.own_stories.insert(0, story.clone());
        Ok(story)
    }

    pub async fn favorite(&mut self, story_id: &str) -> ApiResult<()> {
        if self.user.is_none() {
            return Err(ApiError::NotLoggedIn);
        }
        let story = self
            .find_story(story_id)
            .cloned()
            .ok_or_else(|| ApiError::UnknownStory(story_id.to_string()))?;
        let user = self.user.as_mut().ok_or(ApiError::NotLoggedIn)?;
        if !user.push_favorite(story) {
            debug!(story_id, "already a favorite");
        }
        self.api.add_favorite(user, story_id).await
    }

    pub async fn unfavorite(&mut self, story_id: &str) -> ApiResult<()> {
        let user = self.user.as_mut().ok_or(ApiError::NotLoggedIn)?;
        if user.remove_favorite(story_id).is_none() {
            debug!(story_id, "not a favorite");
        }
        self.api.remove_favorite(user, story_id).await
    }

    pub async fn toggle_favorite(&mut self, story_id: &str) -> ApiResult<FavoriteChange> {
        let favorited = self
            .user
            .as_ref()
            .ok_or(ApiError::NotLoggedIn)?
            .is_favorite(story_id);
        if favorited {
            self.unfavorite(story_id).await?;
            Ok(FavoriteChange::Removed)
        } else {
            self.favorite(story_id).await?;
            Ok(FavoriteChange::Added)
        }
    }

    pub async fn delete_story(&mut self, story_id: &str) -> ApiResult<()> {
        let user = self.user.as_mut().ok_or(ApiError::NotLoggedIn)?;
        if self.list.remove(story_id).is_none() {
            debug!(story_id, "story not in list");
        }
        user.remove_favorite(story_id);
        user.remove_own_story(story_id);
        self.api.delete_story(user, story_id).await?;
        info!(story_id, "story deleted");
        Ok(())
    }
}
