use async_trait::async_trait;

use super::error::ApiResult;
use super::model::{NewStory, Story, User};

/// Backend operations the story page depends on.
#[async_trait]
pub trait StoryApi: Send + Sync {
    async fn get_stories(&self) -> ApiResult<Vec<Story>>;

    async fn add_story(&self, user: &User, story: &NewStory) -> ApiResult<Story>;

    async fn delete_story(&self, user: &User, story_id: &str) -> ApiResult<()>;

    async fn add_favorite(&self, user: &User, story_id: &str) -> ApiResult<()>;

    async fn remove_favorite(&self, user: &User, story_id: &str) -> ApiResult<()>;

    async fn login(&self, username: &str, password: &str) -> ApiResult<User>;

    async fn signup(&self, username: &str, password: &str, name: &str) -> ApiResult<User>;

    /// Rebuilds a user from a stored token.
    async fn get_user(&self, username: &str, token: &str) -> ApiResult<User>;
}
