use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use super::api::StoryApi;
use super::error::{ApiError, ApiResult};
use super::model::{NewStory, Story, User};

// 5 MB cap
const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

#[derive(Deserialize)]
struct StoriesEnvelope {
    stories: Vec<Story>,
}

#[derive(Deserialize)]
struct StoryEnvelope {
    story: Story,
}

#[derive(Deserialize)]
struct UserEnvelope {
    user: User,
    #[serde(default)]
    token: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

pub struct HttpStoryApi {
    client: Client,
    base_url: String,
    page_size: usize,
}

impl HttpStoryApi {
    pub fn new(base_url: &str, page_size: usize) -> ApiResult<Self> {
        let client = Client::builder()
            .user_agent("snooze-cli/0.1")
            .gzip(true)
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(20))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            page_size,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> ApiResult<T> {
        let body = self.send_raw(req).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn send_raw(&self, req: RequestBuilder) -> ApiResult<Vec<u8>> {
        let resp = req.send().await?;
        let status = resp.status();

        let mut stream = resp.bytes_stream();
        let mut buf: Vec<u8> = Vec::new();
        while let Some(chunk) = stream.next().await {
            let c = chunk?;
            if buf.len() + c.len() > MAX_BODY_BYTES {
                return Err(ApiError::TooLarge { limit: MAX_BODY_BYTES });
            }
            buf.extend_from_slice(&c);
        }

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(&buf).unwrap_or_else(|| status.to_string()),
            });
        }
        Ok(buf)
    }
}

#[async_trait]
impl StoryApi for HttpStoryApi {
    async fn get_stories(&self) -> ApiResult<Vec<Story>> {
        debug!(limit = self.page_size, "GET /stories");
        let req = self
            .client
            .get(self.endpoint("stories"))
            .query(&[("skip", 0), ("limit", self.page_size)]);
        let env: StoriesEnvelope = self.send(req).await?;
        Ok(env.stories)
    }

    async fn add_story(&self, user: &User, story: &NewStory) -> ApiResult<Story> {
        debug!(title = %story.title, "POST /stories");
        let body = json!({ "token": user.login_token, "story": story });
        let req = self.client.post(self.endpoint("stories")).json(&body);
        let env: StoryEnvelope = self.send(req).await?;
        Ok(env.story)
    }

    async fn delete_story(&self, user: &User, story_id: &str) -> ApiResult<()> {
        debug!(story_id, "DELETE /stories/{{id}}");
        let body = json!({ "token": user.login_token });
        let req = self
            .client
            .delete(self.endpoint(&format!("stories/{story_id}")))
            .json(&body);
        self.send_raw(req).await?;
        Ok(())
    }

    async fn add_favorite(&self, user: &User, story_id: &str) -> ApiResult<()> {
        debug!(story_id, user = %user.username, "POST favorite");
        let body = json!({ "token": user.login_token });
        let req = self
            .client
            .post(self.endpoint(&favorite_path(&user.username, story_id)))
            .json(&body);
        self.send_raw(req).await?;
        Ok(())
    }

    async fn remove_favorite(&self, user: &User, story_id: &str) -> ApiResult<()> {
        debug!(story_id, user = %user.username, "DELETE favorite");
        let body = json!({ "token": user.login_token });
        let req = self
            .client
            .delete(self.endpoint(&favorite_path(&user.username, story_id)))
            .json(&body);
        self.send_raw(req).await?;
        Ok(())
    }

    async fn login(&self, username: &str, password: &str) -> ApiResult<User> {
        debug!(username, "POST /login");
        let body = json!({ "user": { "username": username, "password": password } });
        let req = self.client.post(self.endpoint("login")).json(&body);
        let body = self.send_raw(req).await?;
        decode_user(&body, None)
    }

    async fn signup(&self, username: &str, password: &str, name: &str) -> ApiResult<User> {
        debug!(username, "POST /signup");
        let body = json!({
            "user": { "name": name, "username": username, "password": password }
        });
        let req = self.client.post(self.endpoint("signup")).json(&body);
        let body = self.send_raw(req).await?;
        decode_user(&body, None)
    }

    async fn get_user(&self, username: &str, token: &str) -> ApiResult<User> {
        debug!(username, "GET /users/{{username}}");
        let req = self
            .client
            .get(self.endpoint(&format!("users/{username}")))
            .query(&[("token", token)]);
        let body = self.send_raw(req).await?;
        decode_user(&body, Some(token))
    }
}

fn favorite_path(username: &str, story_id: &str) -> String {
    format!("users/{username}/favorites/{story_id}")
}

/// The token arrives beside the user object on login/signup, and is
/// already known to the caller when restoring a session.
fn decode_user(body: &[u8], known_token: Option<&str>) -> ApiResult<User> {
    let env: UserEnvelope = serde_json::from_slice(body)?;
    let mut user = env.user;
    if let Some(t) = env.token.or_else(|| known_token.map(str::to_string)) {
        user.login_token = t;
    }
    Ok(user)
}

fn error_message(body: &[u8]) -> Option<String> {
    let env: ErrorEnvelope = serde_json::from_slice(body).ok()?;
    env.error.message.or(env.error.title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_carries_token_beside_user() {
        let body = br#"{
            "user": {
                "username": "test",
                "name": "Test User",
                "createdAt": "2021-03-08T20:12:06.409Z",
                "favorites": [],
                "ownStories": [{
                    "storyId": "s1",
                    "title": "Mine",
                    "author": "Me",
                    "url": "https://example.org",
                    "username": "test"
                }]
            },
            "token": "abc.def"
        }"#;
        let user = decode_user(body, None).unwrap();
        assert_eq!(user.login_token, "abc.def");
        assert_eq!(user.own_stories.len(), 1);
        assert_eq!(user.own_stories[0].story_id, "s1");
    }

    #[test]
    fn restored_user_keeps_known_token() {
        let body = br#"{ "user": { "username": "test", "name": "T" } }"#;
        let user = decode_user(body, Some("stored")).unwrap();
        assert_eq!(user.login_token, "stored");
        assert!(user.favorites.is_empty());
    }

    #[test]
    fn error_message_prefers_message_over_title() {
        let body = br#"{ "error": { "status": 401, "title": "Unauthorized", "message": "Invalid password" } }"#;
        assert_eq!(error_message(body).as_deref(), Some("Invalid password"));
        let body = br#"{ "error": { "status": 404, "title": "Not Found" } }"#;
        assert_eq!(error_message(body).as_deref(), Some("Not Found"));
        assert_eq!(error_message(b"<html>"), None);
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let api = HttpStoryApi::new("https://api.example.com/", 25).unwrap();
        assert_eq!(api.endpoint("/stories"), "https://api.example.com/stories");
        assert_eq!(
            api.endpoint(&favorite_path("bob", "s1")),
            "https://api.example.com/users/bob/favorites/s1"
        );
    }

    #[test]
    fn stories_envelope_decodes() {
        let body = br#"{ "stories": [
            { "storyId": "a", "title": "A", "author": "x", "url": "https://a.io", "username": "u" },
            { "storyId": "b", "title": "B", "author": "y", "url": "https://b.io", "username": "v" }
        ] }"#;
        let env: StoriesEnvelope = serde_json::from_slice(body).unwrap();
        assert_eq!(env.stories.len(), 2);
        assert_eq!(env.stories[1].story_id, "b");
    }
}
