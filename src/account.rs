use anyhow::Result;
use tracing::{info, warn};

use crate::session::{Session, SessionStore};
use crate::stories::{ApiError, StoryApi, StoryPage, User};
use crate::ui::{prompt_password, prompt_text};

/// Rebuild the user from a remembered token.
///
/// Only an auth rejection (401/404) forgets the saved login; any other failure
/// starts this run logged out and keeps the file for next time.
pub async fn restore<A: StoryApi>(api: &A, store: &SessionStore) -> Option<User> {
    let session = store.load()?;
    match api.get_user(&session.username, &session.token).await {
        Ok(user) => {
            info!(username = %user.username, "session restored");
            Some(user)
        }
        Err(ApiError::Status { status: status @ (401 | 404), .. }) => {
            warn!(username = %session.username, status, "stored session rejected");
            if let Err(e) = store.clear() {
                warn!(error = %e, "failed to remove stale session");
            }
            None
        }
        Err(e) => {
            warn!(username = %session.username, error = %e, "could not restore session");
            None
        }
    }
}

pub async fn login<A: StoryApi>(page: &mut StoryPage<A>, store: &SessionStore) -> Result<String> {
    let username = prompt_text("Username")?;
    let password = prompt_password("Password")?;
    let result = page.api().login(&username, &password).await;
    finish(page, store, result, "logged in")
}

pub async fn signup<A: StoryApi>(page: &mut StoryPage<A>, store: &SessionStore) -> Result<String> {
    let name = prompt_text("Name")?;
    let username = prompt_text("Username")?;
    let password = prompt_password("Password")?;
    let result = page.api().signup(&username, &password, &name).await;
    finish(page, store, result, "account created")
}

pub fn logout<A: StoryApi>(page: &mut StoryPage<A>, store: &SessionStore) -> Result<String> {
    page.set_user(None);
    store.clear()?;
    info!("logged out");
    Ok("logged out".to_string())
}

fn finish<A: StoryApi>(
    page: &mut StoryPage<A>,
    store: &SessionStore,
    result: Result<User, ApiError>,
    verb: &str,
) -> Result<String> {
    match result {
        Ok(user) => {
            store.save(&Session::from_user(&user))?;
            info!(username = %user.username, "{verb}");
            let msg = format!("{verb} as {}", user.username);
            page.set_user(Some(user));
            Ok(msg)
        }
        Err(e) => {
            warn!(error = %e, "{verb} failed");
            Ok(format!("{verb} failed: {e}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stories::api::fake::{Call, FakeApi};

    fn saved_store(dir: &tempfile::TempDir) -> SessionStore {
        let store = SessionStore::at(dir.path().join("session.json"));
        store
            .save(&Session { username: "alice".into(), token: "tok".into() })
            .unwrap();
        store
    }

    #[tokio::test]
    async fn restore_returns_user_for_saved_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = saved_store(&dir);
        let api = FakeApi::default();
        let user = restore(&api, &store).await.unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(api.calls(), vec![Call::GetUser("alice".into())]);
        assert!(store.load().is_some());
    }

    #[tokio::test]
    async fn restore_without_session_makes_no_call() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("session.json"));
        let api = FakeApi::default();
        assert!(restore(&api, &store).await.is_none());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn server_error_keeps_saved_login() {
        let dir = tempfile::tempdir().unwrap();
        let store = saved_store(&dir);
        assert!(restore(&FakeApi::failing(503), &store).await.is_none());
        assert_eq!(store.load().map(|s| s.username).as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn rejected_token_forgets_saved_login() {
        for status in [401, 404] {
            let dir = tempfile::tempdir().unwrap();
            let store = saved_store(&dir);
            assert!(restore(&FakeApi::failing(status), &store).await.is_none());
            assert!(store.load().is_none(), "status {status} should clear the session");
        }
    }
}
