use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::json;

use crate::http::{Client, HttpError, Method, RequestOptions};
use crate::models::{Comment, Post, Profile, UserSummary};

/// Shared flag flipped when the view that issued a request goes away.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), HttpError> {
        if self.is_cancelled() {
            Err(HttpError::Cancelled)
        } else {
            Ok(())
        }
    }
}

pub struct ContentApi {
    client: Arc<Client>,
}

impl ContentApi {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    /// Profile for a route. Dropped with `Cancelled` if the route changed while
    /// the request was out.
    pub fn fetch_profile(&self, username: &str, cancel: &CancelToken) -> Result<Profile, HttpError> {
        cancel.check()?;
        let profile = self.client.get_json(&format!("user/{}/", username))?;
        cancel.check()?;
        Ok(profile)
    }

    pub fn fetch_post(&self, id: i64, cancel: &CancelToken) -> Result<Post, HttpError> {
        cancel.check()?;
        let post = self.client.get_json(&format!("post/{}/", id))?;
        cancel.check()?;
        Ok(post)
    }

    pub fn followers(&self, username: &str) -> Result<Vec<UserSummary>, HttpError> {
        self.client.get_json(&format!("followers/{}/", username))
    }

    pub fn following(&self, username: &str) -> Result<Vec<UserSummary>, HttpError> {
        self.client.get_json(&format!("following/{}/", username))
    }

    pub fn search_users(&self, query: &str) -> Result<Vec<UserSummary>, HttpError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        self.client
            .send(
                Method::GET,
                "search-users/",
                None,
                RequestOptions {
                    query: vec![("q".into(), query.to_string())],
                    ..Default::default()
                },
            )?
            .json()
    }

    /// Returns the created post, ready to be prepended to a feed.
    pub fn create_post(&self, text: &str) -> Result<Post, HttpError> {
        self.client.ensure_csrf()?;
        self.client
            .send_json(Method::POST, "create-post/", Some(json!({ "text": text.trim() })))
    }

    pub fn create_comment(&self, post_id: i64, text: &str) -> Result<Comment, HttpError> {
        self.client.ensure_csrf()?;
        self.client.send_json(
            Method::POST,
            "create-comment/",
            Some(json!({ "post_id": post_id, "text": text.trim() })),
        )
    }
}
