use std::marker::PhantomData;
use std::sync::Arc;

use crossbeam_channel::Sender;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::http::{Client, HttpError, Method, RequestOptions};
use crate::models::{
    Comment, Counters, EditReply, FollowReply, Identified, LikeReply, Post, User, UserPatch,
    UserSummary,
};
use crate::optimistic::{Optimistic, Settlement, Ticket};
use crate::pagination::Pager;
use crate::session;

pub const DEFAULT_ROSTER_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Post,
    Comment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemRef {
    pub kind: ItemKind,
    pub id: i64,
}

impl ItemRef {
    pub fn post(id: i64) -> Self {
        Self {
            kind: ItemKind::Post,
            id,
        }
    }

    pub fn comment(id: i64) -> Self {
        Self {
            kind: ItemKind::Comment,
            id,
        }
    }

    fn like_path(&self) -> &'static str {
        match self.kind {
            ItemKind::Post => "like/",
            ItemKind::Comment => "like-comment/",
        }
    }

    fn likers_path(&self) -> String {
        match self.kind {
            ItemKind::Post => format!("likers/{}/", self.id),
            ItemKind::Comment => format!("comment-likers/{}/", self.id),
        }
    }

    fn edit_path(&self) -> String {
        match self.kind {
            ItemKind::Post => format!("edit-post/{}/", self.id),
            ItemKind::Comment => format!("edit-comment/{}/", self.id),
        }
    }

    fn delete_path(&self) -> String {
        match self.kind {
            ItemKind::Post => format!("delete-post/{}/", self.id),
            ItemKind::Comment => format!("delete-comment/{}/", self.id),
        }
    }
}

/// Transient message for the toast queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

/// A remote commit detached from the state it belongs to, so it can run on a
/// worker thread while the UI keeps the ticket.
pub struct Commit<R> {
    client: Arc<Client>,
    method: Method,
    path: String,
    body: Option<Value>,
    _reply: PhantomData<fn() -> R>,
}

impl<R: DeserializeOwned> Commit<R> {
    fn new(client: Arc<Client>, method: Method, path: String, body: Option<Value>) -> Self {
        Self {
            client,
            method,
            path,
            body,
            _reply: PhantomData,
        }
    }

    pub fn run(self) -> Result<R, HttpError> {
        self.client.ensure_csrf()?;
        self.client.send_json(self.method, &self.path, self.body)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeState {
    pub liked: bool,
    pub like_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditState {
    pub text: String,
    pub is_edited: bool,
}

fn toggled(state: &LikeState) -> LikeState {
    let liked = !state.liked;
    LikeState {
        liked,
        like_count: (state.like_count + if liked { 1 } else { -1 }).max(0),
    }
}

pub struct EditTicket {
    ticket: Ticket<EditState>,
    attempted: String,
}

/// Interaction state of one post or comment currently in view.
///
/// The liker roster lives outside the optimistic cell: it is the last list the
/// server handed out, and the acting user's entry is derived from the current
/// like state. Reloading it never invalidates an in-flight like.
pub struct ItemActions {
    client: Arc<Client>,
    item: ItemRef,
    like: Optimistic<LikeState>,
    roster: Vec<UserSummary>,
    actor: Option<UserSummary>,
    edit: Optimistic<EditState>,
    draft: Option<String>,
    roster_limit: usize,
    notices: Option<Sender<Notice>>,
}

impl ItemActions {
    pub fn new(client: Arc<Client>, item: ItemRef, like: LikeState, edit: EditState) -> Self {
        Self {
            client,
            item,
            like: Optimistic::new(like),
            roster: Vec::new(),
            actor: None,
            edit: Optimistic::new(edit),
            draft: None,
            roster_limit: DEFAULT_ROSTER_LIMIT,
            notices: None,
        }
    }

    pub fn for_post(client: Arc<Client>, post: &Post) -> Self {
        Self::new(
            client,
            ItemRef::post(post.id),
            LikeState {
                liked: post.is_liked,
                like_count: post.like_count,
            },
            EditState {
                text: post.text.clone(),
                is_edited: post.is_edited,
            },
        )
    }

    pub fn for_comment(client: Arc<Client>, comment: &Comment) -> Self {
        Self::new(
            client,
            ItemRef::comment(comment.id),
            LikeState {
                liked: comment.is_liked,
                like_count: comment.like_count,
            },
            EditState {
                text: comment.text.clone(),
                is_edited: comment.is_edited,
            },
        )
    }

    pub fn with_roster_limit(mut self, limit: usize) -> Self {
        self.roster_limit = limit.max(1);
        self
    }

    pub fn with_notices(mut self, notices: Sender<Notice>) -> Self {
        self.notices = Some(notices);
        self
    }

    /// Seeds the roster, e.g. from a payload that embeds recent likers.
    pub fn with_likers(mut self, likers: Vec<UserSummary>) -> Self {
        self.roster = likers;
        self
    }

    pub fn item(&self) -> ItemRef {
        self.item
    }

    pub fn like_state(&self) -> &LikeState {
        self.like.state()
    }

    /// Most recent likers, the acting user first while their like stands.
    pub fn likers(&self) -> Vec<UserSummary> {
        let actor = self.actor.as_ref();
        let mut likers: Vec<UserSummary> = self
            .roster
            .iter()
            .filter(|user| actor.map_or(true, |actor| actor.username != user.username))
            .cloned()
            .collect();
        if let (true, Some(actor)) = (self.like.state().liked, actor) {
            likers.insert(0, actor.clone());
        }
        likers.truncate(self.roster_limit);
        likers
    }

    pub fn edit_state(&self) -> &EditState {
        self.edit.state()
    }

    /// Text currently in the editor, `None` outside edit mode.
    pub fn draft(&self) -> Option<&str> {
        self.draft.as_deref()
    }

    fn notify(&self, notice: Notice) {
        if let Some(tx) = &self.notices {
            let _ = tx.send(notice);
        }
    }

    fn report<E: std::fmt::Display>(&self, action: &str, settlement: &Settlement<E>) {
        match settlement {
            Settlement::Confirmed => {}
            Settlement::Stale => {
                tracing::debug!(item = ?self.item, action, "ignoring superseded reply");
            }
            Settlement::RolledBack(err) => {
                tracing::warn!(item = ?self.item, action, error = %err, "rolled back");
                self.notify(Notice::Error(format!("Failed to {action}: {err}")));
            }
        }
    }

    pub fn begin_like(&mut self, actor: Option<&User>) -> (Ticket<LikeState>, Commit<LikeReply>) {
        if let Some(actor) = actor {
            self.actor = Some(UserSummary::from(actor));
        }
        let ticket = self.like.apply(toggled);
        let commit = Commit::new(
            self.client.clone(),
            Method::POST,
            self.item.like_path().to_string(),
            Some(json!({ "id": self.item.id })),
        );
        (ticket, commit)
    }

    pub fn finish_like(
        &mut self,
        ticket: Ticket<LikeState>,
        outcome: Result<LikeReply, HttpError>,
    ) -> Settlement<HttpError> {
        let settlement = self.like.settle(ticket, outcome, |state, reply| {
            if state.liked != reply.liked {
                *state = toggled(state);
            }
        });
        let action = if self.like.state().liked { "unlike" } else { "like" };
        self.report(action, &settlement);
        settlement
    }

    /// Like or unlike, committed synchronously.
    pub fn toggle_like(&mut self, actor: Option<&User>) -> Settlement<HttpError> {
        let (ticket, commit) = self.begin_like(actor);
        let outcome = commit.run();
        self.finish_like(ticket, outcome)
    }

    /// Replaces the roster with the server's list of likers. A like still in
    /// flight keeps its ticket and settles as usual.
    pub fn load_likers(&mut self) -> Result<Vec<UserSummary>, HttpError> {
        let mut likers: Vec<UserSummary> = self.client.get_json(&self.item.likers_path())?;
        likers.truncate(self.roster_limit);
        self.roster = likers;
        Ok(self.likers())
    }

    pub fn start_editing(&mut self) {
        self.draft = Some(self.edit.state().text.clone());
    }

    pub fn cancel_editing(&mut self) {
        self.draft = None;
    }

    /// Leaves edit mode and shows `text` at once. Blank or unchanged text ends
    /// editing without a request.
    pub fn begin_edit(&mut self, text: &str) -> Option<(EditTicket, Commit<EditReply>)> {
        self.draft = None;
        let text = text.trim();
        if text.is_empty() || text == self.edit.state().text {
            return None;
        }
        let attempted = text.to_string();
        let ticket = self.edit.apply(|_| EditState {
            text: attempted.clone(),
            is_edited: true,
        });
        let commit = Commit::new(
            self.client.clone(),
            Method::POST,
            self.item.edit_path(),
            Some(json!({ "text": attempted })),
        );
        Some((EditTicket { ticket, attempted }, commit))
    }

    pub fn finish_edit(
        &mut self,
        ticket: EditTicket,
        outcome: Result<EditReply, HttpError>,
    ) -> Settlement<HttpError> {
        let EditTicket { ticket, attempted } = ticket;
        let settlement = self.edit.settle(ticket, outcome, |state, reply| {
            state.text = reply.text;
            state.is_edited = state.is_edited || reply.is_edited;
        });
        if settlement.error().is_some() {
            // Back into the editor with the user's words intact.
            self.draft = Some(attempted);
        }
        self.report("save edit", &settlement);
        settlement
    }

    pub fn save_edit(&mut self, text: &str) -> Option<Settlement<HttpError>> {
        let (ticket, commit) = self.begin_edit(text)?;
        let outcome = commit.run();
        Some(self.finish_edit(ticket, outcome))
    }

    /// Deletes on the server first; the item leaves `list` only once confirmed.
    pub fn delete_from<T>(&self, list: &mut Pager<T>) -> Result<(), HttpError>
    where
        T: Identified<Id = i64>,
    {
        let outcome = self.client.ensure_csrf().and_then(|_| {
            self.client.send(
                Method::DELETE,
                &self.item.delete_path(),
                None,
                RequestOptions::default(),
            )
        });
        match outcome {
            Ok(_) => {
                list.remove(&self.item.id);
                self.notify(Notice::Info("Deleted.".into()));
                Ok(())
            }
            Err(err) => {
                tracing::warn!(item = ?self.item, error = %err, "delete failed");
                self.notify(Notice::Error(format!("Failed to delete: {err}")));
                Err(err)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowState {
    pub following: bool,
    pub follower_count: i64,
}

fn follow_toggled(state: &FollowState) -> FollowState {
    let following = !state.following;
    FollowState {
        following,
        follower_count: (state.follower_count + if following { 1 } else { -1 }).max(0),
    }
}

/// Follow button of a profile view.
pub struct FollowActions {
    client: Arc<Client>,
    username: String,
    state: Optimistic<FollowState>,
    confirmed: bool,
    session: Option<Arc<session::Controller>>,
    notices: Option<Sender<Notice>>,
}

impl FollowActions {
    pub fn new(client: Arc<Client>, username: impl Into<String>, seed: FollowState) -> Self {
        Self {
            client,
            username: username.into(),
            state: Optimistic::new(seed),
            confirmed: seed.following,
            session: None,
            notices: None,
        }
    }

    /// Confirmed changes also move the signed-in user's own following counter.
    pub fn with_session(mut self, session: Arc<session::Controller>) -> Self {
        self.session = Some(session);
        self
    }

    pub fn with_notices(mut self, notices: Sender<Notice>) -> Self {
        self.notices = Some(notices);
        self
    }

    pub fn state(&self) -> &FollowState {
        self.state.state()
    }

    pub fn begin_toggle(&mut self) -> (Ticket<FollowState>, Commit<FollowReply>) {
        let ticket = self.state.apply(follow_toggled);
        let commit = Commit::new(
            self.client.clone(),
            Method::POST,
            "follow/".to_string(),
            Some(json!({ "username": self.username })),
        );
        (ticket, commit)
    }

    pub fn finish_toggle(
        &mut self,
        ticket: Ticket<FollowState>,
        outcome: Result<FollowReply, HttpError>,
    ) -> Settlement<HttpError> {
        let settlement = self.state.settle(ticket, outcome, |state, reply| {
            if state.following != reply.following {
                *state = follow_toggled(state);
            }
        });
        match &settlement {
            Settlement::Confirmed => self.sync_own_counter(),
            Settlement::Stale => {
                tracing::debug!(username = %self.username, "ignoring superseded follow reply");
            }
            Settlement::RolledBack(err) => {
                tracing::warn!(username = %self.username, error = %err, "follow rolled back");
                if let Some(tx) = &self.notices {
                    let _ = tx.send(Notice::Error(format!(
                        "Failed to update follow for {}: {err}",
                        self.username
                    )));
                }
            }
        }
        settlement
    }

    pub fn toggle(&mut self) -> Settlement<HttpError> {
        let (ticket, commit) = self.begin_toggle();
        let outcome = commit.run();
        self.finish_toggle(ticket, outcome)
    }

    fn sync_own_counter(&mut self) {
        let following = self.state.state().following;
        if following == self.confirmed {
            return;
        }
        self.confirmed = following;
        let Some(session) = &self.session else {
            return;
        };
        let Some(me) = session.identity() else {
            return;
        };
        let delta = if following { 1 } else { -1 };
        session.update_identity_locally(UserPatch {
            counters: Some(Counters {
                following: (me.counters.following + delta).max(0),
                ..me.counters
            }),
            ..Default::default()
        });
    }
}
