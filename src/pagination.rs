use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::http::{Client, HttpError};
use crate::models::{Identified, Page};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cursor {
    /// Nothing loaded yet for the current context.
    Start,
    Next(String),
    /// Terminal: the backend reported no further pages.
    Exhausted,
}

/// Ticket for one in-flight page load, tagged with the list context it was
/// issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    context: u64,
    cursor: Option<String>,
}

impl PageRequest {
    pub fn context(&self) -> u64 {
        self.context
    }

    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome<E> {
    Appended(usize),
    Failed(E),
    /// The list was reset after the request went out; the response was dropped.
    Stale,
}

pub trait PageSource<T>: Send + Sync {
    fn fetch(&self, cursor: Option<&str>) -> Result<Page<T>, HttpError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    Feed,
    Discover,
    UserPosts(String),
    Comments(i64),
}

impl Listing {
    pub fn path(&self) -> String {
        match self {
            Listing::Feed => "feed/".to_string(),
            Listing::Discover => "discover/".to_string(),
            Listing::UserPosts(username) => format!("posts/{}/", username),
            Listing::Comments(post_id) => format!("comments/{}/", post_id),
        }
    }
}

/// Fetches pages of one listing endpoint. A cursor is the `next` URL the
/// backend handed out and is requested verbatim.
pub struct ListingSource<T> {
    client: Arc<Client>,
    listing: Listing,
    _item: PhantomData<fn() -> T>,
}

impl<T> ListingSource<T> {
    pub fn new(client: Arc<Client>, listing: Listing) -> Self {
        Self {
            client,
            listing,
            _item: PhantomData,
        }
    }

    pub fn listing(&self) -> &Listing {
        &self.listing
    }
}

impl<T: DeserializeOwned> PageSource<T> for ListingSource<T> {
    fn fetch(&self, cursor: Option<&str>) -> Result<Page<T>, HttpError> {
        match cursor {
            Some(next) => self.client.get_json(next),
            None => self.client.get_json(&self.listing.path()),
        }
    }
}

#[derive(Debug, Clone)]
struct Anchor<Id> {
    target: Option<Id>,
    visible: bool,
}

impl<Id> Anchor<Id> {
    fn detached() -> Self {
        Self {
            target: None,
            visible: false,
        }
    }
}

/// Append-only list fed by cursor pages, with an edge-triggered load anchor on
/// its last item.
#[derive(Debug, Clone)]
pub struct Pager<T: Identified> {
    items: Vec<T>,
    cursor: Cursor,
    loading: bool,
    context: u64,
    anchor: Anchor<T::Id>,
}

impl<T: Identified> Default for Pager<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Identified> Pager<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            cursor: Cursor::Start,
            loading: false,
            context: 0,
            anchor: Anchor::detached(),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut [T] {
        &mut self.items
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor == Cursor::Exhausted
    }

    pub fn context(&self) -> u64 {
        self.context
    }

    /// Item the visibility trigger is currently attached to.
    pub fn anchor(&self) -> Option<&T::Id> {
        self.anchor.target.as_ref()
    }

    /// Marks a load as in flight, or returns `None` when one is already running
    /// or the list is exhausted.
    pub fn begin_load(&mut self) -> Option<PageRequest> {
        if self.loading {
            return None;
        }
        let cursor = match &self.cursor {
            Cursor::Exhausted => return None,
            Cursor::Start => None,
            Cursor::Next(token) => Some(token.clone()),
        };
        self.loading = true;
        Some(PageRequest {
            context: self.context,
            cursor,
        })
    }

    pub fn complete_load<E>(
        &mut self,
        request: PageRequest,
        result: Result<Page<T>, E>,
    ) -> LoadOutcome<E> {
        if request.context != self.context {
            tracing::debug!(
                request = request.context,
                current = self.context,
                "dropping page for a previous list context"
            );
            return LoadOutcome::Stale;
        }
        self.loading = false;

        match result {
            Ok(page) => {
                let before = self.items.len();
                for item in page.results {
                    let id = item.identity();
                    if self.items.iter().any(|existing| existing.identity() == id) {
                        tracing::debug!(?id, "skipping item already in list");
                        continue;
                    }
                    self.items.push(item);
                }
                self.cursor = match page.next {
                    Some(next) if !next.trim().is_empty() => Cursor::Next(next),
                    _ => Cursor::Exhausted,
                };
                self.reanchor();
                let appended = self.items.len() - before;
                if appended == 0 {
                    // Same anchor still on screen; re-arm it so the next report fires.
                    self.anchor.visible = false;
                }
                LoadOutcome::Appended(appended)
            }
            Err(err) => LoadOutcome::Failed(err),
        }
    }

    /// Loads the next page synchronously. `None` when the guard refused.
    pub fn load_page(&mut self, source: &dyn PageSource<T>) -> Option<LoadOutcome<HttpError>> {
        let request = self.begin_load()?;
        let result = source.fetch(request.cursor());
        Some(self.complete_load(request, result))
    }

    /// Reports a visibility change of a rendered item. Returns a load request
    /// only on the transition of the current anchor into view while a next
    /// cursor is available.
    pub fn on_visibility(&mut self, id: &T::Id, visible: bool) -> Option<PageRequest> {
        if self.anchor.target.as_ref() != Some(id) {
            return None;
        }
        let rising = visible && !self.anchor.visible;
        self.anchor.visible = visible;
        if !rising || !matches!(self.cursor, Cursor::Next(_)) {
            return None;
        }
        self.begin_load()
    }

    /// Clears the list for a new query. Responses for requests issued before the
    /// reset are dropped when they arrive.
    pub fn reset(&mut self) {
        self.items.clear();
        self.cursor = Cursor::Start;
        self.loading = false;
        self.context = self.context.wrapping_add(1);
        self.anchor = Anchor::detached();
    }

    /// Inserts a freshly created item at the head; the cursor is untouched.
    pub fn prepend(&mut self, item: T) {
        let id = item.identity();
        self.items.retain(|existing| existing.identity() != id);
        self.items.insert(0, item);
        self.reanchor();
    }

    pub fn remove(&mut self, id: &T::Id) -> Option<T> {
        let index = self.items.iter().position(|item| &item.identity() == id)?;
        let removed = self.items.remove(index);
        self.reanchor();
        Some(removed)
    }

    fn reanchor(&mut self) {
        let last = self.items.last().map(Identified::identity);
        if last != self.anchor.target {
            self.anchor = Anchor {
                target: last,
                visible: false,
            };
        }
    }
}
