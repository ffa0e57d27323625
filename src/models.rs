use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The signed-in account as returned by the "who am I" endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(default, rename = "first_name")]
    pub display_name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default, rename = "profile_picture")]
    pub avatar: Option<String>,
    #[serde(flatten)]
    pub counters: Counters,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    #[serde(default, rename = "post_count")]
    pub posts: i64,
    #[serde(default, rename = "follower_count")]
    pub followers: i64,
    #[serde(default, rename = "following_count")]
    pub following: i64,
}

/// Fields changed by a successful profile edit. `None` leaves the field alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<Option<String>>,
    pub counters: Option<Counters>,
}

impl UserPatch {
    pub fn apply(self, user: &mut User) {
        if let Some(username) = self.username {
            user.username = username;
        }
        if let Some(display_name) = self.display_name {
            user.display_name = display_name;
        }
        if let Some(bio) = self.bio {
            user.bio = bio;
        }
        if let Some(avatar) = self.avatar {
            user.avatar = avatar;
        }
        if let Some(counters) = self.counters {
            user.counters = counters;
        }
    }
}

/// Read-only projection of another user, as listed in liker and follower rosters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub username: String,
    #[serde(default, rename = "first_name")]
    pub display_name: String,
    #[serde(default, rename = "profile_picture")]
    pub avatar: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

/// Profile page payload for any user, including the viewer's relation to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(flatten)]
    pub user: User,
    #[serde(default)]
    pub is_self: bool,
    #[serde(default)]
    pub is_following: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub username: String,
    #[serde(default, rename = "authorName")]
    pub author_name: String,
    #[serde(default, rename = "authorPic")]
    pub author_avatar: String,
    #[serde(default)]
    pub is_mine: bool,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub like_count: i64,
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default)]
    pub comment_count: i64,
    #[serde(default)]
    pub is_edited: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub username: String,
    #[serde(default, alias = "authorName")]
    pub name: String,
    #[serde(default)]
    pub is_mine: bool,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub like_count: i64,
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default)]
    pub is_edited: bool,
}

/// Anything kept in a paginated list must expose a stable identity.
pub trait Identified {
    type Id: PartialEq + Clone + std::fmt::Debug;

    fn identity(&self) -> Self::Id;
}

impl Identified for Post {
    type Id = i64;

    fn identity(&self) -> i64 {
        self.id
    }
}

impl Identified for Comment {
    type Id = i64;

    fn identity(&self) -> i64 {
        self.id
    }
}

impl Identified for UserSummary {
    type Id = String;

    fn identity(&self) -> String {
        self.username.clone()
    }
}

/// One page of a cursor-paginated listing. `next` is the URL of the following page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SuccessReply {
    #[serde(default)]
    pub success: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LikeReply {
    #[serde(default)]
    pub success: bool,
    pub liked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FollowReply {
    #[serde(default)]
    pub success: bool,
    pub following: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ExistsReply {
    pub exists: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResetConfirmReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub username: Option<String>,
}

/// Edit endpoints return the updated resource; only these fields matter locally.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EditReply {
    pub text: String,
    #[serde(default)]
    pub is_edited: bool,
}
