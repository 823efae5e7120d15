//! Comment model and ordering

use serde::{Deserialize, Serialize};

/// A single comment as served by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: u64,
    pub user_id: u64,
    /// Author display name
    pub name: String,
    #[serde(default)]
    pub pic_url: Option<String>,
    /// Author country code, used for the flag icon
    #[serde(default)]
    pub flag: String,
    pub comment_content: String,
    /// Comment this one answers
    #[serde(default)]
    pub comment_reply_id: Option<u64>,
    /// Creation instant in epoch seconds
    pub comment_created_at: i64,
}

impl Comment {
    pub fn new(id: u64, user_id: u64, content: impl Into<String>, created_at: i64) -> Self {
        Self {
            id,
            user_id,
            name: String::new(),
            pic_url: None,
            flag: String::new(),
            comment_content: content.into(),
            comment_reply_id: None,
            comment_created_at: created_at,
        }
    }

    /// Builder: set author name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builder: mark as a reply
    pub fn reply_to(mut self, id: u64) -> Self {
        self.comment_reply_id = Some(id);
        self
    }

    /// First word of the author name, as shown in "replying to ..."
    pub fn first_name(&self) -> &str {
        self.name.split(' ').next().unwrap_or("")
    }
}

/// All comments attached to one target
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CommentThread {
    pub data: Vec<Comment>,
    /// Freshness token; changes whenever the thread changes server-side
    pub last_update: i64,
}

impl CommentThread {
    pub fn new(data: Vec<Comment>, last_update: i64) -> Self {
        Self { data, last_update }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Find a comment by id
    pub fn find(&self, id: u64) -> Option<&Comment> {
        self.data.iter().find(|c| c.id == id)
    }
}

/// Order comments newest first
///
/// Ties keep their relative order.
pub fn sort_newest_first(comments: &mut [Comment]) {
    comments.sort_by(|a, b| b.comment_created_at.cmp(&a.comment_created_at));
}
