//! Comment store
//!
//! The widget never talks to the network itself. It goes through a
//! [`CommentStore`], which owns the loaded threads and completes every call
//! exactly once with success or failure.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::RwLock;

use super::error::{CommentError, CommentResult};
use super::types::{Comment, CommentThread};

/// Shared state holding comment threads per target
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Thread for a target if it has been loaded
    async fn thread(&self, target: u64) -> Option<CommentThread>;

    /// Fetch a target's thread into the store
    async fn load_comments(&self, target: u64) -> CommentResult<CommentThread>;

    /// Post a new comment, optionally answering another one
    async fn post_comment(
        &self,
        target: u64,
        content: &str,
        reply_id: Option<u64>,
    ) -> CommentResult<Comment>;

    /// Persist the loaded thread of a target before switching away from it
    async fn backup_comments(&self, target: u64) -> CommentResult<()>;
}

/// In-process store backed by hash maps
///
/// `remote` plays the role of the backend, `loaded` is what the widget sees.
pub struct MemoryCommentStore {
    remote: RwLock<HashMap<u64, CommentThread>>,
    loaded: RwLock<HashMap<u64, CommentThread>>,
    backups: RwLock<HashMap<u64, CommentThread>>,
    author_id: u64,
    author_name: String,
    next_id: AtomicU64,
    fail_posts: AtomicBool,
}

impl MemoryCommentStore {
    /// Create an empty store posting as the given author
    pub fn new(author_id: u64, author_name: impl Into<String>) -> Self {
        Self {
            remote: RwLock::new(HashMap::new()),
            loaded: RwLock::new(HashMap::new()),
            backups: RwLock::new(HashMap::new()),
            author_id,
            author_name: author_name.into(),
            next_id: AtomicU64::new(1),
            fail_posts: AtomicBool::new(false),
        }
    }

    /// Put a thread on the simulated backend
    pub async fn seed(&self, target: u64, thread: CommentThread) {
        if let Some(max) = thread.data.iter().map(|c| c.id).max() {
            self.next_id.fetch_max(max + 1, Ordering::SeqCst);
        }
        self.remote.write().await.insert(target, thread);
    }

    /// Make subsequent posts fail
    pub fn set_fail_posts(&self, fail: bool) {
        self.fail_posts.store(fail, Ordering::SeqCst);
    }

    /// Last backup taken for a target
    pub async fn backup(&self, target: u64) -> Option<CommentThread> {
        self.backups.read().await.get(&target).cloned()
    }
}

#[async_trait]
impl CommentStore for MemoryCommentStore {
    async fn thread(&self, target: u64) -> Option<CommentThread> {
        self.loaded.read().await.get(&target).cloned()
    }

    async fn load_comments(&self, target: u64) -> CommentResult<CommentThread> {
        let thread = self
            .remote
            .read()
            .await
            .get(&target)
            .cloned()
            .unwrap_or_default();

        tracing::debug!(target_id = target, comments = thread.len(), "Loaded comments");
        self.loaded.write().await.insert(target, thread.clone());
        Ok(thread)
    }

    async fn post_comment(
        &self,
        target: u64,
        content: &str,
        reply_id: Option<u64>,
    ) -> CommentResult<Comment> {
        if self.fail_posts.load(Ordering::SeqCst) {
            return Err(CommentError::PostFailed("backend rejected the comment".to_string()));
        }

        let now = Utc::now().timestamp();
        let mut comment = Comment::new(
            self.next_id.fetch_add(1, Ordering::SeqCst),
            self.author_id,
            content,
            now,
        )
        .name(self.author_name.clone());
        comment.comment_reply_id = reply_id;

        for threads in [&self.remote, &self.loaded] {
            let mut threads = threads.write().await;
            let thread = threads.entry(target).or_default();
            thread.data.push(comment.clone());
            thread.last_update = now;
        }

        tracing::info!(target_id = target, comment_id = comment.id, "Comment posted");
        Ok(comment)
    }

    async fn backup_comments(&self, target: u64) -> CommentResult<()> {
        let thread = self
            .loaded
            .read()
            .await
            .get(&target)
            .cloned()
            .ok_or(CommentError::NotLoaded(target))?;

        self.backups.write().await.insert(target, thread);
        tracing::debug!(target_id = target, "Comments backed up");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_unknown_target_is_empty() {
        let store = MemoryCommentStore::new(1, "Ana");
        assert!(store.thread(7).await.is_none());

        let thread = store.load_comments(7).await.unwrap();
        assert!(thread.is_empty());
        assert!(store.thread(7).await.is_some());
    }

    #[tokio::test]
    async fn test_post_assigns_ids_after_seed() {
        let store = MemoryCommentStore::new(1, "Ana López");
        store
            .seed(3, CommentThread::new(vec![Comment::new(41, 2, "hola", 10)], 10))
            .await;
        store.load_comments(3).await.unwrap();

        let posted = store.post_comment(3, "buenas", Some(41)).await.unwrap();
        assert_eq!(posted.id, 42);
        assert_eq!(posted.comment_reply_id, Some(41));
        assert_eq!(posted.name, "Ana López");

        let thread = store.thread(3).await.unwrap();
        assert_eq!(thread.len(), 2);
        assert_eq!(thread.last_update, posted.comment_created_at);
    }

    #[tokio::test]
    async fn test_post_failure() {
        let store = MemoryCommentStore::new(1, "Ana");
        store.set_fail_posts(true);

        let err = store.post_comment(1, "hola", None).await.unwrap_err();
        assert!(matches!(err, CommentError::PostFailed(_)));
        assert!(store.thread(1).await.is_none());
    }

    #[tokio::test]
    async fn test_backup() {
        let store = MemoryCommentStore::new(1, "Ana");
        assert_eq!(
            store.backup_comments(5).await,
            Err(CommentError::NotLoaded(5))
        );

        store.load_comments(5).await.unwrap();
        store.backup_comments(5).await.unwrap();
        assert!(store.backup(5).await.is_some());
    }
}
