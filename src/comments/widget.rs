//! Comments widget controller
//!
//! Headless state machine behind the comments panel. The presentation layer
//! forwards lifecycle and input events (mount, target change, clicks, typing,
//! submit) and renders whatever [`CommentsWidget::view`] returns. Re-render
//! requests from the refresh hub show up as a bumped [`CommentsWidget::generation`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::error::{CommentError, CommentResult};
use super::refresh::{ChannelKey, Priority, RefreshHub, Subscription};
use super::sanitize::{sanitize, validate, SanitizedInput, MIN_COMMENT_LEN};
use super::store::CommentStore;
use super::types::{sort_newest_first, Comment};

/// Paging and validation settings
#[derive(Debug, Clone)]
pub struct WidgetConfig {
    /// Comments shown right after a thread loads
    pub page_size: usize,
    /// Extra comments revealed by "show more"
    pub page_increment: usize,
    /// Page size applied when the panel is collapsed
    pub collapsed_page_size: usize,
    pub min_length: usize,
    /// Characters of the replied-to comment shown in the reply banner
    pub reply_preview_len: usize,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            page_increment: 15,
            collapsed_page_size: 15,
            min_length: MIN_COMMENT_LEN,
            reply_preview_len: 100,
        }
    }
}

/// A comment ready to render, with the comment it answers
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleComment {
    pub comment: Comment,
    pub replying_to: Option<Comment>,
}

/// What the panel should display
#[derive(Debug, Clone, PartialEq)]
pub enum CommentsView {
    /// No target selected
    NoTarget,
    /// Thread requested but not in the store yet
    Loading,
    /// Thread loaded, no comments
    Empty,
    Comments {
        total: usize,
        visible: Vec<VisibleComment>,
        /// More comments than `visible` exist
        has_more: bool,
    },
}

pub struct CommentsWidget {
    store: Arc<dyn CommentStore>,
    hub: RefreshHub,
    config: WidgetConfig,
    target: Option<u64>,
    expanded: bool,
    max_showing: usize,
    reply_to: Option<Comment>,
    is_sending: bool,
    draft: String,
    subscription: Option<Subscription>,
    generation: Arc<AtomicU64>,
}

impl CommentsWidget {
    pub fn new(store: Arc<dyn CommentStore>, hub: RefreshHub, config: WidgetConfig) -> Self {
        let max_showing = config.page_size;
        Self {
            store,
            hub,
            config,
            target: None,
            expanded: true,
            max_showing,
            reply_to: None,
            is_sending: false,
            draft: String::new(),
            subscription: None,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn target(&self) -> Option<u64> {
        self.target
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn max_showing(&self) -> usize {
        self.max_showing
    }

    pub fn is_sending(&self) -> bool {
        self.is_sending
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn replying_to(&self) -> Option<&Comment> {
        self.reply_to.as_ref()
    }

    /// Current refresh subscription, if any
    pub fn subscription(&self) -> Option<&Subscription> {
        self.subscription.as_ref()
    }

    /// Render generation, bumped every time the refresh hub fires
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// First display of the widget
    pub async fn mount(&mut self, target: Option<u64>) -> CommentResult<()> {
        self.target = target;
        self.switch_to_comments().await
    }

    /// Target property changed
    ///
    /// The outgoing target's thread is backed up before switching.
    pub async fn update(&mut self, target: Option<u64>) -> CommentResult<()> {
        if self.target == target {
            return Ok(());
        }

        if let Some(previous) = self.target {
            if let Err(e) = self.store.backup_comments(previous).await {
                tracing::warn!(target_id = previous, error = %e, "Comment backup failed");
            }
        }

        self.target = target;
        self.switch_to_comments().await
    }

    /// Make sure the current target's thread is loaded and subscribed for refresh
    pub async fn switch_to_comments(&mut self) -> CommentResult<()> {
        let Some(target) = self.target else {
            self.subscription = None;
            return Ok(());
        };

        // Release the old channel first; a failed load must not keep it alive
        self.subscription = None;

        let thread = match self.store.thread(target).await {
            Some(thread) => thread,
            None => {
                let thread = self.store.load_comments(target).await?;
                self.max_showing = self.config.page_size;
                thread
            }
        };

        let priority = if self.expanded {
            Priority::High
        } else {
            Priority::Medium
        };

        let generation = self.generation.clone();
        self.subscription = Some(self.hub.subscribe(
            ChannelKey::comments(target, thread.last_update),
            priority,
            move || {
                generation.fetch_add(1, Ordering::SeqCst);
            },
        ));

        tracing::debug!(target_id = target, priority = %priority, "Switched comments target");
        Ok(())
    }

    /// Header click: collapse or expand the panel
    ///
    /// Only acts once the thread is loaded. Collapsing switches to the collapsed
    /// page size.
    pub async fn toggle_expanded(&mut self) {
        self.reply_to = None;

        let Some(target) = self.target else {
            return;
        };
        if self.store.thread(target).await.is_none() {
            return;
        }

        if self.expanded {
            self.expanded = false;
            self.max_showing = self.config.collapsed_page_size;
        } else {
            self.expanded = true;
        }
    }

    /// "Show more" click
    pub fn show_more(&mut self) {
        self.max_showing += self.config.page_increment;
    }

    /// Start answering a comment
    pub fn reply(&mut self, comment: Comment) {
        self.reply_to = Some(comment);
    }

    pub fn cancel_reply(&mut self) {
        self.reply_to = None;
    }

    /// Comment box edit; returns the sanitized text and whether it asks to submit
    pub fn edit_draft(&mut self, raw: &str) -> SanitizedInput {
        let input = sanitize(raw);
        self.draft = input.text.clone();
        input
    }

    /// Validation state of the current draft
    pub fn draft_validation(&self) -> CommentResult<()> {
        validate(&self.draft, self.config.min_length)
    }

    /// Post `content` to the current target
    ///
    /// On success the draft and reply are cleared. On failure they are kept so
    /// the user can retry. Either way the widget stops sending.
    pub async fn submit(&mut self, content: &str) -> CommentResult<Comment> {
        let target = self.target.ok_or(CommentError::NoTarget)?;

        self.draft = sanitize(content).text;
        self.draft_validation()?;

        self.is_sending = true;
        let reply_id = self.reply_to.as_ref().map(|c| c.id);
        let result = self.store.post_comment(target, &self.draft, reply_id).await;
        self.is_sending = false;

        match &result {
            Ok(comment) => {
                self.draft.clear();
                self.reply_to = None;
                tracing::debug!(target_id = target, comment_id = comment.id, "Comment submitted");
            }
            Err(e) => {
                tracing::warn!(target_id = target, error = %e, "Comment submit failed");
            }
        }

        result
    }

    /// Snapshot of what the panel shows
    pub async fn view(&self) -> CommentsView {
        let Some(target) = self.target else {
            return CommentsView::NoTarget;
        };
        let Some(thread) = self.store.thread(target).await else {
            return CommentsView::Loading;
        };
        if thread.is_empty() {
            return CommentsView::Empty;
        }

        let mut sorted = thread.data.clone();
        sort_newest_first(&mut sorted);

        let visible = sorted
            .into_iter()
            .take(self.max_showing)
            .map(|comment| VisibleComment {
                replying_to: comment
                    .comment_reply_id
                    .and_then(|id| thread.find(id))
                    .cloned(),
                comment,
            })
            .collect();

        CommentsView::Comments {
            total: thread.len(),
            visible,
            has_more: thread.len() > self.max_showing,
        }
    }

    /// Banner text for the comment being answered
    pub fn reply_preview(&self) -> Option<String> {
        self.reply_to
            .as_ref()
            .map(|c| truncate_preview(&c.comment_content, self.config.reply_preview_len))
    }

    /// Back up the current thread and drop the refresh subscription
    pub async fn teardown(mut self) {
        self.subscription = None;
        if let Some(target) = self.target {
            if let Err(e) = self.store.backup_comments(target).await {
                tracing::warn!(target_id = target, error = %e, "Comment backup failed");
            }
        }
    }
}

/// Cut `content` to `max` characters, marking the cut with "..."
pub fn truncate_preview(content: &str, max: usize) -> String {
    if content.chars().count() <= max {
        content.to_string()
    } else {
        let mut cut: String = content.chars().take(max).collect();
        cut.push_str("...");
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::store::MemoryCommentStore;
    use crate::comments::types::CommentThread;

    fn thread(count: u64) -> CommentThread {
        let data = (1..=count)
            .map(|i| Comment::new(i, 100 + i, format!("comment {}", i), i as i64 * 10))
            .collect();
        CommentThread::new(data, 999)
    }

    async fn setup() -> (Arc<MemoryCommentStore>, RefreshHub, CommentsWidget) {
        let store = Arc::new(MemoryCommentStore::new(1, "Ana López"));
        store.seed(7, thread(30)).await;
        store.seed(8, CommentThread::default()).await;

        let hub = RefreshHub::default();
        let widget = CommentsWidget::new(store.clone(), hub.clone(), WidgetConfig::default());
        (store, hub, widget)
    }

    #[tokio::test]
    async fn test_no_target() {
        let (_, hub, mut widget) = setup().await;
        widget.mount(None).await.unwrap();

        assert_eq!(widget.view().await, CommentsView::NoTarget);
        assert!(hub.is_empty());
    }

    #[tokio::test]
    async fn test_mount_loads_and_subscribes() {
        let (_, hub, mut widget) = setup().await;
        widget.mount(Some(7)).await.unwrap();

        let key = ChannelKey::comments(7, 999);
        assert_eq!(hub.priority_of(&key), Some(Priority::High));
        assert_eq!(widget.subscription().map(|s| s.key()), Some("comments?7?999"));

        match widget.view().await {
            CommentsView::Comments { total, visible, has_more } => {
                assert_eq!(total, 30);
                assert_eq!(visible.len(), 10);
                assert!(has_more);
                assert_eq!(visible[0].comment.id, 30);
                assert_eq!(visible[9].comment.id, 21);
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_refresh_bumps_generation() {
        let (_, hub, mut widget) = setup().await;
        widget.mount(Some(7)).await.unwrap();
        assert_eq!(widget.generation(), 0);

        hub.notify(&ChannelKey::comments(7, 1234));
        assert_eq!(widget.generation(), 1);
    }

    #[tokio::test]
    async fn test_update_backs_up_and_switches() {
        let (store, hub, mut widget) = setup().await;
        widget.mount(Some(7)).await.unwrap();
        widget.update(Some(8)).await.unwrap();

        assert!(store.backup(7).await.is_some());
        assert_eq!(widget.view().await, CommentsView::Empty);
        assert_eq!(hub.len(), 1);
        assert!(hub.priority_of(&ChannelKey::comments(7, 999)).is_none());
    }

    /// Store whose loads always fail
    struct UnreachableStore;

    #[async_trait::async_trait]
    impl CommentStore for UnreachableStore {
        async fn thread(&self, _target: u64) -> Option<CommentThread> {
            None
        }

        async fn load_comments(&self, _target: u64) -> CommentResult<CommentThread> {
            Err(CommentError::Unavailable("backend down".to_string()))
        }

        async fn post_comment(
            &self,
            _target: u64,
            _content: &str,
            _reply_id: Option<u64>,
        ) -> CommentResult<Comment> {
            Err(CommentError::Unavailable("backend down".to_string()))
        }

        async fn backup_comments(&self, target: u64) -> CommentResult<()> {
            Err(CommentError::NotLoaded(target))
        }
    }

    #[tokio::test]
    async fn test_failed_load_drops_previous_subscription() {
        let (_, hub, mut widget) = setup().await;
        widget.mount(Some(7)).await.unwrap();
        assert_eq!(hub.len(), 1);

        widget.store = Arc::new(UnreachableStore);
        let err = widget.update(Some(9)).await.unwrap_err();
        assert!(matches!(err, CommentError::Unavailable(_)));

        assert_eq!(widget.target(), Some(9));
        assert!(widget.subscription().is_none());
        assert!(hub.is_empty());

        hub.notify(&ChannelKey::comments(7, 999));
        assert_eq!(widget.generation(), 0);
    }

    #[tokio::test]
    async fn test_update_same_target_is_noop() {
        let (store, _, mut widget) = setup().await;
        widget.mount(Some(7)).await.unwrap();
        widget.update(Some(7)).await.unwrap();

        assert!(store.backup(7).await.is_none());
    }

    #[tokio::test]
    async fn test_toggle_and_paging() {
        let (_, hub, mut widget) = setup().await;

        // Not loaded yet: toggling does nothing
        widget.target = Some(7);
        widget.toggle_expanded().await;
        assert!(widget.is_expanded());

        widget.switch_to_comments().await.unwrap();
        widget.toggle_expanded().await;
        assert!(!widget.is_expanded());
        assert_eq!(widget.max_showing(), 15);

        widget.show_more();
        assert_eq!(widget.max_showing(), 30);
        match widget.view().await {
            CommentsView::Comments { visible, has_more, .. } => {
                assert_eq!(visible.len(), 30);
                assert!(!has_more);
            }
            other => panic!("unexpected view: {:?}", other),
        }

        // Collapsed panels subscribe at medium priority
        widget.switch_to_comments().await.unwrap();
        assert_eq!(hub.priority_of(&ChannelKey::comments(7, 999)), Some(Priority::Medium));

        widget.toggle_expanded().await;
        assert!(widget.is_expanded());
    }

    #[tokio::test]
    async fn test_submit_reply() {
        let (store, _, mut widget) = setup().await;
        widget.mount(Some(7)).await.unwrap();

        let parent = store.thread(7).await.unwrap().data[4].clone();
        widget.reply(parent.clone());

        let posted = widget.submit("¡Gracias por la respuesta! <3").await.unwrap();
        assert_eq!(posted.comment_content, "¡Gracias por la respuesta! 3");
        assert_eq!(posted.comment_reply_id, Some(parent.id));
        assert_eq!(widget.draft(), "");
        assert!(widget.replying_to().is_none());
        assert!(!widget.is_sending());

        match widget.view().await {
            CommentsView::Comments { total, visible, .. } => {
                assert_eq!(total, 31);
                assert_eq!(visible[0].comment.id, posted.id);
                assert_eq!(visible[0].replying_to.as_ref(), Some(&parent));
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_submit_failure_keeps_draft() {
        let (store, _, mut widget) = setup().await;
        widget.mount(Some(7)).await.unwrap();
        widget.reply(Comment::new(3, 1, "x", 0));
        store.set_fail_posts(true);

        let err = widget.submit("hola a todos").await.unwrap_err();
        assert!(matches!(err, CommentError::PostFailed(_)));
        assert_eq!(widget.draft(), "hola a todos");
        assert!(widget.replying_to().is_some());
        assert!(!widget.is_sending());
    }

    #[tokio::test]
    async fn test_submit_validation() {
        let (_, _, mut widget) = setup().await;
        assert_eq!(widget.submit("hola").await.unwrap_err(), CommentError::NoTarget);

        widget.mount(Some(7)).await.unwrap();
        let err = widget.submit("  ab ").await.unwrap_err();
        assert_eq!(err, CommentError::TooShort { len: 2, min: 4 });
    }

    #[tokio::test]
    async fn test_edit_draft() {
        let (_, _, mut widget) = setup().await;
        let input = widget.edit_draft("hi~\n");

        assert!(input.submit);
        assert_eq!(widget.draft(), "hi");
        assert!(widget.draft_validation().is_err());
    }

    #[tokio::test]
    async fn test_reply_preview() {
        let (_, _, mut widget) = setup().await;
        assert!(widget.reply_preview().is_none());

        widget.reply(Comment::new(1, 1, "a".repeat(120), 0));
        let preview = widget.reply_preview().unwrap();
        assert_eq!(preview.len(), 103);
        assert!(preview.ends_with("..."));

        assert_eq!(truncate_preview("corto", 100), "corto");
    }

    #[tokio::test]
    async fn test_teardown_unsubscribes() {
        let (store, hub, mut widget) = setup().await;
        widget.mount(Some(7)).await.unwrap();
        assert_eq!(hub.len(), 1);

        widget.teardown().await;
        assert!(hub.is_empty());
        assert!(store.backup(7).await.is_some());
    }
}
