//! Comments panel
//!
//! - **types**: Comment and thread model, newest-first ordering
//! - **sanitize**: Allow-list filtering and length validation of typed text
//! - **store**: Store trait the widget loads from and posts through
//! - **refresh**: Auto-refresh subscriptions with unsubscribe on drop
//! - **widget**: Headless controller driving the panel
//!
//! # Architecture
//!
//! ```text
//! UI events → CommentsWidget → CommentStore (load / post / backup)
//!                   ↑
//! RefreshHub ── callback (bumps render generation)
//! ```

pub mod error;
pub mod refresh;
pub mod sanitize;
pub mod store;
pub mod types;
pub mod widget;

pub use error::{CommentError, CommentResult};
pub use refresh::{ChannelKey, Priority, RefreshConfig, RefreshHub, Subscription};
pub use sanitize::{sanitize, validate, SanitizedInput, ALLOWED_CHARS, MIN_COMMENT_LEN};
pub use store::{CommentStore, MemoryCommentStore};
pub use types::{sort_newest_first, Comment, CommentThread};
pub use widget::{truncate_preview, CommentsView, CommentsWidget, VisibleComment, WidgetConfig};
