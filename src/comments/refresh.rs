//! Auto-refresh subscriptions
//!
//! Consumers register a callback for a channel and get a [`Subscription`] back.
//! The callback carries no payload: when it fires the consumer re-reads the shared
//! store. Dropping the handle removes the subscription, so a torn-down widget can
//! never be called back.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockWriteGuard, Weak};
use uuid::Uuid;

/// Refresh cadence class
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    /// Visible, actively watched content
    High,
    /// Content that is on screen but collapsed
    Medium,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::High => write!(f, "HIGH_PRIORITY"),
            Priority::Medium => write!(f, "MEDIUM_PRIORITY"),
        }
    }
}

/// Channel a subscription listens on: `resource?target?freshness`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelKey {
    pub resource: String,
    pub target: u64,
    /// Freshness token the subscriber already has
    pub freshness: i64,
}

impl ChannelKey {
    pub fn new(resource: impl Into<String>, target: u64, freshness: i64) -> Self {
        Self {
            resource: resource.into(),
            target,
            freshness,
        }
    }

    /// Channel for a comment thread
    pub fn comments(target: u64, freshness: i64) -> Self {
        Self::new("comments", target, freshness)
    }

    /// Same resource and target, regardless of freshness
    pub fn same_resource(&self, other: &ChannelKey) -> bool {
        self.resource == other.resource && self.target == other.target
    }
}

impl std::fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}?{}?{}", self.resource, self.target, self.freshness)
    }
}

impl FromStr for ChannelKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '?');
        let (Some(resource), Some(target), Some(freshness)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(format!("Invalid channel key: {}", s));
        };

        Ok(Self {
            resource: resource.to_string(),
            target: target
                .parse()
                .map_err(|_| format!("Invalid target in channel key: {}", s))?,
            freshness: freshness
                .parse()
                .map_err(|_| format!("Invalid freshness in channel key: {}", s))?,
        })
    }
}

/// Refresh cadences
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    pub high_priority: Duration,
    pub medium_priority: Duration,
    /// How often the background loop checks for due subscriptions
    pub tick: std::time::Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            high_priority: Duration::seconds(5),
            medium_priority: Duration::seconds(30),
            tick: std::time::Duration::from_secs(1),
        }
    }
}

impl RefreshConfig {
    pub fn cadence(&self, priority: Priority) -> Duration {
        match priority {
            Priority::High => self.high_priority,
            Priority::Medium => self.medium_priority,
        }
    }
}

type Callback = Arc<dyn Fn() + Send + Sync>;

struct Entry {
    id: Uuid,
    key: ChannelKey,
    priority: Priority,
    callback: Callback,
    next_due: DateTime<Utc>,
}

struct HubInner {
    /// Encoded channel key → subscription
    entries: RwLock<HashMap<String, Entry>>,
    config: RefreshConfig,
    running: AtomicBool,
    /// Bumped by every `start`; a loop exits once it no longer owns the current run
    run_id: AtomicU64,
}

impl HubInner {
    fn entries_mut(&self) -> RwLockWriteGuard<'_, HashMap<String, Entry>> {
        // A panicking callback never runs under the lock, so the map stays consistent
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }

    fn remove(&self, key: &str, id: Uuid) {
        let mut entries = self.entries_mut();
        if entries.get(key).is_some_and(|e| e.id == id) {
            entries.remove(key);
            tracing::debug!(channel = %key, "Unsubscribed");
        }
    }
}

/// Registry of refresh subscriptions
#[derive(Clone)]
pub struct RefreshHub {
    inner: Arc<HubInner>,
}

impl RefreshHub {
    pub fn new(config: RefreshConfig) -> Self {
        Self {
            inner: Arc::new(HubInner {
                entries: RwLock::new(HashMap::new()),
                config,
                running: AtomicBool::new(false),
                run_id: AtomicU64::new(0),
            }),
        }
    }

    /// Register a callback on a channel
    ///
    /// Subscribing to a channel key that is already registered replaces the old
    /// entry; the old handle becomes inert.
    pub fn subscribe<F>(&self, key: ChannelKey, priority: Priority, callback: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = Uuid::new_v4();
        let encoded = key.to_string();
        let next_due = Utc::now() + self.inner.config.cadence(priority);

        let replaced = self.inner.entries_mut().insert(
            encoded.clone(),
            Entry {
                id,
                key,
                priority,
                callback: Arc::new(callback),
                next_due,
            },
        );

        tracing::debug!(
            channel = %encoded,
            priority = %priority,
            replaced = replaced.is_some(),
            "Subscribed"
        );

        Subscription {
            id,
            key: encoded,
            hub: Arc::downgrade(&self.inner),
        }
    }

    /// Number of live subscriptions
    pub fn len(&self) -> usize {
        self.inner.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Priority a channel is registered with
    pub fn priority_of(&self, key: &ChannelKey) -> Option<Priority> {
        self.inner
            .entries
            .read()
            .ok()?
            .get(&key.to_string())
            .map(|e| e.priority)
    }

    /// Signal that a resource changed; fires every subscription on it
    ///
    /// Returns the number of callbacks invoked.
    pub fn notify(&self, key: &ChannelKey) -> usize {
        let callbacks: Vec<Callback> = self
            .inner
            .entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .filter(|e| e.key.same_resource(key))
            .map(|e| e.callback.clone())
            .collect();

        for callback in &callbacks {
            callback();
        }
        callbacks.len()
    }

    /// Fire every subscription whose cadence has elapsed at `now`
    pub fn tick(&self, now: DateTime<Utc>) -> usize {
        let callbacks: Vec<Callback> = {
            let mut entries = self.inner.entries_mut();
            entries
                .values_mut()
                .filter(|e| e.next_due <= now)
                .map(|e| {
                    e.next_due = now + self.inner.config.cadence(e.priority);
                    e.callback.clone()
                })
                .collect()
        };

        for callback in &callbacks {
            callback();
        }

        if !callbacks.is_empty() {
            tracing::trace!(fired = callbacks.len(), "Refresh tick");
        }
        callbacks.len()
    }

    /// Start the background refresh loop
    ///
    /// A loop left over from an earlier `start` exits at its next tick without
    /// firing, so only one loop ever drives the hub.
    pub fn start(&self) -> tokio::task::JoinHandle<()> {
        let hub = self.clone();
        let run_id = hub.inner.run_id.fetch_add(1, Ordering::SeqCst) + 1;
        hub.inner.running.store(true, Ordering::SeqCst);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(hub.inner.config.tick);
            tracing::info!("Refresh loop started");

            loop {
                interval.tick().await;

                if !hub.inner.running.load(Ordering::SeqCst)
                    || hub.inner.run_id.load(Ordering::SeqCst) != run_id
                {
                    break;
                }

                hub.tick(Utc::now());
            }

            tracing::info!("Refresh loop stopped");
        })
    }

    /// Stop the background refresh loop after its current tick
    pub fn stop(&self) {
        self.inner.running.store(false, Ordering::SeqCst);
    }
}

impl Default for RefreshHub {
    fn default() -> Self {
        Self::new(RefreshConfig::default())
    }
}

/// Handle to a live subscription; dropping it unsubscribes
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: Uuid,
    key: String,
    hub: Weak<HubInner>,
}

impl Subscription {
    /// Encoded channel key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Explicit teardown
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            hub.remove(&self.key, self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("key", &self.key)
            .finish()
    }
}
