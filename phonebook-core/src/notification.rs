//! Single shared notification slot with timed auto-clear.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use tokio::task::JoinHandle;

pub const AUTO_CLEAR_AFTER: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

impl Severity {
    pub fn color(self) -> BannerColor {
        match self {
            Severity::Success => BannerColor::Green,
            Severity::Error => BannerColor::Red,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerColor {
    Green,
    Red,
}

/// What the presentation layer draws: text plus the color used for text and border.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub text: String,
    pub color: BannerColor,
}

/// Renders nothing for an empty slot or a blank message.
pub fn render_banner(notification: Option<&Notification>) -> Option<Banner> {
    let n = notification?;
    if n.message.trim().is_empty() {
        return None;
    }

    Some(Banner { text: n.message.clone(), color: n.severity.color() })
}

#[derive(Debug, Default)]
struct Slot {
    current: Option<Notification>,
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

/// Cloneable handle to the one active notification. Last write wins.
///
/// Every [`Notifier::show`] arms a fresh clear timer and aborts the previous one; the
/// timer only clears the slot if no newer notification was shown meanwhile.
/// Must be used from within a tokio runtime.
#[derive(Debug, Clone)]
pub struct Notifier {
    slot: Arc<Mutex<Slot>>,
    clear_after: Duration,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    pub fn new() -> Self {
        Self::with_clear_after(AUTO_CLEAR_AFTER)
    }

    pub fn with_clear_after(clear_after: Duration) -> Self {
        Self { slot: Arc::new(Mutex::new(Slot::default())), clear_after }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(message, Severity::Success);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(message, Severity::Error);
    }

    pub fn show(&self, message: impl Into<String>, severity: Severity) {
        let mut slot = lock(&self.slot);
        slot.generation += 1;
        slot.current = Some(Notification { message: message.into(), severity });

        if let Some(previous) = slot.timer.take() {
            previous.abort();
        }

        let generation = slot.generation;
        let shared = Arc::clone(&self.slot);
        let delay = self.clear_after;
        slot.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut slot = lock(&shared);
            if slot.generation == generation {
                slot.current = None;
                slot.timer = None;
            }
        }));
    }

    pub fn current(&self) -> Option<Notification> {
        lock(&self.slot).current.clone()
    }

    pub fn banner(&self) -> Option<Banner> {
        render_banner(self.current().as_ref())
    }

    pub fn clear(&self) {
        let mut slot = lock(&self.slot);
        slot.generation += 1;
        slot.current = None;
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
    }
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}
