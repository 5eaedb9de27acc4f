use std::fmt;

/// Callback invoked with the new viewport width in CSS pixels.
pub type WidthCallback = Box<dyn FnMut(u32)>;

/// Host capability that reports the viewport width and its changes.
///
/// Components read the width once at construction and then listen for
/// changes through exactly one [`Subscription`].
pub trait ViewportSource {
    fn current_width(&self) -> u32;

    /// Register `callback` for width changes. The registration lives until
    /// the returned guard is disposed or dropped.
    fn subscribe(&self, callback: WidthCallback) -> Subscription;
}

/// Guard owning a single listener registration.
///
/// Releasing is idempotent: the release action runs at most once, either on
/// an explicit [`dispose`](Subscription::dispose) or on drop.
#[must_use = "dropping a Subscription releases the registration immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A guard that owns nothing.
    pub fn empty() -> Self {
        Self { release: None }
    }

    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    pub fn dispose(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
