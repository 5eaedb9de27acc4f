use std::cell::Cell;
use std::rc::Rc;

use crate::emitter::Emitter;
use crate::viewport::{Subscription, ViewportSource, WidthCallback};

/// A viewport whose width is set by the embedder.
///
/// Width changes are delivered synchronously from [`set_width`]. Useful for
/// tests and for hosts without a real window, such as print previews.
///
/// [`set_width`]: ManualViewport::set_width
pub struct ManualViewport {
    width: Cell<u32>,
    changes: Emitter<u32>,
    releases: Rc<Cell<usize>>,
}

impl ManualViewport {
    pub fn new(width: u32) -> Self {
        Self {
            width: Cell::new(width),
            changes: Emitter::new(),
            releases: Rc::new(Cell::new(0)),
        }
    }

    /// Update the width and notify subscribers, even if the value is unchanged
    /// (hosts fire resize events without a width change too).
    pub fn set_width(&self, width: u32) -> usize {
        self.width.set(width);
        self.changes.emit(width)
    }

    /// Number of live registrations.
    pub fn subscriber_count(&self) -> usize {
        self.changes.len()
    }

    /// Number of registrations that have been released so far.
    pub fn release_count(&self) -> usize {
        self.releases.get()
    }
}

impl ViewportSource for ManualViewport {
    fn current_width(&self) -> u32 {
        self.width.get()
    }

    fn subscribe(&self, callback: WidthCallback) -> Subscription {
        let inner = self.changes.subscribe(callback);
        let releases = self.releases.clone();
        Subscription::new(move || {
            drop(inner);
            releases.set(releases.get() + 1);
        })
    }
}
