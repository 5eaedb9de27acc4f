use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use fitview_protocol::DeviceClass;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::emitter::Emitter;
use crate::error::ConfigError;
use crate::viewport::{Subscription, ViewportSource};

/// Viewport width (px) below which the layout is considered mobile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Breakpoint(u32);

impl Breakpoint {
    pub const DEFAULT: Breakpoint = Breakpoint(768);

    pub fn new(px: u32) -> Result<Self, ConfigError> {
        if px == 0 {
            return Err(ConfigError::InvalidBreakpoint(px.to_string()));
        }
        Ok(Self(px))
    }

    pub fn px(self) -> u32 {
        self.0
    }

    pub fn classify(self, width: u32) -> DeviceClass {
        DeviceClass::classify(width, self.0)
    }

    /// The equivalent CSS media condition, e.g. `(max-width: 767px)` for 768.
    pub fn media_query(self) -> String {
        format!("(max-width: {}px)", self.0 - 1)
    }
}

impl Default for Breakpoint {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px", self.0)
    }
}

impl TryFrom<u32> for Breakpoint {
    type Error = ConfigError;

    fn try_from(px: u32) -> Result<Self, Self::Error> {
        Self::new(px)
    }
}

impl TryFrom<i64> for Breakpoint {
    type Error = ConfigError;

    fn try_from(px: i64) -> Result<Self, Self::Error> {
        u32::try_from(px)
            .map_err(|_| ConfigError::InvalidBreakpoint(px.to_string()))
            .and_then(Self::new)
    }
}

/// Numbers arriving from JavaScript: must be finite, whole and positive.
impl TryFrom<f64> for Breakpoint {
    type Error = ConfigError;

    fn try_from(px: f64) -> Result<Self, Self::Error> {
        if !px.is_finite() || px.fract() != 0.0 || px < 1.0 || px > f64::from(u32::MAX) {
            return Err(ConfigError::InvalidBreakpoint(px.to_string()));
        }
        Self::new(px as u32)
    }
}

impl From<Breakpoint> for u32 {
    fn from(bp: Breakpoint) -> u32 {
        bp.0
    }
}

struct ObserverState {
    breakpoint: Breakpoint,
    class: Cell<DeviceClass>,
    disposed: Cell<bool>,
    changes: Emitter<DeviceClass>,
}

impl ObserverState {
    fn update(&self, width: u32) -> bool {
        if self.disposed.get() {
            return false;
        }
        let next = self.breakpoint.classify(width);
        if next == self.class.get() {
            return false;
        }
        self.class.set(next);
        debug!(width, breakpoint = self.breakpoint.px(), class = ?next, "viewport class changed");
        self.changes.emit(next);
        true
    }
}

/// Live mobile/desktop classification of the viewport.
///
/// The initial class is read synchronously from the source, so there is no
/// window in which the default class is reported before the first event.
/// Holds one registration on the source until disposed or dropped.
pub struct BreakpointObserver {
    state: Rc<ObserverState>,
    registration: Subscription,
}

impl BreakpointObserver {
    pub fn new<S: ViewportSource + ?Sized>(source: &S, breakpoint: Breakpoint) -> Self {
        let state = Rc::new(ObserverState {
            breakpoint,
            class: Cell::new(breakpoint.classify(source.current_width())),
            disposed: Cell::new(false),
            changes: Emitter::new(),
        });
        let weak = Rc::downgrade(&state);
        let registration = source.subscribe(Box::new(move |width| {
            if let Some(state) = weak.upgrade() {
                state.update(width);
            }
        }));
        Self {
            state,
            registration,
        }
    }

    pub fn with_default_breakpoint<S: ViewportSource + ?Sized>(source: &S) -> Self {
        Self::new(source, Breakpoint::DEFAULT)
    }

    pub fn breakpoint(&self) -> Breakpoint {
        self.state.breakpoint
    }

    pub fn class(&self) -> DeviceClass {
        self.state.class.get()
    }

    pub fn is_mobile(&self) -> bool {
        self.class().is_mobile()
    }

    /// Reclassify against `width`. Subscribers hear about it only when the
    /// class actually flips. Returns whether it flipped.
    pub fn on_viewport_change(&self, width: u32) -> bool {
        self.state.update(width)
    }

    /// Call `listener` with the new class on every flip.
    pub fn subscribe(&self, listener: impl FnMut(DeviceClass) + 'static) -> Subscription {
        if self.state.disposed.get() {
            return Subscription::empty();
        }
        self.state.changes.subscribe(listener)
    }

    pub fn is_disposed(&self) -> bool {
        self.state.disposed.get()
    }

    /// Release the source registration and drop all subscribers. Idempotent.
    pub fn dispose(&mut self) {
        if self.state.disposed.replace(true) {
            return;
        }
        self.registration.dispose();
        self.state.changes.clear();
    }
}

impl Drop for BreakpointObserver {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for BreakpointObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BreakpointObserver")
            .field("breakpoint", &self.state.breakpoint)
            .field("class", &self.class())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::manual::ManualViewport;

    fn recorder(observer: &BreakpointObserver) -> (Rc<RefCell<Vec<DeviceClass>>>, Subscription) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        let sub = observer.subscribe(move |class| s.borrow_mut().push(class));
        (seen, sub)
    }

    #[test]
    fn initial_class_read_synchronously() {
        let narrow = ManualViewport::new(375);
        let wide = ManualViewport::new(1440);
        assert!(BreakpointObserver::with_default_breakpoint(&narrow).is_mobile());
        assert!(!BreakpointObserver::with_default_breakpoint(&wide).is_mobile());
    }

    #[test]
    fn crossing_downward_notifies_once() {
        let viewport = ManualViewport::new(800);
        let observer = BreakpointObserver::new(&viewport, Breakpoint::DEFAULT);
        let (seen, _sub) = recorder(&observer);

        viewport.set_width(767);

        assert!(observer.is_mobile());
        assert_eq!(*seen.borrow(), vec![DeviceClass::Mobile]);
    }

    #[test]
    fn same_side_changes_are_silent() {
        let viewport = ManualViewport::new(1200);
        let observer = BreakpointObserver::new(&viewport, Breakpoint::DEFAULT);
        let (seen, _sub) = recorder(&observer);

        for width in [1100, 900, 768, 1920] {
            viewport.set_width(width);
        }

        assert!(seen.borrow().is_empty());
        assert_eq!(observer.class(), DeviceClass::Desktop);
    }

    #[test]
    fn round_trip_across_threshold() {
        let viewport = ManualViewport::new(1024);
        let observer = BreakpointObserver::new(&viewport, Breakpoint::DEFAULT);
        let (seen, _sub) = recorder(&observer);

        viewport.set_width(500);
        viewport.set_width(400);
        viewport.set_width(768);

        assert_eq!(*seen.borrow(), vec![DeviceClass::Mobile, DeviceClass::Desktop]);
    }

    #[test]
    fn width_set_from_a_subscriber_still_reclassifies() {
        let viewport = Rc::new(ManualViewport::new(800));
        let observer = BreakpointObserver::new(viewport.as_ref(), Breakpoint::DEFAULT);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        let v = viewport.clone();
        let _sub = observer.subscribe(move |class| {
            s.borrow_mut().push(class);
            if class.is_mobile() {
                v.set_width(1000);
            }
        });

        viewport.set_width(500);

        assert_eq!(viewport.current_width(), 1000);
        assert!(!observer.is_mobile());
        assert_eq!(*seen.borrow(), vec![DeviceClass::Mobile, DeviceClass::Desktop]);
    }

    #[test]
    fn on_viewport_change_reports_flip() {
        let viewport = ManualViewport::new(1024);
        let observer = BreakpointObserver::new(&viewport, Breakpoint::DEFAULT);
        assert!(!observer.on_viewport_change(900));
        assert!(observer.on_viewport_change(600));
        assert!(!observer.on_viewport_change(700));
    }

    #[test]
    fn dispose_is_idempotent_and_releases_once() {
        let viewport = ManualViewport::new(1024);
        let mut observer = BreakpointObserver::new(&viewport, Breakpoint::DEFAULT);
        assert_eq!(viewport.subscriber_count(), 1);

        observer.dispose();
        observer.dispose();
        drop(observer);

        assert_eq!(viewport.subscriber_count(), 0);
        assert_eq!(viewport.release_count(), 1);
    }

    #[test]
    fn no_notification_after_dispose() {
        let viewport = ManualViewport::new(1024);
        let mut observer = BreakpointObserver::new(&viewport, Breakpoint::DEFAULT);
        let (seen, _sub) = recorder(&observer);
        observer.dispose();

        viewport.set_width(320);
        assert!(!observer.on_viewport_change(320));

        assert!(seen.borrow().is_empty());
        assert_eq!(observer.class(), DeviceClass::Desktop);
        assert!(!observer.subscribe(|_| {}).is_active());
    }

    #[test]
    fn drop_releases_registration() {
        let viewport = ManualViewport::new(1024);
        {
            let _observer = BreakpointObserver::new(&viewport, Breakpoint::DEFAULT);
            assert_eq!(viewport.subscriber_count(), 1);
        }
        assert_eq!(viewport.subscriber_count(), 0);
        assert_eq!(viewport.release_count(), 1);
    }

    #[test]
    fn custom_breakpoint() {
        let viewport = ManualViewport::new(1000);
        let bp = Breakpoint::new(1024).expect("1024 is a valid breakpoint");
        let observer = BreakpointObserver::new(&viewport, bp);
        assert!(observer.is_mobile());
        assert_eq!(observer.breakpoint().px(), 1024);
    }

    #[test]
    fn invalid_breakpoints_fail_fast() {
        assert!(Breakpoint::new(0).is_err());
        assert!(Breakpoint::try_from(-5_i64).is_err());
        assert!(Breakpoint::try_from(0.0_f64).is_err());
        assert!(Breakpoint::try_from(767.5_f64).is_err());
        assert!(Breakpoint::try_from(f64::NAN).is_err());
        assert!(Breakpoint::try_from(f64::INFINITY).is_err());
        assert!(matches!(Breakpoint::try_from(640.0_f64), Ok(bp) if bp.px() == 640));
    }

    #[test]
    fn deserialize_rejects_zero() {
        assert!(serde_json::from_str::<Breakpoint>("0").is_err());
        assert!(matches!(serde_json::from_str::<Breakpoint>("1024"), Ok(bp) if bp.px() == 1024));
    }

    #[test]
    fn media_query_mirrors_classification() {
        assert_eq!(Breakpoint::DEFAULT.media_query(), "(max-width: 767px)");
        assert_eq!(Breakpoint::DEFAULT.to_string(), "768px");
    }
}
