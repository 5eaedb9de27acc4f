use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use fitview_protocol::ScaledLayout;
use tracing::{debug, warn};

use crate::config::FitConfig;
use crate::emitter::Emitter;
use crate::error::ConfigError;
use crate::scale::{compute_layout, sanitize_height};
use crate::viewport::{Subscription, ViewportSource};

/// Content that can report its natural height when laid out at a given width.
pub trait MeasureContent {
    fn intrinsic_height(&self, available_width: u32) -> f64;
}

impl<F: Fn(u32) -> f64> MeasureContent for F {
    fn intrinsic_height(&self, available_width: u32) -> f64 {
        self(available_width)
    }
}

/// Content whose height does not depend on the width it is given.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedHeight(pub f64);

impl MeasureContent for FixedHeight {
    fn intrinsic_height(&self, _available_width: u32) -> f64 {
        self.0
    }
}

struct ViewportState {
    config: FitConfig,
    width: Cell<u32>,
    layout: Cell<ScaledLayout>,
    content: RefCell<Box<dyn MeasureContent>>,
    disposed: Cell<bool>,
    changes: Emitter<ScaledLayout>,
}

impl ViewportState {
    fn measure(&self) -> f64 {
        // Content always gets the design width, whatever the scale.
        let raw = self
            .content
            .borrow()
            .intrinsic_height(self.config.design_width);
        if !(raw.is_finite() && raw >= 0.0) {
            warn!(height = raw, "content reported an unusable height, using 0");
        }
        sanitize_height(raw)
    }

    fn relayout(&self, width: u32) -> bool {
        if self.disposed.get() {
            return false;
        }
        self.width.set(width);
        let next = compute_layout(width, self.measure(), &self.config);
        if next == self.layout.get() {
            return false;
        }
        self.layout.set(next);
        debug!(
            width,
            scale = next.scale,
            visual_height = next.visual.h,
            "scaled layout changed"
        );
        self.changes.emit(next);
        true
    }
}

/// Fits fixed-width content into the viewport by uniform visual scaling.
///
/// The content is always measured at the design width; the published
/// [`ScaledLayout`] carries the scale to draw it at and the visual height the
/// surrounding flow must reserve. Recomputes on every width event from the
/// source and whenever the content is reported as changed.
pub struct ScaledViewport {
    state: Rc<ViewportState>,
    registration: Subscription,
}

impl ScaledViewport {
    pub fn new<S, C>(source: &S, content: C, config: FitConfig) -> Result<Self, ConfigError>
    where
        S: ViewportSource + ?Sized,
        C: MeasureContent + 'static,
    {
        config.validate()?;
        let width = source.current_width();
        let content: Box<dyn MeasureContent> = Box::new(content);
        let state = Rc::new(ViewportState {
            config,
            width: Cell::new(width),
            layout: Cell::new(compute_layout(width, 0.0, &config)),
            content: RefCell::new(content),
            disposed: Cell::new(false),
            changes: Emitter::new(),
        });
        state
            .layout
            .set(compute_layout(width, state.measure(), &state.config));
        let weak = Rc::downgrade(&state);
        let registration = source.subscribe(Box::new(move |width| {
            if let Some(state) = weak.upgrade() {
                state.relayout(width);
            }
        }));
        Ok(Self {
            state,
            registration,
        })
    }

    pub fn config(&self) -> &FitConfig {
        &self.state.config
    }

    pub fn layout(&self) -> ScaledLayout {
        self.state.layout.get()
    }

    pub fn scale(&self) -> f64 {
        self.layout().scale
    }

    pub fn visual_height(&self) -> f64 {
        self.layout().visual_height()
    }

    /// Call `listener` whenever the published layout changes.
    pub fn subscribe(&self, listener: impl FnMut(ScaledLayout) + 'static) -> Subscription {
        if self.state.disposed.get() {
            return Subscription::empty();
        }
        self.state.changes.subscribe(listener)
    }

    /// Recompute for a new viewport width. Returns whether the layout changed.
    pub fn on_viewport_change(&self, width: u32) -> bool {
        self.state.relayout(width)
    }

    /// Re-measure after the content reflowed internally.
    pub fn content_changed(&self) -> bool {
        self.state.relayout(self.state.width.get())
    }

    /// Swap in new content and re-measure.
    pub fn set_content(&self, content: impl MeasureContent + 'static) -> bool {
        if self.state.disposed.get() {
            return false;
        }
        *self.state.content.borrow_mut() = Box::new(content);
        self.content_changed()
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

impl Drop for ScaledViewport {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for ScaledViewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScaledViewport")
            .field("config", &self.state.config)
            .field("layout", &self.layout())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
