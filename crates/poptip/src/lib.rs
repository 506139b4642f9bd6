//! Tooltip lifecycle engine.
//!
//! A reference element (a button, a link) gains a floating popper whose
//! visibility, position and content follow user input and settings patches.
//! The crate provides:
//! - The runtime: [`Tooltips`], owning the document, task queue and [`Registry`]
//! - Settings: [`Settings`], [`SettingsInput`], single-key [`Setting`] patches
//! - Callbacks: [`Callbacks`] with [`HookContext`] / [`WaitContext`]
//! - Placement: the [`PlacementSolver`] contract and the built-in [`RectSolver`]
//!
//! Everything is single-threaded and driven by the host: events go in through
//! [`Tooltips::dispatch`], time moves with [`Tooltips::advance`] and
//! [`Tooltips::run_frame`], and the renderer reports finished CSS transitions
//! with [`Tooltips::transition_end`].
//!
//! ```
//! use poptip::{Callbacks, Document, SettingsInput, Tooltips};
//!
//! let mut doc = Document::new();
//! let button = doc.create_element("button");
//! doc.set_attribute(button, "title", "Save changes");
//! doc.append_child(doc.body(), button);
//!
//! let mut tips = Tooltips::new(doc);
//! let instance = tips
//!     .create(button, SettingsInput::default(), Callbacks::new())
//!     .unwrap();
//! let popper = tips.instance(instance).unwrap().poppers()[0];
//!
//! tips.show(popper);
//! assert!(tips.is_visible(popper));
//! tips.run_timers();
//! tips.hide(popper);
//! tips.run_timers();
//! assert!(!tips.document().is_connected(popper));
//! ```

mod callbacks;
mod config;
mod engine;
mod error;
mod evaluate;
pub mod factory;
mod global;
mod handlers;
mod listeners;
mod placement;
mod record;
mod registry;
mod settings;
mod sticky;
mod task;

pub use callbacks::{Callbacks, ContentHook, Hook, HookContext, WaitContext, WaitHook};
pub use config::Environment;
pub use engine::{Instance, InstanceId, PopperId, ShowGate, Target, Tooltips};
pub use error::{ConfigError, Error, LookupError};
pub use evaluate::evaluate;
pub use global::{cursor_outside_interactive_border, TouchState, TOUCH_CLASS};
pub use listeners::{listeners_for, listeners_for_event, Handler, Listener};
pub use placement::{
    compute_placement, FlipModifier, Modifiers, ModifiersInput, OffsetModifier, Placement,
    PlacementHandle, PlacementSolver, PopperOptions, PopperOptionsInput, RectHandle, RectSolver,
};
pub use record::{
    InteractiveWatch, PendingTransition, Phase, RecordTimers, TooltipRecord, TransitionKind,
};
pub use registry::Registry;
pub use settings::{
    Alignment, Animation, AppendTo, ContainerResolver, HideOnClick, HtmlContent, Position,
    Setting, Settings, SettingsInput, Side, Timing, TooltipSize, Trigger, TriggerEvent,
};
pub use sticky::follow_cursor_position;
pub use task::Task;

pub use poptip_core::{Document, DomEvent, ElementId, EventKind, Point, Rect, Size};
