#![allow(clippy::unwrap_used)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::new_without_default)]
#![allow(clippy::missing_const_for_fn)]
//! Testing harness for poptip tooltips.
//!
//! Wraps a [`Tooltips`] runtime with fixture builders and event helpers so
//! scenario tests read like user interactions:
//!
//! ```
//! use poptip_test::Harness;
//! use poptip::SettingsInput;
//!
//! let mut h = Harness::new();
//! let el = h.element();
//! let popper = h.create_one(el, SettingsInput::default());
//!
//! h.mouse_enter(el);
//! assert!(h.is_visible(popper));
//! h.settle();
//! h.mouse_leave(el);
//! h.settle();
//! assert!(!h.is_mounted(popper));
//! ```

mod harness;
mod logging;
mod solver;

pub use harness::{CallCounter, Harness, FIXTURE_CLASS, FIXTURE_TITLE};
pub use logging::{init_logging, with_captured_logs, CapturedEvent};
pub use solver::{RecordingSolver, SolverLog};
