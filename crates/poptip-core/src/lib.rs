//! Core types for the poptip tooltip engine.
//!
//! This crate provides the host-facing primitives the engine runs on:
//! - Geometric primitives: [`Point`], [`Size`], [`Rect`]
//! - A headless document: [`Document`], [`ElementId`]
//! - Input events: [`DomEvent`], [`EventKind`]
//! - Element queries: [`Selector`]
//! - Cooperative scheduling: [`TaskQueue`]

mod dom;
mod event;
mod geometry;
mod scheduler;
mod selector;

pub use dom::{Document, ElementId, ObserverId};
pub use event::{DomEvent, EventKind};
pub use geometry::{Point, Rect, Size};
pub use scheduler::{TaskId, TaskQueue};
pub use selector::{Selector, SelectorError, SelectorParser};
