//! # Event Bus Module
//!
//! Typed publish/subscribe between the editing core and the UI collaborators
//! (toolbars, cursors, output sinks).
//!
//! ## Overview
//!
//! - The editor publishes typed [`AppEvent`]s without knowing subscribers
//! - Subscribers filter by [`EventCategory`] and receive matching events
//! - Async consumers can take a broadcast receiver instead of a callback
//!
//! ## Usage
//!
//! ```rust,ignore
//! use geoedit_core::event_bus::{AppEvent, EventBus, EventCategory, EventFilter, OutputEvent};
//!
//! let bus = EventBus::new();
//! let subscription = bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::Output]),
//!     |event| {
//!         if let AppEvent::Output(OutputEvent::Changed { geojson, .. }) = event {
//!             form_field.set_value(&geojson);
//!         }
//!     },
//! );
//!
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
