//! Navigation for datebar.
//!
//! This crate holds everything that turns settings and a selected date into
//! a navbar a host can draw, and turns pointer input back into navigation:
//!
//! - [`NavState`]: anchor date and week offset of one view
//! - [`render`]: classification of every button in the current window
//! - [`handle_interaction`]: resolution of clicks into [`NavAction`]s
//! - [`Navbar`] and [`NavbarManager`]: per-view controllers and their registry
//! - [`FsVault`]: a markdown vault on disk implementing the host traits

mod classify;
mod error;
mod host;
mod interaction;
mod manager;
mod menu;
mod navbar;
mod note;
mod state;
mod vault;

pub use classify::{
    ButtonSpec, NavbarItem, NavbarView, StateTag, WeeklyButtonSpec, classify_date, classify_week, render,
};
pub use error::{NavbarError, NavbarResult};
pub use host::{BoxFuture, LinkBuilder, NoteIndex, NoteOpener, NoteResolver, ObsidianLinks};
pub use interaction::{
    HostKeymap, Interaction, InteractionKind, InteractionTarget, Modifiers, NavAction, PaneHintClassifier,
    PaneOpenHint, PointerButton, PointerEvent, handle_interaction,
};
pub use manager::NavbarManager;
pub use menu::{ContextMenu, MenuItem};
pub use navbar::{Navbar, Outcome};
pub use note::{NoteFile, NoteRef};
pub use state::{NavState, ViewId, WeekDirection};
pub use vault::FsVault;
