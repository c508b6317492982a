//! Navbar controller.
//!
//! A [`Navbar`] owns the [`NavState`] of one view and is the only thing that
//! mutates it. It remembers the name of the view's file so every render can
//! re-read the file's date with the settings of that render. Settings are
//! passed in on every call; the controller never holds on to them.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use datebar_core::{CalendarDate, NavbarSettings, OpenType, parse_date_from_filename};

use crate::classify::{self, NavbarView};
use crate::error::{NavbarError, NavbarResult};
use crate::host::{BoxFuture, LinkBuilder, NoteIndex, NoteOpener, NoteResolver};
use crate::interaction::{self, Interaction, InteractionTarget, NavAction};
use crate::menu::ContextMenu;
use crate::note::NoteRef;
use crate::state::{NavState, ViewId};

/// What the host should do after an action was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// State changed; render again.
    Rerender,
    /// The note was handed to the opener.
    Opened { note: NoteRef, open_type: OpenType },
    /// Show this menu at the pointer.
    ContextMenu(ContextMenu),
    Nothing,
}

/// Controller for a single view's navbar.
#[derive(Debug)]
pub struct Navbar {
    state: NavState,
    /// Name of the view's file, without extension.
    file_stem: Option<String>,
    cancel: CancellationToken,
}

impl Navbar {
    /// Create a navbar with its own cancellation scope.
    pub fn new(view_id: ViewId, anchor_date: CalendarDate) -> Self {
        Self::with_token(view_id, anchor_date, CancellationToken::new())
    }

    /// Create a navbar whose pending work is cancelled with `cancel`.
    pub fn with_token(view_id: ViewId, anchor_date: CalendarDate, cancel: CancellationToken) -> Self {
        Self {
            state: NavState::new(view_id, anchor_date),
            file_stem: None,
            cancel,
        }
    }

    pub fn view_id(&self) -> ViewId {
        self.state.view_id()
    }

    pub fn state(&self) -> &NavState {
        &self.state
    }

    pub fn file_stem(&self) -> Option<&str> {
        self.file_stem.as_deref()
    }

    /// Track the file open in the view.
    ///
    /// `file_stem` is the file name without extension. Names that do not
    /// parse with the daily note format leave the state alone.
    pub fn sync_file(&mut self, file_stem: Option<&str>, settings: &NavbarSettings) -> bool {
        self.file_stem = file_stem.map(str::to_owned);
        self.refresh_anchor(settings)
    }

    /// Re-read the stored file's date and reset the anchor if it moved.
    fn refresh_anchor(&mut self, settings: &NavbarSettings) -> bool {
        let file_date = self.file_stem.as_deref().and_then(|stem| {
            parse_date_from_filename(stem, &settings.daily_note_date_format, settings.first_day_of_week)
        });
        self.state.file_changed(file_date)
    }

    /// Compute the bar, first syncing the anchor with the view's file.
    pub fn render(
        &mut self,
        settings: &NavbarSettings,
        today: CalendarDate,
        index: &dyn NoteIndex,
    ) -> NavbarResult<NavbarView> {
        self.refresh_anchor(settings);
        classify::render(&self.state, settings, today, index)
    }

    /// Resolve an interaction without applying it.
    pub fn resolve(
        &self,
        settings: &NavbarSettings,
        interaction: &Interaction,
        target: InteractionTarget,
    ) -> NavAction {
        interaction::handle_interaction(&self.state, settings, interaction, target)
    }

    /// Apply a resolved action.
    pub fn apply(
        &mut self,
        action: NavAction,
        settings: &NavbarSettings,
        opener: &dyn NoteOpener,
    ) -> NavbarResult<Outcome> {
        if self.is_disposed() {
            return Err(NavbarError::Cancelled { view: self.view_id() });
        }

        match action {
            NavAction::ShiftWeek(direction) => {
                self.state.shift_week(direction);
                Ok(Outcome::Rerender)
            }
            NavAction::Open { note, open_type } => {
                tracing::debug!(view = %self.view_id(), %note, %open_type, "opening note");
                opener.open_note(note, open_type, settings.set_active)?;
                Ok(Outcome::Opened { note, open_type })
            }
            NavAction::ShowContextMenu(note) => Ok(Outcome::ContextMenu(ContextMenu::for_note(note))),
            NavAction::NoOp => Ok(Outcome::Nothing),
        }
    }

    /// Resolve and apply an interaction.
    pub fn handle_interaction(
        &mut self,
        settings: &NavbarSettings,
        interaction: &Interaction,
        target: InteractionTarget,
        opener: &dyn NoteOpener,
    ) -> NavbarResult<Outcome> {
        let action = self.resolve(settings, interaction, target);
        self.apply(action, settings, opener)
    }

    /// Build the shareable link for `note`.
    ///
    /// The returned future resolves to `Cancelled` if the navbar is disposed
    /// before the resolver answers.
    pub fn copy_link(
        &self,
        note: NoteRef,
        vault_name: String,
        resolver: Arc<dyn NoteResolver>,
        links: Arc<dyn LinkBuilder>,
    ) -> BoxFuture<'static, NavbarResult<String>> {
        let view = self.view_id();
        let token = self.cancel.child_token();

        Box::pin(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => Err(NavbarError::Cancelled { view }),
                resolved = resolver.resolve_note(note) => {
                    let file = resolved?;
                    Ok(links.build_link(&vault_name, &file))
                }
            }
        })
    }

    /// Cancel pending work. Further actions fail with `Cancelled`.
    pub fn dispose(&self) {
        tracing::debug!(view = %self.view_id(), "disposing navbar");
        self.cancel.cancel();
    }

    pub fn is_disposed(&self) -> bool {
        self.cancel.is_cancelled()
    }
}
