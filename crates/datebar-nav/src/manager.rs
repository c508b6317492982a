//! Registry of navbars, one per attached view.

use std::sync::Arc;

use indexmap::IndexMap;
use itertools::Itertools;
use tokio_util::sync::CancellationToken;

use datebar_core::{CalendarDate, NavbarSettings};

use crate::classify::NavbarView;
use crate::error::{NavbarError, NavbarResult};
use crate::host::{NoteIndex, NoteOpener};
use crate::interaction::{Interaction, InteractionTarget, NavAction};
use crate::navbar::{Navbar, Outcome};
use crate::state::ViewId;

/// Owns every navbar and the settings snapshot they render with.
#[derive(Debug)]
pub struct NavbarManager {
    /// Current settings snapshot.
    settings: Arc<NavbarSettings>,

    /// Navbars keyed by view, in attach order.
    navbars: IndexMap<ViewId, Navbar>,

    /// Parent of every navbar's cancellation token.
    shutdown: CancellationToken,

    next_id: u64,
}

impl NavbarManager {
    /// Create a manager. Settings are sanitized on the way in.
    pub fn new(settings: NavbarSettings) -> Self {
        Self {
            settings: Arc::new(settings.sanitized()),
            navbars: IndexMap::new(),
            shutdown: CancellationToken::new(),
            next_id: 1,
        }
    }

    /// Current settings snapshot.
    pub fn settings(&self) -> Arc<NavbarSettings> {
        Arc::clone(&self.settings)
    }

    /// Attach a navbar to a new view.
    ///
    /// The anchor is the date in `file_stem` when it names a daily note and
    /// `today` otherwise.
    pub fn add_navbar(&mut self, file_stem: Option<&str>, today: CalendarDate) -> ViewId {
        let view_id = ViewId::new(self.next_id);
        self.next_id += 1;

        let mut navbar = Navbar::with_token(view_id, today, self.shutdown.child_token());
        navbar.sync_file(file_stem, &self.settings);
        let anchor = navbar.state().anchor_date();
        self.navbars.insert(view_id, navbar);
        tracing::info!(view = %view_id, %anchor, "navbar attached");
        view_id
    }

    /// Detach and dispose a view's navbar. Returns `false` if it was unknown.
    pub fn remove_navbar(&mut self, view_id: ViewId) -> bool {
        match self.navbars.shift_remove(&view_id) {
            Some(navbar) => {
                navbar.dispose();
                tracing::info!(view = %view_id, "navbar removed");
                true
            }
            None => false,
        }
    }

    pub fn navbar(&self, view_id: ViewId) -> Option<&Navbar> {
        self.navbars.get(&view_id)
    }

    pub fn view_ids(&self) -> Vec<ViewId> {
        self.navbars.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.navbars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.navbars.is_empty()
    }

    fn navbar_mut(&mut self, view_id: ViewId) -> NavbarResult<&mut Navbar> {
        self.navbars
            .get_mut(&view_id)
            .ok_or(NavbarError::UnknownView { view: view_id })
    }

    /// The file shown in a view changed.
    pub fn file_changed(&mut self, view_id: ViewId, file_stem: Option<&str>) -> NavbarResult<bool> {
        let settings = Arc::clone(&self.settings);
        Ok(self.navbar_mut(view_id)?.sync_file(file_stem, &settings))
    }

    /// Render one view.
    pub fn rerender(
        &mut self,
        view_id: ViewId,
        today: CalendarDate,
        index: &dyn NoteIndex,
    ) -> NavbarResult<NavbarView> {
        let settings = Arc::clone(&self.settings);
        self.navbar_mut(view_id)?.render(&settings, today, index)
    }

    /// Render every view, in attach order. A view that fails to render does
    /// not stop the others.
    pub fn rerender_all(&mut self, today: CalendarDate, index: &dyn NoteIndex) -> Vec<NavbarResult<NavbarView>> {
        let settings = Arc::clone(&self.settings);
        self.navbars
            .values_mut()
            .map(|navbar| {
                navbar.render(&settings, today, index).inspect_err(|e| {
                    tracing::warn!(view = %navbar.view_id(), error = %e, "render failed");
                })
            })
            .collect()
    }

    /// Swap in new settings and re-render every view with them.
    pub fn update_settings(
        &mut self,
        settings: NavbarSettings,
        today: CalendarDate,
        index: &dyn NoteIndex,
    ) -> Vec<NavbarResult<NavbarView>> {
        self.settings = Arc::new(settings.sanitized());
        tracing::debug!(
            views = %self.navbars.keys().join(", "),
            "settings changed, re-rendering"
        );
        self.rerender_all(today, index)
    }

    /// Resolve and apply an interaction on a view.
    pub fn handle_interaction(
        &mut self,
        view_id: ViewId,
        interaction: &Interaction,
        target: InteractionTarget,
        opener: &dyn NoteOpener,
    ) -> NavbarResult<Outcome> {
        let settings = Arc::clone(&self.settings);
        self.navbar_mut(view_id)?
            .handle_interaction(&settings, interaction, target, opener)
    }

    /// Apply an already resolved action, such as a context menu choice.
    pub fn apply(&mut self, view_id: ViewId, action: NavAction, opener: &dyn NoteOpener) -> NavbarResult<Outcome> {
        let settings = Arc::clone(&self.settings);
        self.navbar_mut(view_id)?.apply(action, &settings, opener)
    }

    /// Dispose every navbar. The manager can attach new views afterwards.
    pub fn shutdown(&mut self) {
        std::mem::replace(&mut self.shutdown, CancellationToken::new()).cancel();
        let count = self.navbars.len();
        self.navbars.clear();
        tracing::info!(count, "all navbars disposed");
    }
}

impl Default for NavbarManager {
    fn default() -> Self {
        Self::new(NavbarSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use datebar_core::OpenType;

    use super::*;
    use crate::interaction::InteractionKind;
    use crate::note::NoteRef;
    use crate::state::WeekDirection;

    fn ymd(y: i32, m: u32, d: u32) -> CalendarDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    struct NoNotes;

    impl NoteIndex for NoNotes {
        fn daily_note_exists(&self, _date: CalendarDate) -> NavbarResult<bool> {
            Ok(false)
        }

        fn weekly_note_exists(&self, _week_start: CalendarDate) -> NavbarResult<bool> {
            Ok(false)
        }
    }

    struct NoOpener;

    impl NoteOpener for NoOpener {
        fn open_note(&self, _note: NoteRef, _open_type: OpenType, _set_active: bool) -> NavbarResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_add_navbar_anchors() {
        let mut manager = NavbarManager::default();
        let today = ymd(2024, 6, 12);

        let daily = manager.add_navbar(Some("2024-01-01"), today);
        let other = manager.add_navbar(Some("Inbox"), today);

        assert_ne!(daily, other);
        assert_eq!(manager.navbar(daily).unwrap().state().anchor_date(), ymd(2024, 1, 1));
        assert_eq!(manager.navbar(other).unwrap().state().anchor_date(), today);
        assert_eq!(manager.view_ids(), vec![daily, other]);
    }

    #[test]
    fn test_views_are_independent() {
        let mut manager = NavbarManager::default();
        let today = ymd(2024, 6, 12);
        let a = manager.add_navbar(None, today);
        let b = manager.add_navbar(None, today);

        let outcome = manager
            .handle_interaction(
                a,
                &Interaction::new(InteractionKind::Click),
                InteractionTarget::ChangeWeek(WeekDirection::Next),
                &NoOpener,
            )
            .unwrap();

        assert_eq!(outcome, Outcome::Rerender);
        assert_eq!(manager.navbar(a).unwrap().state().week_offset(), 1);
        assert_eq!(manager.navbar(b).unwrap().state().week_offset(), 0);
    }

    #[test]
    fn test_remove_disposes() {
        let mut manager = NavbarManager::default();
        let view = manager.add_navbar(None, ymd(2024, 6, 12));

        assert!(manager.remove_navbar(view));
        assert!(!manager.remove_navbar(view));
        assert!(manager.is_empty());
        assert_eq!(
            manager.file_changed(view, Some("2024-06-01")),
            Err(NavbarError::UnknownView { view })
        );
    }

    #[test]
    fn test_update_settings_broadcasts() {
        let mut manager = NavbarManager::default();
        let today = ymd(2024, 6, 12);
        manager.add_navbar(None, today);
        manager.add_navbar(None, today);

        let settings = NavbarSettings {
            show_extra_buttons: true,
            date_format: String::new(),
            ..Default::default()
        };
        let views = manager
            .update_settings(settings, today, &NoNotes)
            .into_iter()
            .collect::<NavbarResult<Vec<_>>>()
            .unwrap();

        assert_eq!(views.len(), 2);
        assert!(views.iter().all(|view| view.date_buttons().count() == 9));
        assert_eq!(manager.settings().date_format, "ddd");
    }

    #[test]
    fn test_update_settings_reanchors_on_new_daily_format() {
        let mut manager = NavbarManager::default();
        let today = ymd(2024, 6, 12);
        let dotted = manager.add_navbar(Some("01.07.2024"), today);
        let iso = manager.add_navbar(Some("2024-05-20"), today);
        assert_eq!(manager.navbar(dotted).unwrap().state().anchor_date(), today);

        let settings = NavbarSettings {
            daily_note_date_format: "DD.MM.YYYY".to_string(),
            ..Default::default()
        };
        let views = manager.update_settings(settings, today, &NoNotes);

        assert_eq!(views[0].as_ref().unwrap().anchor_date, ymd(2024, 7, 1));
        assert_eq!(manager.navbar(dotted).unwrap().state().anchor_date(), ymd(2024, 7, 1));
        // No longer a daily note name, so the anchor stays put
        assert_eq!(views[1].as_ref().unwrap().anchor_date, ymd(2024, 5, 20));
        assert_eq!(manager.navbar(iso).unwrap().file_stem(), Some("2024-05-20"));
    }

    #[test]
    fn test_rerender_all_keeps_going_past_a_failed_view() {
        let mut manager = NavbarManager::default();
        manager.add_navbar(None, NaiveDate::MAX);
        manager.add_navbar(None, ymd(2024, 6, 12));

        let views = manager.rerender_all(ymd(2024, 6, 12), &NoNotes);
        assert_eq!(
            views[0],
            Err(NavbarError::DateOutOfRange { date: NaiveDate::MAX })
        );
        assert!(views[1].is_ok());
    }
}
