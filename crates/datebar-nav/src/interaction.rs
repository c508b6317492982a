//! Interaction resolution.
//!
//! Raw pointer events are reduced to an [`Interaction`] and then resolved
//! against the navbar state into a [`NavAction`].

use serde::{Deserialize, Serialize};

use datebar_core::{CalendarDate, NavbarSettings, OpenType, PaneType};

use crate::note::NoteRef;
use crate::state::{NavState, WeekDirection};

/// Kind of pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionKind {
    /// Primary click.
    Click,
    /// Click with a non-primary button.
    AuxClick,
    /// Anything else the host forwards.
    Other,
}

/// Which pointer button was used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerButton {
    #[default]
    Primary,
    Middle,
    Secondary,
}

/// Modifier keys held during the interaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    pub ctrl: bool,
    /// Cmd on macOS, the Windows key elsewhere.
    pub meta: bool,
    pub alt: bool,
    pub shift: bool,
}

/// A pointer event as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: InteractionKind,
    pub button: PointerButton,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// A plain primary click.
    pub fn click() -> Self {
        Self {
            kind: InteractionKind::Click,
            button: PointerButton::Primary,
            modifiers: Modifiers::default(),
        }
    }

    /// A secondary-button aux click.
    pub fn aux_click() -> Self {
        Self {
            kind: InteractionKind::AuxClick,
            button: PointerButton::Secondary,
            modifiers: Modifiers::default(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Pane the user asked for through modifiers, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaneOpenHint {
    /// A concrete pane-opening modifier.
    Pane(PaneType),
    /// Modifiers were held but they do not mean "open elsewhere".
    NotAPaneModifier,
    #[default]
    None,
}

/// Interprets platform modifiers as a pane-open intent.
pub trait PaneHintClassifier {
    fn classify(&self, event: &PointerEvent) -> PaneOpenHint;
}

/// Default keymap: middle button opens a tab, `Mod+Alt+Shift` a window,
/// `Mod+Alt` a split and `Mod` a tab. `Mod` is Cmd on macOS and Ctrl
/// elsewhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostKeymap {
    pub mac: bool,
}

impl HostKeymap {
    pub fn new(mac: bool) -> Self {
        Self { mac }
    }

    /// Keymap for the platform this binary was built for.
    pub fn native() -> Self {
        Self::new(cfg!(target_os = "macos"))
    }

    fn mod_held(&self, modifiers: &Modifiers) -> bool {
        if self.mac { modifiers.meta } else { modifiers.ctrl }
    }
}

impl PaneHintClassifier for HostKeymap {
    fn classify(&self, event: &PointerEvent) -> PaneOpenHint {
        if event.button == PointerButton::Middle {
            return PaneOpenHint::Pane(PaneType::Tab);
        }

        let m = &event.modifiers;
        match (self.mod_held(m), m.alt, m.shift) {
            (true, true, true) => PaneOpenHint::Pane(PaneType::Window),
            (true, true, false) => PaneOpenHint::Pane(PaneType::Split),
            (true, false, true) => PaneOpenHint::NotAPaneModifier,
            (true, false, false) => PaneOpenHint::Pane(PaneType::Tab),
            _ => PaneOpenHint::None,
        }
    }
}

/// An interaction reduced to what resolution needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interaction {
    pub kind: InteractionKind,
    pub ctrl_or_cmd_held: bool,
    pub pane_hint: PaneOpenHint,
}

impl Interaction {
    pub fn new(kind: InteractionKind) -> Self {
        Self {
            kind,
            ctrl_or_cmd_held: false,
            pane_hint: PaneOpenHint::None,
        }
    }

    /// Reduce a pointer event using the host's classifier.
    pub fn from_event(event: &PointerEvent, classifier: &dyn PaneHintClassifier) -> Self {
        Self {
            kind: event.kind,
            ctrl_or_cmd_held: event.modifiers.ctrl || event.modifiers.meta,
            pane_hint: classifier.classify(event),
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl_or_cmd_held = true;
        self
    }

    pub fn with_hint(mut self, hint: PaneOpenHint) -> Self {
        self.pane_hint = hint;
        self
    }
}

/// What was interacted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionTarget {
    Date(CalendarDate),
    WeeklyNote(CalendarDate),
    ChangeWeek(WeekDirection),
}

impl InteractionTarget {
    fn note(self) -> Option<NoteRef> {
        match self {
            Self::Date(date) => Some(NoteRef::Daily(date)),
            Self::WeeklyNote(week_start) => Some(NoteRef::Weekly(week_start)),
            Self::ChangeWeek(_) => None,
        }
    }
}

/// Outcome of resolving an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NavAction {
    Open { note: NoteRef, open_type: OpenType },
    ShowContextMenu(NoteRef),
    ShiftWeek(WeekDirection),
    NoOp,
}

/// Resolve `interaction` on `target`.
///
/// For notes the first matching rule wins:
/// 1. a concrete pane hint opens there, even on aux click;
/// 2. a click opens in a new tab when Ctrl/Cmd is held, otherwise with the
///    configured open type, except that re-opening the active day in the
///    active pane is a no-op;
/// 3. an aux click shows the context menu;
/// 4. anything else is a no-op.
///
/// Week controls only react to clicks.
pub fn handle_interaction(
    state: &NavState,
    settings: &NavbarSettings,
    interaction: &Interaction,
    target: InteractionTarget,
) -> NavAction {
    let note = match target.note() {
        Some(note) => note,
        None => {
            return match (target, interaction.kind) {
                (InteractionTarget::ChangeWeek(direction), InteractionKind::Click) => {
                    NavAction::ShiftWeek(direction)
                }
                _ => NavAction::NoOp,
            };
        }
    };

    if let PaneOpenHint::Pane(pane) = interaction.pane_hint {
        return NavAction::Open {
            note,
            open_type: pane.into(),
        };
    }

    match interaction.kind {
        InteractionKind::Click => {
            let open_type = if interaction.ctrl_or_cmd_held {
                OpenType::NewTab
            } else {
                match note {
                    NoteRef::Daily(_) => settings.default_open_type,
                    NoteRef::Weekly(_) => settings.weekly_note_open_type,
                }
            };

            let reopens_active = matches!(note, NoteRef::Daily(date) if state.is_active(date));
            if open_type == OpenType::ActivePane && reopens_active {
                NavAction::NoOp
            } else {
                NavAction::Open { note, open_type }
            }
        }
        InteractionKind::AuxClick => NavAction::ShowContextMenu(note),
        InteractionKind::Other => NavAction::NoOp,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::state::ViewId;

    fn ymd(y: i32, m: u32, d: u32) -> CalendarDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ctrl() -> Modifiers {
        Modifiers {
            ctrl: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_keymap_hints() {
        let keymap = HostKeymap::new(false);
        let hint = |modifiers| keymap.classify(&PointerEvent::click().with_modifiers(modifiers));

        assert_eq!(hint(Modifiers::default()), PaneOpenHint::None);
        assert_eq!(hint(ctrl()), PaneOpenHint::Pane(PaneType::Tab));
        assert_eq!(
            hint(Modifiers { alt: true, ..ctrl() }),
            PaneOpenHint::Pane(PaneType::Split)
        );
        assert_eq!(
            hint(Modifiers {
                alt: true,
                shift: true,
                ..ctrl()
            }),
            PaneOpenHint::Pane(PaneType::Window)
        );
        assert_eq!(hint(Modifiers { shift: true, ..ctrl() }), PaneOpenHint::NotAPaneModifier);
        assert_eq!(
            hint(Modifiers {
                meta: true,
                ..Default::default()
            }),
            PaneOpenHint::None
        );
    }

    #[test]
    fn test_keymap_mac_uses_cmd() {
        let keymap = HostKeymap::new(true);
        let cmd = Modifiers {
            meta: true,
            ..Default::default()
        };
        assert_eq!(
            keymap.classify(&PointerEvent::click().with_modifiers(cmd)),
            PaneOpenHint::Pane(PaneType::Tab)
        );
        assert_eq!(keymap.classify(&PointerEvent::click().with_modifiers(ctrl())), PaneOpenHint::None);
    }

    #[test]
    fn test_middle_button_is_tab() {
        let event = PointerEvent {
            kind: InteractionKind::AuxClick,
            button: PointerButton::Middle,
            modifiers: Modifiers::default(),
        };
        assert_eq!(HostKeymap::new(false).classify(&event), PaneOpenHint::Pane(PaneType::Tab));
    }

    #[test]
    fn test_from_event() {
        let event = PointerEvent::click().with_modifiers(Modifiers { shift: true, ..ctrl() });
        let interaction = Interaction::from_event(&event, &HostKeymap::new(false));
        assert!(interaction.ctrl_or_cmd_held);
        assert_eq!(interaction.pane_hint, PaneOpenHint::NotAPaneModifier);
    }

    #[test]
    fn test_ctrl_click_overrides_default() {
        let state = NavState::new(ViewId::new(1), ymd(2024, 6, 12));
        let settings = NavbarSettings {
            default_open_type: OpenType::NewWindow,
            ..Default::default()
        };
        let click = Interaction::new(InteractionKind::Click).with_ctrl();

        assert_eq!(
            handle_interaction(&state, &settings, &click, InteractionTarget::Date(ymd(2024, 6, 12))),
            NavAction::Open {
                note: NoteRef::Daily(ymd(2024, 6, 12)),
                open_type: OpenType::NewTab,
            }
        );
    }

    #[test]
    fn test_plain_click_on_active_is_noop() {
        let state = NavState::new(ViewId::new(1), ymd(2024, 6, 12));
        let settings = NavbarSettings::default();
        let click = Interaction::new(InteractionKind::Click);

        assert_eq!(
            handle_interaction(&state, &settings, &click, InteractionTarget::Date(ymd(2024, 6, 12))),
            NavAction::NoOp
        );
        assert_eq!(
            handle_interaction(&state, &settings, &click, InteractionTarget::Date(ymd(2024, 6, 13))),
            NavAction::Open {
                note: NoteRef::Daily(ymd(2024, 6, 13)),
                open_type: OpenType::ActivePane,
            }
        );
    }

    #[test]
    fn test_pane_hint_wins_on_aux_click() {
        let state = NavState::new(ViewId::new(1), ymd(2024, 6, 12));
        let aux = Interaction::new(InteractionKind::AuxClick).with_hint(PaneOpenHint::Pane(PaneType::Split));

        assert_eq!(
            handle_interaction(&state, &NavbarSettings::default(), &aux, InteractionTarget::Date(ymd(2024, 6, 12))),
            NavAction::Open {
                note: NoteRef::Daily(ymd(2024, 6, 12)),
                open_type: OpenType::NewSplit,
            }
        );
    }

    #[test]
    fn test_aux_click_shows_menu() {
        let state = NavState::new(ViewId::new(1), ymd(2024, 6, 12));
        let aux = Interaction::new(InteractionKind::AuxClick).with_hint(PaneOpenHint::NotAPaneModifier);
        let target = InteractionTarget::WeeklyNote(ymd(2024, 6, 10));

        assert_eq!(
            handle_interaction(&state, &NavbarSettings::default(), &aux, target),
            NavAction::ShowContextMenu(NoteRef::Weekly(ymd(2024, 6, 10)))
        );
    }

    #[test]
    fn test_weekly_click_uses_weekly_open_type() {
        let state = NavState::new(ViewId::new(1), ymd(2024, 6, 10));
        let settings = NavbarSettings {
            weekly_note_open_type: OpenType::NewSplit,
            ..Default::default()
        };
        let click = Interaction::new(InteractionKind::Click);

        assert_eq!(
            handle_interaction(&state, &settings, &click, InteractionTarget::WeeklyNote(ymd(2024, 6, 10))),
            NavAction::Open {
                note: NoteRef::Weekly(ymd(2024, 6, 10)),
                open_type: OpenType::NewSplit,
            }
        );
    }

    #[test]
    fn test_week_controls() {
        let state = NavState::new(ViewId::new(1), ymd(2024, 6, 12));
        let settings = NavbarSettings::default();
        let target = InteractionTarget::ChangeWeek(WeekDirection::Next);

        assert_eq!(
            handle_interaction(&state, &settings, &Interaction::new(InteractionKind::Click), target),
            NavAction::ShiftWeek(WeekDirection::Next)
        );
        assert_eq!(
            handle_interaction(&state, &settings, &Interaction::new(InteractionKind::AuxClick), target),
            NavAction::NoOp
        );
    }

    #[test]
    fn test_other_kind_is_noop() {
        let state = NavState::new(ViewId::new(1), ymd(2024, 6, 12));
        let other = Interaction::new(InteractionKind::Other);
        assert_eq!(
            handle_interaction(&state, &NavbarSettings::default(), &other, InteractionTarget::Date(ymd(2024, 6, 1))),
            NavAction::NoOp
        );
    }
}
