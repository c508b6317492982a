//! datebar - A week-at-a-glance navigator for daily and weekly notes.
//!
//! Usage:
//!   datebar render [--anchor DATE]    Show the navbar for a week
//!   datebar click DATE [--ctrl ...]   Resolve a click on a button
//!   datebar link DATE                 Print the shareable URL of a note
//!   datebar parse NAME                Recognize the date in a file name
//!   datebar format DATE               Format a date with a pattern
//!   datebar config                    Show or initialize settings
//!   datebar --help                    Show help

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result, bail, eyre};
use tracing_subscriber::EnvFilter;

use datebar_core::{
    CalendarDate, FirstDayOfWeek, NavbarSettings, OpenType, format_date, parse_date_from_filename, today, weekly_anchor,
};
use datebar_nav::{
    FsVault, HostKeymap, Interaction, InteractionKind, InteractionTarget, MenuItem, Modifiers, NavAction,
    NavbarItem, NavbarManager, NavbarResult, NavbarView, NoteOpener, NoteRef, ObsidianLinks, Outcome,
    PointerButton, PointerEvent, StateTag, ViewId, WeekDirection,
};

#[derive(Parser)]
#[command(
    name = "datebar",
    version,
    about = "A week-at-a-glance navigator for daily and weekly notes",
    long_about = "datebar shows the week around a daily note, marks which days have notes \
                  and resolves clicks into navigation the way an editor navbar would."
)]
struct Cli {
    /// Vault directory holding the notes
    #[arg(short, long, global = true, default_value = ".")]
    vault: PathBuf,

    /// Settings file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Command,
}

/// Settings that can be overridden per invocation.
#[derive(Args)]
struct Overrides {
    /// First day of the displayed week (sunday or monday)
    #[arg(long, global = true)]
    first_day: Option<FirstDayOfWeek>,

    /// Show the extra last-Sunday / next-Monday buttons
    #[arg(long, global = true)]
    extra: bool,

    /// Show the weekly note button
    #[arg(long, global = true)]
    weekly_button: bool,

    /// Folder of daily notes inside the vault
    #[arg(long, global = true)]
    daily_folder: Option<PathBuf>,

    /// Folder of weekly notes inside the vault
    #[arg(long, global = true)]
    weekly_folder: Option<PathBuf>,

    /// Pretend today is this date
    #[arg(long, global = true)]
    today: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Command {
    /// Render the navbar
    Render {
        #[command(flatten)]
        anchor: Anchor,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Resolve and apply a click on a navbar button
    Click {
        #[command(flatten)]
        anchor: Anchor,

        /// Date of the clicked day (or week, with --weekly)
        #[arg(required_unless_present_any = ["prev", "next"])]
        date: Option<NaiveDate>,

        /// The weekly note button was clicked
        #[arg(long)]
        weekly: bool,

        /// The previous-week control was clicked
        #[arg(long, conflicts_with_all = ["date", "next"])]
        prev: bool,

        /// The next-week control was clicked
        #[arg(long, conflicts_with = "date")]
        next: bool,

        /// Kind of pointer interaction
        #[arg(long, default_value = "click")]
        kind: KindArg,

        /// Pointer button
        #[arg(long, default_value = "primary")]
        button: ButtonArg,

        #[arg(long)]
        ctrl: bool,
        #[arg(long)]
        meta: bool,
        #[arg(long)]
        alt: bool,
        #[arg(long)]
        shift: bool,

        /// Use the macOS keymap (Cmd instead of Ctrl)
        #[arg(long)]
        mac: bool,

        /// Pick this entry of the context menu, if one opens
        #[arg(long)]
        select: Option<usize>,
    },

    /// Print the shareable URL of a note
    Link {
        /// Date of the note (or a day in the week, with --weekly)
        date: NaiveDate,

        /// Link the weekly note
        #[arg(long)]
        weekly: bool,

        /// Vault name in the URL (defaults to the vault directory name)
        #[arg(long)]
        vault_name: Option<String>,
    },

    /// Recognize the date in a file name
    Parse {
        /// File name, with or without extension
        name: String,

        /// Pattern to match (defaults to the daily note format)
        #[arg(short, long)]
        pattern: Option<String>,
    },

    /// Format a date with a pattern
    Format {
        date: NaiveDate,

        /// Pattern (defaults to the daily note format)
        #[arg(short, long)]
        pattern: Option<String>,
    },

    /// Show effective settings
    Config {
        /// Print the settings file path only
        #[arg(long)]
        path: bool,

        /// Write the effective settings to the settings file
        #[arg(long)]
        init: bool,
    },
}

/// Which day the navbar is anchored on.
#[derive(Args)]
struct Anchor {
    /// Selected day (defaults to today)
    #[arg(short, long = "anchor", conflicts_with = "file")]
    anchor_date: Option<NaiveDate>,

    /// Name of the open file; anchors on its date if it is a daily note
    #[arg(long)]
    file: Option<String>,

    /// Weeks to shift the window by (at most 100 years either way)
    #[arg(
        short,
        long,
        default_value = "0",
        allow_hyphen_values = true,
        value_parser = clap::value_parser!(i64).range(-MAX_OFFSET_WEEKS..=MAX_OFFSET_WEEKS)
    )]
    offset: i64,
}

/// Largest `--offset`, in weeks.
const MAX_OFFSET_WEEKS: i64 = 5218;

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Click,
    Aux,
    Other,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ButtonArg {
    Primary,
    Middle,
    Secondary,
}

/// Opener that reports instead of opening.
struct PrintOpener;

impl NoteOpener for PrintOpener {
    fn open_note(&self, note: NoteRef, open_type: OpenType, set_active: bool) -> NavbarResult<()> {
        let focus = if set_active { "" } else { " (in background)" };
        println!("open {note}: {}{focus}", open_type.menu_title());
        Ok(())
    }
}

/// Load settings and apply command-line overrides.
fn load_settings(cli: &Cli) -> Result<NavbarSettings> {
    let settings = match &cli.config {
        Some(path) => NavbarSettings::load_from(path)
            .wrap_err_with(|| format!("Failed to load settings from {}", path.display()))?,
        None => NavbarSettings::load(),
    };
    Ok(cli.overrides.apply(settings))
}

impl Overrides {
    fn apply(&self, mut settings: NavbarSettings) -> NavbarSettings {
        if let Some(first_day) = self.first_day {
            settings.first_day_of_week = first_day;
        }
        settings.show_extra_buttons |= self.extra;
        settings.enable_weekly_note_button |= self.weekly_button;
        settings
    }
}

/// Settings, vault and clock for commands that work against a vault.
struct Session {
    settings: NavbarSettings,
    vault: FsVault,
    today: CalendarDate,
}

impl Session {
    fn load(cli: &Cli) -> Result<Self> {
        let settings = load_settings(cli)?;
        let root = cli.vault.canonicalize().context("Invalid vault path")?;
        let mut vault = FsVault::from_settings(root, &settings);
        if let Some(folder) = &cli.overrides.daily_folder {
            vault = vault.with_daily_folder(folder);
        }
        if let Some(folder) = &cli.overrides.weekly_folder {
            vault = vault.with_weekly_folder(folder);
        }
        tracing::debug!(vault = %vault.root().display(), name = vault.name(), "vault opened");

        Ok(Self {
            settings,
            vault,
            today: cli.overrides.today.unwrap_or_else(today),
        })
    }

    /// A manager with one navbar positioned as `anchor` asks.
    fn attach(&self, anchor: &Anchor) -> Result<(NavbarManager, ViewId)> {
        let mut manager = NavbarManager::new(self.settings.clone());
        let view = match anchor.anchor_date {
            Some(date) => manager.add_navbar(None, date),
            None => {
                let stem = anchor.file.as_deref().map(file_stem);
                manager.add_navbar(stem.as_deref(), self.today)
            }
        };

        let direction = if anchor.offset < 0 {
            WeekDirection::Previous
        } else {
            WeekDirection::Next
        };
        for _ in 0..anchor.offset.unsigned_abs() {
            manager.apply(view, NavAction::ShiftWeek(direction), &PrintOpener)?;
        }

        Ok((manager, view))
    }

    /// Resolve the shareable URL of `note` through the view's navbar.
    async fn copy_link(
        &self,
        manager: &NavbarManager,
        view: ViewId,
        note: NoteRef,
        vault_name: Option<String>,
    ) -> Result<String> {
        let navbar = manager.navbar(view).ok_or_else(|| eyre!("No navbar for {view}"))?;
        let vault_name = vault_name.unwrap_or_else(|| self.vault.name().to_string());
        navbar
            .copy_link(note, vault_name, Arc::new(self.vault.clone()), Arc::new(ObsidianLinks))
            .await
            .wrap_err_with(|| format!("Failed to copy link to {note}"))
    }
}

/// The date the weekly note for the week around `date` is keyed on.
fn weekly_start(date: NaiveDate, first_day: FirstDayOfWeek) -> Result<CalendarDate> {
    weekly_anchor(date, first_day).ok_or_else(|| eyre!("Week around {date} is out of range"))
}

/// Note name without its `.md` extension.
fn file_stem(name: &str) -> String {
    let name = Path::new(name).file_name().map_or(name.into(), |n| n.to_string_lossy());
    name.strip_suffix(".md").unwrap_or(&*name).to_string()
}

fn state_name(state: StateTag) -> &'static str {
    match state {
        StateTag::Active => "active",
        StateTag::Default => "exists",
        StateTag::NotExists => "missing",
    }
}

/// Print a rendered navbar.
fn print_view(view: &NavbarView, format: OutputFormat) -> Result<()> {
    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(view)?);
        return Ok(());
    }

    println!(
        " {}  anchor {}  offset {:+}",
        view.view_id, view.anchor_date, view.week_offset
    );
    println!("{}", "─".repeat(44));
    for item in &view.items {
        match item {
            NavbarItem::Weekly(button) => println!(
                " W  {:<10}    {:<14} {}",
                button.label,
                button.tooltip,
                state_name(button.state())
            ),
            NavbarItem::Date(button) => {
                let current = if button.is_current { '*' } else { ' ' };
                let extra = if button.is_extra { '+' } else { ' ' };
                println!(
                    "    {:<10} {current}{extra} {:<14} {}",
                    button.label,
                    button.tooltip,
                    state_name(button.state)
                );
            }
            NavbarItem::ChangeWeek { direction } => {
                let arrow = match direction {
                    WeekDirection::Previous => '«',
                    WeekDirection::Next => '»',
                };
                println!(" {arrow}                 {}", item.tooltip());
            }
        }
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let cli = Cli::parse();

    match &cli.command {
        Command::Render { anchor, format } => {
            let session = Session::load(&cli)?;
            let (mut manager, view) = session.attach(anchor)?;
            let rendered = manager.rerender(view, session.today, &session.vault)?;
            print_view(&rendered, *format)?;
        }
        Command::Click {
            anchor,
            date,
            weekly,
            prev,
            next,
            kind,
            button,
            ctrl,
            meta,
            alt,
            shift,
            mac,
            select,
        } => {
            let session = Session::load(&cli)?;
            let (mut manager, view) = session.attach(anchor)?;

            let target = match (*prev, *next, *date) {
                (true, _, _) => InteractionTarget::ChangeWeek(WeekDirection::Previous),
                (_, true, _) => InteractionTarget::ChangeWeek(WeekDirection::Next),
                (_, _, Some(date)) if *weekly => {
                    InteractionTarget::WeeklyNote(weekly_start(date, session.settings.first_day_of_week)?)
                }
                (_, _, Some(date)) => InteractionTarget::Date(date),
                (false, false, None) => bail!("Nothing to click"),
            };

            let event = PointerEvent {
                kind: match kind {
                    KindArg::Click => InteractionKind::Click,
                    KindArg::Aux => InteractionKind::AuxClick,
                    KindArg::Other => InteractionKind::Other,
                },
                button: match button {
                    ButtonArg::Primary => PointerButton::Primary,
                    ButtonArg::Middle => PointerButton::Middle,
                    ButtonArg::Secondary => PointerButton::Secondary,
                },
                modifiers: Modifiers {
                    ctrl: *ctrl,
                    meta: *meta,
                    alt: *alt,
                    shift: *shift,
                },
            };
            let interaction = Interaction::from_event(&event, &HostKeymap::new(*mac));

            match manager.handle_interaction(view, &interaction, target, &PrintOpener)? {
                Outcome::Rerender => {
                    let rendered = manager.rerender(view, session.today, &session.vault)?;
                    print_view(&rendered, OutputFormat::Text)?;
                }
                Outcome::Opened { .. } => {}
                Outcome::ContextMenu(menu) => {
                    for (i, item) in menu.items.iter().enumerate() {
                        match (item.title(), item.icon()) {
                            (Some(title), Some(icon)) => println!(" {i}. {title:<20} [{icon}]"),
                            _ => println!(" {i}. ────"),
                        }
                    }

                    if let Some(index) = select {
                        let item = menu.item(*index).ok_or_else(|| eyre!("No menu entry {index}"))?;
                        if let Some(action) = menu.action(item) {
                            manager.apply(view, action, &PrintOpener)?;
                        } else if item == MenuItem::CopyLink {
                            let url = session.copy_link(&manager, view, menu.note, None).await?;
                            println!("{url}");
                        }
                    }
                }
                Outcome::Nothing => println!("nothing to do"),
            }
        }
        Command::Link {
            date,
            weekly,
            vault_name,
        } => {
            let session = Session::load(&cli)?;
            let mut manager = NavbarManager::new(session.settings.clone());
            let view = manager.add_navbar(None, *date);
            let note = if *weekly {
                NoteRef::Weekly(weekly_start(*date, session.settings.first_day_of_week)?)
            } else {
                NoteRef::Daily(*date)
            };
            let url = session.copy_link(&manager, view, note, vault_name.clone()).await?;
            println!("{url}");
        }
        Command::Parse { name, pattern } => {
            let settings = load_settings(&cli)?;
            let pattern = pattern.as_deref().unwrap_or(&settings.daily_note_date_format);
            match parse_date_from_filename(&file_stem(name), pattern, settings.first_day_of_week) {
                Some(date) => println!("{date}"),
                None => bail!("'{name}' does not match '{pattern}'"),
            }
        }
        Command::Format { date, pattern } => {
            let settings = load_settings(&cli)?;
            let pattern = pattern.as_deref().unwrap_or(&settings.daily_note_date_format);
            println!("{}", format_date(*date, pattern, settings.first_day_of_week));
        }
        Command::Config { path, init } => {
            let config_path = match &cli.config {
                Some(path) => path.clone(),
                None => NavbarSettings::config_path().ok_or_else(|| eyre!("No config directory"))?,
            };
            if *path {
                println!("{}", config_path.display());
                return Ok(());
            }

            let settings = if *init && !config_path.exists() {
                cli.overrides.apply(NavbarSettings::default())
            } else {
                load_settings(&cli)?
            };
            if *init {
                settings
                    .save_to(&config_path)
                    .wrap_err_with(|| format!("Failed to write {}", config_path.display()))?;
                eprintln!("Wrote {}", config_path.display());
            }
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offset_of(args: &[&str]) -> Option<i64> {
        match Cli::try_parse_from(args).ok()?.command {
            Command::Render { anchor, .. } => Some(anchor.offset),
            _ => None,
        }
    }

    #[test]
    fn test_offset_is_bounded() {
        assert_eq!(offset_of(&["datebar", "render", "--offset", "-3"]), Some(-3));
        assert_eq!(offset_of(&["datebar", "render", "-o", "5218"]), Some(MAX_OFFSET_WEEKS));
        assert_eq!(offset_of(&["datebar", "render", "--offset", "5219"]), None);
        assert_eq!(offset_of(&["datebar", "render", "--offset", "-9223372036854775808"]), None);
    }

    #[test]
    fn test_weekly_start_out_of_range() {
        assert!(weekly_start(NaiveDate::MIN, FirstDayOfWeek::Monday).is_err());
        assert_eq!(
            weekly_start(NaiveDate::from_ymd_opt(2024, 6, 16).unwrap(), FirstDayOfWeek::Sunday).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 16).unwrap()
        );
    }
}
