//! A vault of markdown notes on the local filesystem.

use std::io;
use std::path::{Path, PathBuf};

use datebar_core::{CalendarDate, FirstDayOfWeek, NavbarSettings};

use crate::error::{NavbarError, NavbarResult};
use crate::host::{BoxFuture, NoteIndex, NoteResolver};
use crate::note::{NoteFile, NoteRef};

const NOTE_EXTENSION: &str = "md";

/// Notes stored as `<folder>/<formatted date>.md` under a root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsVault {
    root: PathBuf,
    name: String,
    daily_folder: PathBuf,
    weekly_folder: PathBuf,
    daily_format: String,
    weekly_format: String,
    first_day: FirstDayOfWeek,
}

impl FsVault {
    /// Open a vault at `root`, naming files with the formats in `settings`.
    ///
    /// The vault is named after its directory.
    pub fn from_settings(root: impl Into<PathBuf>, settings: &NavbarSettings) -> Self {
        let root = root.into();
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "vault".to_string());

        Self {
            root,
            name,
            daily_folder: PathBuf::new(),
            weekly_folder: PathBuf::new(),
            daily_format: settings.daily_note_date_format.clone(),
            weekly_format: settings.weekly_note_date_format.clone(),
            first_day: settings.first_day_of_week,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Folder for daily notes, relative to the root.
    pub fn with_daily_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.daily_folder = folder.into();
        self
    }

    /// Folder for weekly notes, relative to the root.
    pub fn with_weekly_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.weekly_folder = folder.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Vault-relative path the note would live at.
    pub fn note_file(&self, note: NoteRef) -> NoteFile {
        let folder = match note {
            NoteRef::Daily(_) => &self.daily_folder,
            NoteRef::Weekly(_) => &self.weekly_folder,
        };
        let stem = note.file_stem_with(&self.daily_format, &self.weekly_format, self.first_day);
        NoteFile::new(folder.join(format!("{stem}.{NOTE_EXTENSION}")))
    }

    fn exists(&self, note: NoteRef) -> NavbarResult<bool> {
        let path = self.root.join(self.note_file(note).path);
        match std::fs::metadata(&path) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(NavbarError::Lookup {
                note,
                message: format!("{}: {e}", path.display()),
            }),
        }
    }
}

impl NoteIndex for FsVault {
    fn daily_note_exists(&self, date: CalendarDate) -> NavbarResult<bool> {
        self.exists(NoteRef::Daily(date))
    }

    fn weekly_note_exists(&self, week_start: CalendarDate) -> NavbarResult<bool> {
        self.exists(NoteRef::Weekly(week_start))
    }
}

impl NoteResolver for FsVault {
    fn resolve_note(&self, note: NoteRef) -> BoxFuture<'_, NavbarResult<NoteFile>> {
        Box::pin(async move {
            let file = self.note_file(note);
            match tokio::fs::metadata(self.root.join(&file.path)).await {
                Ok(meta) if meta.is_file() => Ok(file),
                Ok(_) => Err(NavbarError::NotFound { note }),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Err(NavbarError::NotFound { note }),
                Err(e) => Err(NavbarError::Lookup {
                    note,
                    message: e.to_string(),
                }),
            }
        })
    }
}
