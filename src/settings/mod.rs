//! Editor settings and their persistence.
//!
//! Settings exist twice: the applied copy held by the session and the
//! durable copy in a [`DurableStore`]. [`SettingsStore::apply`] is the only
//! writer of the durable copy; [`SettingsStore::load`] reads it back field by
//! field, keeping the current value for anything missing.

mod store;

pub use store::{DurableStore, FileStore, MemoryStore, StoreError};

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub const THEME_KEY: &str = "editorTheme";
pub const FONT_SIZE_KEY: &str = "editorFontSize";
pub const PROJECT_NAME_KEY: &str = "projectName";
pub const LAYOUT_KEY: &str = "editorLayout";

pub const DEFAULT_PROJECT_NAME: &str = "Untitled Pen";

/// Smallest and largest accepted editor font size, in pixels.
pub const FONT_SIZE_RANGE: std::ops::RangeInclusive<u16> = 8..=48;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("unknown theme '{0}' (expected dark, light or christmas)")]
    UnknownTheme(String),
    #[error("unknown layout '{0}' (expected grid, columns or rows)")]
    UnknownLayout(String),
    #[error("invalid font size '{0}' (expected a pixel size such as 14px)")]
    InvalidFontSize(String),
    #[error("font size {0}px is outside the supported range of 8-48px")]
    FontSizeOutOfRange(u16),
    #[error("project name must not be empty")]
    EmptyProjectName,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
    Christmas,
}

impl Theme {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
            Self::Christmas => "christmas",
        }
    }
}

impl FromStr for Theme {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            "christmas" => Ok(Self::Christmas),
            _ => Err(SettingsError::UnknownTheme(s.to_string())),
        }
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    #[default]
    Grid,
    Columns,
    Rows,
}

impl Layout {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::Columns => "columns",
            Self::Rows => "rows",
        }
    }
}

impl FromStr for Layout {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grid" => Ok(Self::Grid),
            "columns" => Ok(Self::Columns),
            "rows" => Ok(Self::Rows),
            _ => Err(SettingsError::UnknownLayout(s.to_string())),
        }
    }
}

/// Editor font size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontSize(u16);

impl FontSize {
    /// Validate a pixel size.
    ///
    /// # Errors
    /// Returns [`SettingsError::FontSizeOutOfRange`] outside 8-48px.
    pub fn from_px(px: u16) -> Result<Self, SettingsError> {
        if FONT_SIZE_RANGE.contains(&px) {
            Ok(Self(px))
        } else {
            Err(SettingsError::FontSizeOutOfRange(px))
        }
    }

    pub const fn px(self) -> u16 {
        self.0
    }
}

impl Default for FontSize {
    fn default() -> Self {
        Self(14)
    }
}

impl FromStr for FontSize {
    type Err = SettingsError;

    /// Accepts `"14px"`, `"14 PX"` or a bare `"14"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let digits = lowered.strip_suffix("px").unwrap_or(&lowered).trim_end();
        let px = digits
            .parse::<u16>()
            .map_err(|_| SettingsError::InvalidFontSize(s.to_string()))?;
        Self::from_px(px)
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px", self.0)
    }
}

/// Settings as they arrive from a form, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSettings {
    pub theme: String,
    pub font_size: String,
    pub project_name: String,
    pub layout: String,
}

impl From<&Settings> for RawSettings {
    fn from(settings: &Settings) -> Self {
        Self {
            theme: settings.theme.as_str().to_string(),
            font_size: settings.font_size.to_string(),
            project_name: settings.project_name.clone(),
            layout: settings.layout.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub theme: Theme,
    pub font_size: FontSize,
    pub project_name: String,
    pub layout: Layout,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            font_size: FontSize::default(),
            project_name: DEFAULT_PROJECT_NAME.to_string(),
            layout: Layout::default(),
        }
    }
}

impl Settings {
    /// Validate and normalize form input.
    ///
    /// # Errors
    /// Returns the first field that fails validation; nothing is partially
    /// accepted.
    pub fn from_raw(raw: &RawSettings) -> Result<Self, SettingsError> {
        let project_name = parse_project_name(&raw.project_name)?;
        Ok(Self {
            theme: raw.theme.parse()?,
            font_size: raw.font_size.parse()?,
            project_name,
            layout: raw.layout.parse()?,
        })
    }

    /// The four durable entries, keyed as stored.
    pub fn entries(&self) -> [(&'static str, String); 4] {
        [
            (THEME_KEY, self.theme.as_str().to_string()),
            (FONT_SIZE_KEY, self.font_size.to_string()),
            (PROJECT_NAME_KEY, self.project_name.clone()),
            (LAYOUT_KEY, self.layout.as_str().to_string()),
        ]
    }
}

fn parse_project_name(name: &str) -> Result<String, SettingsError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(SettingsError::EmptyProjectName);
    }
    Ok(name.to_string())
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "theme:        {}", self.theme.as_str())?;
        writeln!(f, "font size:    {}", self.font_size)?;
        writeln!(f, "project name: {}", self.project_name)?;
        write!(f, "layout:       {}", self.layout.as_str())
    }
}

/// Reads and writes [`Settings`] through a durable store.
#[derive(Debug)]
pub struct SettingsStore<D> {
    store: D,
}

impl<D: DurableStore> SettingsStore<D> {
    pub const fn new(store: D) -> Self {
        Self { store }
    }

    /// Load settings on top of the defaults.
    pub fn load(&self) -> Settings {
        self.load_onto(Settings::default())
    }

    /// Load settings on top of `base`.
    ///
    /// Each field is read on its own. Missing, empty or invalid stored values
    /// leave the base value in place.
    pub fn load_onto(&self, base: Settings) -> Settings {
        let mut settings = base;
        if let Some(theme) = self.read(THEME_KEY, str::parse::<Theme>) {
            settings.theme = theme;
        }
        if let Some(font_size) = self.read(FONT_SIZE_KEY, str::parse::<FontSize>) {
            settings.font_size = font_size;
        }
        if let Some(name) = self.read(PROJECT_NAME_KEY, parse_project_name) {
            settings.project_name = name;
        }
        if let Some(layout) = self.read(LAYOUT_KEY, str::parse::<Layout>) {
            settings.layout = layout;
        }
        settings
    }

    /// Persist all four fields at once.
    ///
    /// # Errors
    /// Returns an error if the durable store rejects the write; nothing is
    /// persisted in that case.
    pub fn apply(&mut self, candidate: &Settings) -> Result<(), StoreError> {
        self.store.put_all(&candidate.entries())?;
        tracing::info!(
            theme = candidate.theme.as_str(),
            font_size = %candidate.font_size,
            project = %candidate.project_name,
            layout = candidate.layout.as_str(),
            "settings persisted"
        );
        Ok(())
    }

    pub const fn store(&self) -> &D {
        &self.store
    }

    pub fn into_inner(self) -> D {
        self.store
    }

    fn read<T>(&self, key: &str, parse: impl Fn(&str) -> Result<T, SettingsError>) -> Option<T> {
        let value = self.store.get(key).filter(|v| !v.is_empty())?;
        match parse(&value) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                tracing::warn!(key, value = %value, "ignoring stored setting: {err}");
                None
            }
        }
    }
}
