use serde::{Serialize, Deserialize};
use directories::ProjectDirs;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::clock::FeedClock;
use crate::error::Result;
use crate::validation::validate_settings;

// Default configuration
pub const DEFAULT_MESSAGE_FONT_SIZE: u32 = 16;

/// Which physical side "leading" maps to.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LayoutDirection {
    #[default]
    Ltr,
    Rtl,
}

/// Host-supplied visual tuning values, in pixels.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Dimensions {
    pub corner_radius_big: i32,
    pub corner_radius_collapsed: i32,
    /// Top margin of the standalone footer in its default position.
    pub footer_default_top_margin: i32,
    /// Bottom padding of the bubble below a default-position footer.
    pub bubble_bottom_padding: i32,
    /// Bottom margin of the footer once it is pulled up beside the text.
    pub footer_collapsed_bottom_margin: i32,
    /// Horizontal gap kept between the last text line and the footer.
    pub footer_text_gap: i32,
    /// Extra lift applied on top of the date height when collapsing.
    pub footer_collapse_lift: i32,
    pub bubble_horizontal_padding: i32,
    /// Item paddings plus bubble margins, subtracted from the row width.
    pub row_horizontal_padding: i32,
    /// Avatar width plus its margins, reserved for incoming group messages.
    pub avatar_column_width: i32,
    pub media_bubble_max_width: i32,
    pub media_min_width_solo: i32,
    pub media_min_width_with_content: i32,
    pub bubble_top_padding: i32,
    pub revealable_padding: i32,
    pub spacing_default: i32,
    pub spacing_collapsed: i32,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            corner_radius_big: 18,
            corner_radius_collapsed: 4,
            footer_default_top_margin: 4,
            bubble_bottom_padding: 7,
            footer_collapsed_bottom_margin: 5,
            footer_text_gap: 6,
            footer_collapse_lift: 4,
            bubble_horizontal_padding: 24,
            row_horizontal_padding: 64,
            avatar_column_width: 40,
            media_bubble_max_width: 240,
            media_min_width_solo: 150,
            media_min_width_with_content: 240,
            bubble_top_padding: 7,
            revealable_padding: 10,
            spacing_default: 8,
            spacing_collapsed: 2,
        }
    }
}

/// Resolved top and bottom gaps, in pixels.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VerticalInsets {
    pub top: i32,
    pub bottom: i32,
}

/// Every tunable the resolvers read, passed explicitly into the pipeline.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct LayoutSettings {
    pub dimensions: Dimensions,
    /// Autoplay policy for looping silent videos.
    pub autoplay_gifs: bool,
    pub message_font_size: u32,
    /// Offset used to decide whether two messages share a calendar day.
    pub utc_offset_seconds: i32,
    pub direction: LayoutDirection,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            dimensions: Dimensions::default(),
            autoplay_gifs: true,
            message_font_size: DEFAULT_MESSAGE_FONT_SIZE,
            utc_offset_seconds: 0,
            direction: LayoutDirection::Ltr,
        }
    }
}

impl LayoutSettings {
    pub fn clock(&self) -> Result<FeedClock> {
        FeedClock::new(self.utc_offset_seconds)
    }
}

pub fn settings_path() -> Option<PathBuf> {
    if let Some(proj) = ProjectDirs::from("com", "sid3xyz", "bubble-layout") {
        let dir = proj.config_dir();
        if let Err(e) = fs::create_dir_all(dir) {
            tracing::warn!("Failed to create config dir: {}", e);
            return None;
        }
        return Some(dir.join("settings.json"));
    }
    None
}

/// Load settings from the default location, if a valid file exists there.
pub fn load_settings() -> Option<LayoutSettings> {
    let path = settings_path()?;
    if !path.exists() {
        return None;
    }
    match load_settings_from(&path) {
        Ok(settings) => Some(settings),
        Err(e) => {
            tracing::warn!(path = %path.display(), "Ignoring settings file: {}", e);
            None
        }
    }
}

pub fn load_settings_from(path: &Path) -> Result<LayoutSettings> {
    let content = fs::read_to_string(path)?;
    let settings: LayoutSettings = serde_json::from_str(&content)?;
    validate_settings(&settings)?;
    Ok(settings)
}

pub fn save_settings(settings: &LayoutSettings) -> Result<()> {
    if let Some(path) = settings_path() {
        save_settings_to(settings, &path)?;
    }
    Ok(())
}

pub fn save_settings_to(settings: &LayoutSettings, path: &Path) -> Result<()> {
    validate_settings(settings)?;
    let mut file = fs::File::create(path)?;
    let data = serde_json::to_string_pretty(settings)?;
    file.write_all(data.as_bytes())?;
    Ok(())
}
