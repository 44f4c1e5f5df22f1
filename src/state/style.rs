//! Pass-through styling of the timer and the announcement note

use serde::{Deserialize, Serialize};

use super::snapshot::ConfigSnapshot;

pub const DEFAULT_TIMER_FONT_SIZE: u32 = 64;
pub const DEFAULT_TIMER_COLOR: &str = "#ffffff";
pub const DEFAULT_NOTE_FONT_SIZE: u32 = 36;
pub const DEFAULT_GLOW_COLOR: &str = "#3b82f6";
pub const DEFAULT_GLOW_INTENSITY: u32 = 80;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerStyle {
    pub font_size_px: u32,
    pub color: String,
}

impl TimerStyle {
    pub fn from_snapshot(snapshot: &ConfigSnapshot) -> Self {
        Self {
            font_size_px: font_size_or(snapshot.timer_font_size, DEFAULT_TIMER_FONT_SIZE),
            color: color_or(snapshot.timer_color.as_deref(), DEFAULT_TIMER_COLOR).to_string(),
        }
    }
}

/// Announcement note as it should be drawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteView {
    pub text: String,
    pub font_size_px: u32,
    pub bold: bool,
    /// CSS `text-shadow`; absent when the glow colour is not `#rrggbb`
    pub text_shadow: Option<String>,
}

impl NoteView {
    pub fn from_snapshot(snapshot: &ConfigSnapshot) -> Self {
        let glow_color = color_or(snapshot.note_glow_color.as_deref(), DEFAULT_GLOW_COLOR);
        let intensity = snapshot
            .note_glow_intensity
            .unwrap_or(DEFAULT_GLOW_INTENSITY);

        Self {
            text: snapshot.note.clone().unwrap_or_default(),
            font_size_px: font_size_or(snapshot.note_font_size, DEFAULT_NOTE_FONT_SIZE),
            // Only an explicit `false` turns bold off
            bold: snapshot.note_bold != Some(false),
            text_shadow: glow_shadow(glow_color, intensity),
        }
    }
}

// Zero sizes and blank colours count as unset
fn font_size_or(size: Option<u32>, default: u32) -> u32 {
    size.filter(|px| *px > 0).unwrap_or(default)
}

fn color_or<'a>(color: Option<&'a str>, default: &'a str) -> &'a str {
    color.filter(|c| !c.trim().is_empty()).unwrap_or(default)
}

/// Parse `#rrggbb` (leading `#` optional) into its channels
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Three stacked glows fading outwards
pub fn glow_shadow(color: &str, intensity_percent: u32) -> Option<String> {
    let (r, g, b) = hex_to_rgb(color)?;
    let intensity = f64::from(intensity_percent) / 100.0;

    let layers: Vec<String> = [(20, 0.8), (40, 0.6), (60, 0.4)]
        .iter()
        .map(|(blur, factor)| {
            format!(
                "0 0 {}px rgba({}, {}, {}, {:.2})",
                blur,
                r,
                g,
                b,
                intensity * factor
            )
        })
        .collect();

    Some(layers.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let snapshot = ConfigSnapshot::default();
        let timer = TimerStyle::from_snapshot(&snapshot);
        assert_eq!(timer.font_size_px, 64);
        assert_eq!(timer.color, "#ffffff");

        let note = NoteView::from_snapshot(&snapshot);
        assert_eq!(note.text, "");
        assert_eq!(note.font_size_px, 36);
        assert!(note.bold);
        assert_eq!(
            note.text_shadow.as_deref(),
            Some(
                "0 0 20px rgba(59, 130, 246, 0.64), \
                 0 0 40px rgba(59, 130, 246, 0.48), \
                 0 0 60px rgba(59, 130, 246, 0.32)"
            )
        );
    }

    #[test]
    fn test_zero_and_blank_fall_back_to_defaults() {
        let snapshot = ConfigSnapshot {
            timer_font_size: Some(0),
            timer_color: Some(String::new()),
            note_font_size: Some(0),
            note_glow_color: Some("  ".to_string()),
            ..Default::default()
        };
        let timer = TimerStyle::from_snapshot(&snapshot);
        assert_eq!(timer.font_size_px, DEFAULT_TIMER_FONT_SIZE);
        assert_eq!(timer.color, DEFAULT_TIMER_COLOR);

        let note = NoteView::from_snapshot(&snapshot);
        assert_eq!(note.font_size_px, DEFAULT_NOTE_FONT_SIZE);
        assert!(note.text_shadow.unwrap().contains("rgba(59, 130, 246"));

        let styled = ConfigSnapshot {
            timer_font_size: Some(96),
            timer_color: Some("#ff0000".to_string()),
            ..Default::default()
        };
        assert_eq!(TimerStyle::from_snapshot(&styled).font_size_px, 96);
        assert_eq!(TimerStyle::from_snapshot(&styled).color, "#ff0000");
    }

    #[test]
    fn test_bold_only_disabled_explicitly() {
        let snapshot = ConfigSnapshot {
            note_bold: Some(false),
            ..Default::default()
        };
        assert!(!NoteView::from_snapshot(&snapshot).bold);
    }

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#ff0080"), Some((255, 0, 128)));
        assert_eq!(hex_to_rgb("00FF00"), Some((0, 255, 0)));
        assert_eq!(hex_to_rgb("#fff"), None);
        assert_eq!(hex_to_rgb("#gggggg"), None);
    }

    #[test]
    fn test_invalid_glow_colour_has_no_shadow() {
        let snapshot = ConfigSnapshot {
            note_glow_color: Some("red".to_string()),
            ..Default::default()
        };
        assert_eq!(NoteView::from_snapshot(&snapshot).text_shadow, None);
    }

    #[test]
    fn test_zero_intensity() {
        let shadow = glow_shadow("#000000", 0).unwrap();
        assert!(shadow.contains("rgba(0, 0, 0, 0.00)"));
    }
}
