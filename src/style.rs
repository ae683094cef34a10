//! # Colors and Theme
//!
//! RGB color values plus the immutable color table used across a report.
//! The theme is passed into the engine as part of `RenderOptions` — there
//! is no module-level mutable state, so two concurrent exports can carry
//! different themes without seeing each other.

use serde::{Deserialize, Serialize};

use crate::model::{Priority, Status};

/// An RGB(A) color with components in 0.0–1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parse `#rgb` or `#rrggbb`. Unparseable components fall back to 0.
    pub fn hex(hex: &str) -> Self {
        let hex = hex.trim_start_matches('#');
        let (r, g, b) = match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).unwrap_or(0);
                let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).unwrap_or(0);
                let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).unwrap_or(0);
                (r, g, b)
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
                let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
                let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
                (r, g, b)
            }
            _ => (0, 0, 0),
        };
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: 1.0,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// The immutable color table for one export.
///
/// Every color the renderer touches lives here. Status and priority
/// colors are functions of the enum so the mapping stays exhaustive —
/// adding a status without a badge color is a compile error.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Category banner background.
    pub banner_bg: Color,
    /// Category banner text.
    pub banner_fg: Color,
    /// Column header row background.
    pub header_bg: Color,
    /// Column header text.
    pub header_fg: Color,
    /// Even-row background in the compact table (odd rows stay white).
    pub row_alt_bg: Color,
    /// Hairline borders: photo slot, row separators.
    pub border: Color,
    /// Primary cell text.
    pub text: Color,
    /// Secondary text: assignee/due-date line, captions, placeholders.
    pub text_secondary: Color,
    /// Photo placeholder background.
    pub placeholder_bg: Color,
    /// Footer text.
    pub footer_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            banner_bg: Color::hex("#1E293B"),
            banner_fg: Color::WHITE,
            header_bg: Color::hex("#E2E8F0"),
            header_fg: Color::hex("#334155"),
            row_alt_bg: Color::hex("#F8FAFC"),
            border: Color::hex("#CBD5E1"),
            text: Color::hex("#0F172A"),
            text_secondary: Color::hex("#64748B"),
            placeholder_bg: Color::hex("#F1F5F9"),
            footer_fg: Color::hex("#94A3B8"),
        }
    }
}

impl Theme {
    /// Badge fill color for a status.
    pub fn status_color(&self, status: Status) -> Color {
        match status {
            Status::Open => Color::hex("#EF4444"),
            Status::InProgress => Color::hex("#F59E0B"),
            Status::PendingReview => Color::hex("#8B5CF6"),
            Status::Closed => Color::hex("#10B981"),
            Status::OnHold => Color::hex("#6B7280"),
        }
    }

    /// Dot color for a priority marker. LOW draws no marker at all.
    pub fn priority_color(&self, priority: Priority) -> Option<Color> {
        match priority {
            Priority::Low => None,
            Priority::Medium => Some(Color::hex("#F59E0B")),
            Priority::High => Some(Color::hex("#F97316")),
            Priority::Critical => Some(Color::hex("#DC2626")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parse() {
        let c = Color::hex("#FF0000");
        assert!((c.r - 1.0).abs() < 1e-9);
        assert!((c.g - 0.0).abs() < 1e-9);

        let short = Color::hex("#fff");
        assert!((short.r - 1.0).abs() < 1e-9);
        assert!((short.b - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_low_priority_has_no_marker() {
        let theme = Theme::default();
        assert!(theme.priority_color(Priority::Low).is_none());
        assert!(theme.priority_color(Priority::Critical).is_some());
    }

    #[test]
    fn test_every_status_has_a_badge_color() {
        let theme = Theme::default();
        for status in [
            Status::Open,
            Status::InProgress,
            Status::PendingReview,
            Status::Closed,
            Status::OnHold,
        ] {
            let c = theme.status_color(status);
            assert!(c.a > 0.0);
        }
    }
}
