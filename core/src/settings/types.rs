use super::catalog::color_scheme;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::time::Duration;

pub const FONT_SIZE_RANGE: RangeInclusive<u32> = 10..=24;
pub const LINE_HEIGHT_RANGE: RangeInclusive<f64> = 1.2..=2.0;
pub const ALLOWED_TAB_SIZES: [u32; 3] = [2, 4, 8];
pub const AUTO_SAVE_DELAY_RANGE: RangeInclusive<u64> = 200..=2000;
pub const AUTO_LOCK_MINUTES_RANGE: RangeInclusive<u32> = 1..=30;

const DEFAULT_COLOR_SCHEME: &str = "mariana";
const DEFAULT_LIGHT_SCHEME: &str = "github-light";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKind {
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderWhitespace {
    None,
    Boundary,
    #[default]
    Selection,
    Trailing,
    All,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnippetSuggestions {
    Top,
    Bottom,
    #[default]
    Inline,
    None,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CursorStyle {
    #[default]
    Line,
    Block,
    Underline,
    LineThin,
    BlockOutline,
    UnderlineThin,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorBlinking {
    Blink,
    #[default]
    Smooth,
    Phase,
    Expand,
    Solid,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchBrackets {
    Never,
    Near,
    #[default]
    Always,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoldingControls {
    Always,
    Never,
    #[default]
    Mouseover,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineHighlight {
    None,
    Gutter,
    Line,
    #[default]
    All,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MultiCursorModifier {
    CtrlCmd,
    #[default]
    Alt,
}

/// Persisted preference record. Field names match the on-disk camelCase keys;
/// missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub theme: Theme,
    pub color_scheme: String,
    pub code_font: String,
    pub ui_font: String,

    pub font_size: u32,
    pub line_height: f64,
    pub tab_size: u32,

    pub word_wrap: bool,
    pub minimap: bool,
    pub line_numbers: bool,
    pub render_whitespace: RenderWhitespace,

    pub auto_closing_brackets: bool,
    pub auto_closing_quotes: bool,
    pub auto_indent: bool,
    pub format_on_paste: bool,
    pub format_on_type: bool,

    pub quick_suggestions: bool,
    pub suggest_on_trigger_characters: bool,
    pub accept_suggestion_on_enter: bool,
    pub snippet_suggestions: SnippetSuggestions,

    pub cursor_style: CursorStyle,
    pub cursor_blinking: CursorBlinking,

    pub auto_save: bool,
    /// Debounce window in milliseconds.
    pub auto_save_delay: u64,

    pub smooth_scrolling: bool,
    pub mouse_wheel_zoom: bool,
    pub bracket_pair_colorization: bool,
    pub match_brackets: MatchBrackets,
    pub folding: bool,
    pub show_folding_controls: FoldingControls,
    pub selection_highlight: bool,
    pub occurrences_highlight: bool,
    pub render_line_highlight: LineHighlight,
    pub font_ligatures: bool,
    pub render_indent_guides: bool,
    pub highlight_active_indent_guide: bool,
    pub links: bool,
    pub drag_and_drop: bool,
    pub multi_cursor_modifier: MultiCursorModifier,

    pub auto_lock_enabled: bool,
    pub auto_lock_minutes: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            color_scheme: DEFAULT_COLOR_SCHEME.to_string(),
            code_font: "JetBrains Mono".to_string(),
            ui_font: "Noto Sans SC".to_string(),
            font_size: 14,
            line_height: 1.6,
            tab_size: 2,
            word_wrap: true,
            minimap: false,
            line_numbers: true,
            render_whitespace: RenderWhitespace::Selection,
            auto_closing_brackets: true,
            auto_closing_quotes: true,
            auto_indent: true,
            format_on_paste: true,
            format_on_type: false,
            quick_suggestions: true,
            suggest_on_trigger_characters: true,
            accept_suggestion_on_enter: true,
            snippet_suggestions: SnippetSuggestions::Inline,
            cursor_style: CursorStyle::Line,
            cursor_blinking: CursorBlinking::Smooth,
            auto_save: true,
            auto_save_delay: 500,
            smooth_scrolling: true,
            mouse_wheel_zoom: false,
            bracket_pair_colorization: true,
            match_brackets: MatchBrackets::Always,
            folding: true,
            show_folding_controls: FoldingControls::Mouseover,
            selection_highlight: true,
            occurrences_highlight: true,
            render_line_highlight: LineHighlight::All,
            font_ligatures: true,
            render_indent_guides: true,
            highlight_active_indent_guide: true,
            links: true,
            drag_and_drop: true,
            multi_cursor_modifier: MultiCursorModifier::Alt,
            auto_lock_enabled: true,
            auto_lock_minutes: 5,
        }
    }
}

impl Settings {
    /// Clamps ranges, snaps the tab size and drops unknown colour schemes.
    pub fn normalized(mut self) -> Self {
        let defaults = Settings::default();

        self.font_size = self
            .font_size
            .clamp(*FONT_SIZE_RANGE.start(), *FONT_SIZE_RANGE.end());
        self.line_height = if self.line_height.is_finite() {
            self.line_height
                .clamp(*LINE_HEIGHT_RANGE.start(), *LINE_HEIGHT_RANGE.end())
        } else {
            defaults.line_height
        };
        self.tab_size = nearest_tab_size(self.tab_size);
        self.auto_save_delay = self
            .auto_save_delay
            .clamp(*AUTO_SAVE_DELAY_RANGE.start(), *AUTO_SAVE_DELAY_RANGE.end());
        self.auto_lock_minutes = self.auto_lock_minutes.clamp(
            *AUTO_LOCK_MINUTES_RANGE.start(),
            *AUTO_LOCK_MINUTES_RANGE.end(),
        );

        if color_scheme(&self.color_scheme).is_none() {
            self.color_scheme = defaults.color_scheme;
        }
        if self.code_font.trim().is_empty() {
            self.code_font = defaults.code_font;
        }
        if self.ui_font.trim().is_empty() {
            self.ui_font = defaults.ui_font;
        }
        self
    }

    pub fn auto_save_delay(&self) -> Duration {
        Duration::from_millis(self.auto_save_delay)
    }

    /// Idle time after which the session locks, `None` when auto-lock is off.
    pub fn auto_lock_after(&self) -> Option<Duration> {
        self.auto_lock_enabled
            .then(|| Duration::from_secs(u64::from(self.auto_lock_minutes) * 60))
    }
}

fn nearest_tab_size(size: u32) -> u32 {
    ALLOWED_TAB_SIZES
        .iter()
        .copied()
        .min_by_key(|allowed| allowed.abs_diff(size))
        .unwrap_or(2)
}

pub fn resolve_theme(theme: Theme, system_prefers_dark: bool) -> ThemeKind {
    match theme {
        Theme::Light => ThemeKind::Light,
        Theme::Dark => ThemeKind::Dark,
        Theme::System if system_prefers_dark => ThemeKind::Dark,
        Theme::System => ThemeKind::Light,
    }
}

/// Editor colour scheme for the current theme. An explicit light/dark theme
/// overrides a scheme of the opposite kind.
pub fn editor_color_scheme(settings: &Settings, system_prefers_dark: bool) -> &str {
    let Some(scheme) = color_scheme(&settings.color_scheme) else {
        return if system_prefers_dark {
            DEFAULT_COLOR_SCHEME
        } else {
            DEFAULT_LIGHT_SCHEME
        };
    };
    match (settings.theme, scheme.kind) {
        (Theme::Dark, ThemeKind::Light) => DEFAULT_COLOR_SCHEME,
        (Theme::Light, ThemeKind::Dark) => DEFAULT_LIGHT_SCHEME,
        _ => &settings.color_scheme,
    }
}
