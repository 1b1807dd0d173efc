//! User preferences: editor behaviour, appearance and security.

mod catalog;
mod store;
mod types;

pub use catalog::{
    color_scheme, ColorSchemeOption, FontOption, SchemePreview, CODE_FONTS, COLOR_SCHEMES,
    UI_FONTS,
};
pub use store::SettingsStore;
pub use types::{
    editor_color_scheme, resolve_theme, CursorBlinking, CursorStyle, FoldingControls,
    LineHighlight, MatchBrackets, MultiCursorModifier, RenderWhitespace, Settings,
    SnippetSuggestions, Theme, ThemeKind, ALLOWED_TAB_SIZES, AUTO_LOCK_MINUTES_RANGE,
    AUTO_SAVE_DELAY_RANGE, FONT_SIZE_RANGE, LINE_HEIGHT_RANGE,
};
