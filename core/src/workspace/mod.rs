//! Controllers behind the sidebar, history panel, status bar and header.
//!
//! Each one pairs an endpoint group with the [`EditorStore`](crate::editor::EditorStore)
//! and applies a server response only after it succeeded.

pub mod files;
pub mod history;
pub mod language;
pub mod status;
pub mod updater;

pub use files::FileBrowser;
pub use history::{DiffStats, HistoryBrowser, VersionComparison};
pub use language::{language_for, language_label, LanguageOption, LANGUAGES};
pub use status::{line_count, StatusBar, StatusLine};
pub use updater::{UpdateCheck, UpdateInfo, UpdateOutcome, Updater};
