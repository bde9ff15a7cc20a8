//! User interface components for the country dashboard
//!
//! This crate provides the theme, the top bar with the indicator selector,
//! and the loading/error screens.

pub mod selector;
pub mod shell;
pub mod theme;

/// Re-export commonly used types
pub use selector::{humanize_indicator, indicator_selector};
pub use shell::{status_screen, top_bar, TopBarState};
pub use theme::{apply_theme, Theme};
