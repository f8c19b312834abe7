//! Color and styling helpers for CLI output.
//!
//! Semantic Color Theme:
//!   - Ready:      green   (ready status, clean reports)
//!   - Blocked:    red     (blocked status, cycle headers)
//!   - Warning:    yellow  (skipped records, high priority)
//!   - Reference:  cyan    (task IDs)
//!   - Muted:      dimmed  (field labels, arrows, low priority)
//!   - Emphasis:   bold    (section headers)

use crate::domain::{Priority, TaskStatus};
use colored::Colorize;

use super::OutputConfig;

/// Apply semantic "success" color (green) to text.
pub fn success(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.green().to_string()
}

/// Apply semantic "error" color (red) to text.
pub fn error(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.red().to_string()
}

/// Apply semantic "warning" color (yellow) to text.
pub fn warning(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.yellow().to_string()
}

/// Colorize a task ID (cyan).
pub(crate) fn colorize_id(id: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return id.to_string();
    }
    id.cyan().to_string()
}

/// Apply color to priority text.
pub(crate) fn colorize_priority(priority: Priority, config: &OutputConfig) -> String {
    let text = format!("{priority:<6}");
    if !config.use_colors {
        return text;
    }
    match priority {
        Priority::High => text.yellow().bold().to_string(),
        Priority::Medium => text,
        Priority::Low => text.dimmed().to_string(),
    }
}

/// Get a colored status icon, with ASCII fallback support.
pub(crate) fn colored_status_icon(status: TaskStatus, config: &OutputConfig) -> String {
    let icon = match (status, config.use_ascii) {
        (TaskStatus::Ready, true) => "o",
        (TaskStatus::Blocked, true) => "x",
        (TaskStatus::Ready, false) => "○",
        (TaskStatus::Blocked, false) => "✗",
    };

    if !config.use_colors {
        return icon.to_string();
    }

    match status {
        TaskStatus::Ready => icon.green().to_string(),
        TaskStatus::Blocked => icon.red().to_string(),
    }
}

/// Arrow used between IDs in a cycle, with ASCII fallback.
pub(crate) fn arrow(config: &OutputConfig) -> String {
    let text = if config.use_ascii { "->" } else { "→" };
    dimmed(text, config)
}

/// Apply dimmed style to text (for field labels).
pub(crate) fn dimmed(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.dimmed().to_string()
}

/// Apply bold style to text (for section headers).
pub(crate) fn bold(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.bold().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use colored::control::set_override;
    use std::sync::{Mutex, MutexGuard};

    static GLOBAL_STATE_MUTEX: Mutex<()> = Mutex::new(());

    struct ColorGuard<'a> {
        _guard: MutexGuard<'a, ()>,
    }

    impl<'a> ColorGuard<'a> {
        fn new() -> Self {
            let guard = GLOBAL_STATE_MUTEX.lock().unwrap();
            set_override(true);
            Self { _guard: guard }
        }
    }

    impl Drop for ColorGuard<'_> {
        fn drop(&mut self) {
            set_override(false);
        }
    }

    fn with_colors_enabled<F, R>(f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _guard = ColorGuard::new();
        f()
    }

    #[test]
    fn status_icon_contains_ansi_codes_when_enabled() {
        with_colors_enabled(|| {
            let config = OutputConfig::new(80, false, true);
            let blocked = colored_status_icon(TaskStatus::Blocked, &config);
            assert!(blocked.contains("\x1b["));
            assert!(blocked.contains('✗'));
        });
    }

    #[test]
    fn no_colors_returns_plain_text() {
        let config = OutputConfig::new(80, false, false);
        assert_eq!(colorize_id("t1", &config), "t1");
        assert_eq!(error("boom", &config), "boom");
        assert_eq!(colored_status_icon(TaskStatus::Ready, &config), "○");
    }

    #[test]
    fn ascii_mode_uses_ascii_icons() {
        let config = OutputConfig::new(80, true, false);
        assert_eq!(colored_status_icon(TaskStatus::Ready, &config), "o");
        assert_eq!(colored_status_icon(TaskStatus::Blocked, &config), "x");
        assert_eq!(arrow(&config), "->");
    }

    #[test]
    fn priority_is_padded() {
        let config = OutputConfig::new(80, false, false);
        assert_eq!(colorize_priority(Priority::Low, &config), "low   ");
        assert_eq!(colorize_priority(Priority::Medium, &config), "medium");
    }
}
