//! Window configuration passed into the bootstrap.

/// Parameters for the window and GL surface created at startup.
///
/// There are no CLI flags or configuration files; callers construct this in
/// code (usually via [`Config::default`]) and hand it to [`crate::app::run`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Requested window width.
    pub width: u32,
    /// Requested window height.
    pub height: u32,
    /// Window title.
    pub title: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "Lab 1".to_string(),
        }
    }
}
