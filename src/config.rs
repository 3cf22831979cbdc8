//! Settings for loading and checking declaration files.

/// Checker configuration
#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Keep checking after the first incompatible method so every problem is reported
    pub collect_all: bool,
    /// Print slot layouts of every class after loading
    pub show_layout: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            collect_all: true,
            show_layout: false,
        }
    }
}

impl CheckConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether every failure of a check is reported
    pub fn with_collect_all(mut self, collect_all: bool) -> Self {
        self.collect_all = collect_all;
        self
    }

    pub fn with_show_layout(mut self, show_layout: bool) -> Self {
        self.show_layout = show_layout;
        self
    }
}
