//! Color theme for CLI output

use comfy_table::Color as TableColor;

/// Color theme for terminal output
#[derive(Debug, Clone)]
pub struct ColorTheme {
    pub success: TableColor,
    pub warning: TableColor,
    pub info: TableColor,
    pub muted: TableColor,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            success: TableColor::Green,
            warning: TableColor::Yellow,
            info: TableColor::Cyan,
            muted: TableColor::DarkGrey,
        }
    }
}

impl ColorTheme {
    /// Init containers are tinted apart from application containers
    pub fn get_container_color(&self, is_init: bool) -> TableColor {
        if is_init {
            self.info
        } else {
            self.success
        }
    }

    pub fn get_placement_color(&self, node_count: usize) -> TableColor {
        if node_count == 0 {
            self.warning
        } else {
            self.success
        }
    }
}
