//! Status icons for CLI output

/// Status icons for different states
pub struct StatusIcon;

impl StatusIcon {
    pub const SUCCESS: &'static str = "✓";

    pub const WARNING: &'static str = "⚠";

    /// Init container that attaches a network
    pub const SIDECAR: &'static str = "⇄";

    /// Application container
    pub const APP: &'static str = "▶";

    /// Icon for the placement of a pod: pinned to nodes, or free
    pub fn get_placement_icon(node_count: usize) -> &'static str {
        if node_count == 0 {
            Self::WARNING
        } else {
            Self::SUCCESS
        }
    }

    pub fn get_placement_text(node_count: usize) -> &'static str {
        if node_count == 0 {
            "Unconstrained"
        } else {
            "Pinned"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_placement_icon() {
        assert_eq!(StatusIcon::get_placement_icon(2), StatusIcon::SUCCESS);
        assert_eq!(StatusIcon::get_placement_icon(0), StatusIcon::WARNING);
    }

    #[test]
    fn test_get_placement_text() {
        assert_eq!(StatusIcon::get_placement_text(1), "Pinned");
        assert_eq!(StatusIcon::get_placement_text(0), "Unconstrained");
    }
}
