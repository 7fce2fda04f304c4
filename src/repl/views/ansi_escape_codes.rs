//! ANSI escape code constants for terminal styling

// ============================================================================
// TEXT ATTRIBUTES
// ============================================================================

pub const RESET: &str = "\x1b[0m"; // Reset all attributes
pub const BOLD: &str = "\x1b[1m"; // Bold text
pub const DIM: &str = "\x1b[2m"; // Dimmed/faint text

// ============================================================================
// STANDARD FOREGROUND COLORS (30-37)
// ============================================================================

pub const FG_RED: &str = "\x1b[31m";
pub const FG_GREEN: &str = "\x1b[32m";
pub const FG_YELLOW: &str = "\x1b[33m";
pub const FG_CYAN: &str = "\x1b[36m";

// ============================================================================
// COMBINED STYLES
// ============================================================================

pub const BOLD_GREEN: &str = "\x1b[1;32m";
pub const BOLD_CYAN: &str = "\x1b[1;36m";
pub const BOLD_MAGENTA: &str = "\x1b[1;35m";
