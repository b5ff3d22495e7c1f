//! Virtual gate panel: character LCD, free-slot counter, occupancy LED.
//!
//! This module provides a virtual 2-line × 16-column panel that simulates
//! the physical gate display assembly. It implements [`Indicators`], so the
//! controller can drive it exactly as it would drive real hardware, and the
//! simulator can render its contents to the terminal.
//!
//! # Character Encoding - ASCII Only
//!
//! The panel only accepts ASCII characters (0x20-0x7E). Physical gate LCD
//! modules do not support extended character sets, and the virtual panel
//! deliberately enforces the same constraint so integrations are tested
//! against real limits.
//!
//! # Examples
//!
//! ```
//! use parkgate_hardware::VirtualPanel;
//!
//! let mut panel = VirtualPanel::new(2, 16);
//! panel.set_line(0, "Free slot: 4").unwrap();
//! panel.set_line(1, "Gate Closed").unwrap();
//!
//! assert_eq!(panel.get_line(1).unwrap().trim_end(), "Gate Closed");
//! ```

use crate::error::{HardwareError, Result};
use crate::traits::Indicators;
use crate::types::LedColor;
use parkgate_core::constants::{PANEL_COLUMNS, PANEL_LINES};

/// Text alignment options for panel lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// Text starts at column 0, padded with spaces on the right.
    Left,
    /// Text centered with equal padding on both sides (extra space on right if odd).
    Center,
    /// Text ends at the last column, padded with spaces on the left.
    Right,
}

/// Virtual gate panel.
///
/// Manages a fixed-size character display buffer together with the
/// free-slot counter and the occupancy LED state. Not thread-safe by
/// design; in async contexts, protect access with `tokio::sync::Mutex`
/// or hand ownership to a single task.
#[derive(Debug, Clone)]
pub struct VirtualPanel {
    /// Number of lines in the display.
    lines: usize,

    /// Number of columns per line.
    columns: usize,

    /// Current display buffer (ASCII characters only).
    buffer: Vec<String>,

    /// Free-slot count last pushed by the controller.
    free_slots: usize,

    /// Occupancy LED state last pushed by the controller.
    led: LedColor,
}

impl VirtualPanel {
    /// Create a new virtual panel with the given dimensions, blank lines,
    /// LED off.
    pub fn new(lines: usize, columns: usize) -> Self {
        Self {
            lines,
            columns,
            buffer: vec![" ".repeat(columns); lines],
            free_slots: 0,
            led: LedColor::Off,
        }
    }

    /// Create a builder for constructing a panel with custom configuration.
    pub fn builder() -> VirtualPanelBuilder {
        VirtualPanelBuilder::default()
    }

    /// Set text on a specific line with left alignment.
    ///
    /// Control characters are removed and text is truncated to the column
    /// width.
    ///
    /// # Errors
    ///
    /// Returns an error if the line index is out of bounds.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `text` contains non-ASCII characters.
    pub fn set_line(&mut self, line: usize, text: &str) -> Result<()> {
        self.set_line_aligned(line, text, Alignment::Left)
    }

    /// Set text on a specific line with custom alignment.
    ///
    /// # Errors
    ///
    /// Returns an error if the line index is out of bounds.
    pub fn set_line_aligned(&mut self, line: usize, text: &str, align: Alignment) -> Result<()> {
        debug_assert!(
            text.is_ascii(),
            "Panel text must be ASCII only for hardware compatibility. Got: '{}'",
            text
        );

        if line >= self.lines {
            return Err(HardwareError::invalid_data(format!(
                "Line {line} out of bounds (panel has {} lines)",
                self.lines
            )));
        }

        let sanitized = sanitize_text(text);
        self.buffer[line] = align_text(&sanitized, self.columns, align);
        Ok(())
    }

    /// Clear all lines by filling them with spaces.
    pub fn clear(&mut self) {
        for line in &mut self.buffer {
            *line = " ".repeat(self.columns);
        }
    }

    /// Get text from a specific line, padded to column width.
    ///
    /// # Errors
    ///
    /// Returns an error if the line index is out of bounds.
    pub fn get_line(&self, line: usize) -> Result<&str> {
        if line >= self.lines {
            return Err(HardwareError::invalid_data(format!(
                "Line {line} out of bounds (panel has {} lines)",
                self.lines
            )));
        }
        Ok(&self.buffer[line])
    }

    /// Get all lines as a vector.
    pub fn get_all_lines(&self) -> Vec<&str> {
        self.buffer.iter().map(|s| s.as_str()).collect()
    }

    /// Free-slot count last pushed by the controller.
    pub fn free_slots(&self) -> usize {
        self.free_slots
    }

    /// Occupancy LED state last pushed by the controller.
    pub fn led_color(&self) -> LedColor {
        self.led
    }

    /// Render the whole panel as a bordered multi-line string for terminal
    /// output.
    pub fn render(&self) -> String {
        let border = format!("+{}+", "-".repeat(self.columns));
        let mut out = String::new();
        out.push_str(&border);
        out.push('\n');
        for line in &self.buffer {
            out.push_str(&format!("|{line}|\n"));
        }
        out.push_str(&border);
        let (r, g, b) = self.led.as_rgb();
        out.push_str(&format!("\nLED rgb({r},{g},{b})  free: {}", self.free_slots));
        out
    }
}

impl Default for VirtualPanel {
    fn default() -> Self {
        Self::new(PANEL_LINES, PANEL_COLUMNS)
    }
}

impl Indicators for VirtualPanel {
    async fn set_status_text(&mut self, text: &str) -> Result<()> {
        // Status line is the second row, as on the deployed gate LCD.
        self.set_line(self.lines - 1, text)
    }

    async fn set_free_slots(&mut self, count: usize) -> Result<()> {
        self.free_slots = count;
        self.set_line(0, &format!("Free slot: {count}"))
    }

    async fn set_occupancy_color(&mut self, color: LedColor) -> Result<()> {
        self.led = color;
        Ok(())
    }
}

/// Builder for constructing [`VirtualPanel`] instances.
///
/// # Examples
///
/// ```
/// use parkgate_hardware::VirtualPanel;
///
/// let panel = VirtualPanel::builder().with_size(2, 20).build();
/// assert_eq!(panel.get_line(0).unwrap().len(), 20);
/// ```
#[derive(Debug)]
pub struct VirtualPanelBuilder {
    lines: usize,
    columns: usize,
}

impl VirtualPanelBuilder {
    /// Set the panel size (lines and columns).
    pub fn with_size(mut self, lines: usize, columns: usize) -> Self {
        self.lines = lines;
        self.columns = columns;
        self
    }

    /// Build the panel with configured parameters.
    pub fn build(self) -> VirtualPanel {
        VirtualPanel::new(self.lines, self.columns)
    }
}

impl Default for VirtualPanelBuilder {
    fn default() -> Self {
        Self {
            lines: PANEL_LINES,
            columns: PANEL_COLUMNS,
        }
    }
}

/// Truncate ASCII text to a maximum number of characters.
///
/// # Examples
///
/// ```
/// use parkgate_hardware::truncate_text;
///
/// assert_eq!(truncate_text("Gate Closing...", 10), "Gate Closi");
/// assert_eq!(truncate_text("Short", 10), "Short");
/// ```
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Align ASCII text within a fixed width, padding with spaces.
///
/// # Examples
///
/// ```
/// use parkgate_hardware::{Alignment, align_text};
///
/// assert_eq!(align_text("OPEN", 8, Alignment::Left), "OPEN    ");
/// assert_eq!(align_text("OPEN", 8, Alignment::Center), "  OPEN  ");
/// assert_eq!(align_text("OPEN", 8, Alignment::Right), "    OPEN");
/// ```
pub fn align_text(text: &str, width: usize, alignment: Alignment) -> String {
    let char_count = text.chars().count();

    if char_count >= width {
        return truncate_text(text, width);
    }

    let padding = width - char_count;

    match alignment {
        Alignment::Left => format!("{}{}", text, " ".repeat(padding)),
        Alignment::Right => format!("{}{}", " ".repeat(padding), text),
        Alignment::Center => {
            let left_pad = padding / 2;
            let right_pad = padding - left_pad;
            format!("{}{}{}", " ".repeat(left_pad), text, " ".repeat(right_pad))
        }
    }
}

/// Sanitize text by removing control characters and trimming.
fn sanitize_text(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string()
}
