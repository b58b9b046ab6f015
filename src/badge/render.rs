//! Layout and rendering of completed dispatch actions.
//!
//! The badge canvas is a fixed monochrome e-paper panel. Text renders as up
//! to three centered lines: the two name fields in the largest of the three
//! display fonts whose bounding box fits, the additional-info line in the
//! small font pinned near the bottom edge. Every completed render overlays
//! the battery voltage in the top-left corner and ends with exactly one
//! physical refresh.

use log::info;

use super::{BatteryProbe, EpaperPanel, Font};

/// Top margin of the first name line.
const Y_OFFSET: u32 = 40;
/// Vertical gap between name lines.
const LINE_SPACING: u32 = 50;
/// Height budget a name line must fit into when choosing its font.
const NAME_BOX_HEIGHT: u32 = 150;
/// Gap between the additional-info line and the bottom edge.
const BOTTOM_MARGIN: u32 = 20;

/// Fonts tried for the name lines, largest first.
const NAME_FONTS: [Font; 3] = [Font::Large, Font::Medium, Font::Small];

/// Hands completed payloads to the panel collaborator and triggers the
/// physical refresh. Owns the panel and battery probe for the lifetime of the
/// worker.
pub struct RenderBridge<P, B> {
    panel: P,
    battery: B,
    width: u32,
    height: u32,
}

impl<P: EpaperPanel, B: BatteryProbe> RenderBridge<P, B> {
    pub fn new(panel: P, battery: B, width: u32, height: u32) -> Self {
        Self {
            panel,
            battery,
            width,
            height,
        }
    }

    /// Fill the canvas to the background color and refresh.
    pub fn render_clear(&mut self) {
        self.panel.clear();
        self.overlay_battery();
        self.panel.refresh();
    }

    /// Lay out the three cleaned text fields and refresh.
    pub fn render_text(&mut self, first_name: &str, last_name: &str, additional_info: &str) {
        self.panel.clear();

        let mut y = Y_OFFSET;
        for line in [first_name, last_name] {
            if line.is_empty() {
                continue;
            }
            let font = self.select_name_font(line);
            y += self.draw_centered(line, y, font) + LINE_SPACING;
        }

        if !additional_info.is_empty() {
            let (w, h) = self.panel.measure_text(additional_info, Font::Small);
            let x = (self.width.saturating_sub(w)) / 2;
            let y = self.height.saturating_sub(h + BOTTOM_MARGIN);
            self.panel.draw_text(x, y, additional_info, Font::Small);
        }

        self.overlay_battery();
        self.panel.refresh();
    }

    /// Blit a full-frame reassembled bitmap at the origin and refresh.
    pub fn render_bitmap(&mut self, data: &[u8]) {
        info!("full bitmap received ({} bytes), rendering", data.len());
        self.panel.clear();
        self.panel.draw_bitmap(0, 0, data, self.width, self.height);
        self.overlay_battery();
        self.panel.refresh();
    }

    /// Largest of the three display fonts whose bounding box for `text` fits
    /// the full panel width and the name box height; falls back to the
    /// smallest when none fit.
    fn select_name_font(&mut self, text: &str) -> Font {
        for font in NAME_FONTS {
            let (w, h) = self.panel.measure_text(text, font);
            if w <= self.width && h <= NAME_BOX_HEIGHT {
                return font;
            }
        }
        Font::Small
    }

    /// Draw `text` horizontally centered at `y`; returns the line height.
    fn draw_centered(&mut self, text: &str, y: u32, font: Font) -> u32 {
        let (w, h) = self.panel.measure_text(text, font);
        let x = (self.width.saturating_sub(w)) / 2;
        self.panel.draw_text(x, y, text, font);
        h
    }

    fn overlay_battery(&mut self) {
        let millivolts = self.battery.read_millivolts();
        let label = format!("{:.2}V", millivolts / 1000.0);
        self.panel.draw_text(0, 0, &label, Font::Tiny);
    }
}
