//! # Badge Receive Path
//!
//! Everything that runs on the display device after a frame leaves the radio:
//! dispatch, text cleanup, bitmap reassembly (see [`crate::protocol`]), and
//! rendering.
//!
//! The hardware collaborators are trait seams so the protocol core stays
//! host-testable: the e-paper panel, the battery ADC, and the device restart
//! hook are injected into the [`worker::BadgeWorker`], which is the only
//! place any of them are touched. The panel refresh is the single slow,
//! side-effecting operation (hundreds of milliseconds to seconds on e-paper)
//! and therefore must never run in the frame-receipt callback.

pub mod dispatch;
pub mod render;
pub mod textnorm;
pub mod worker;

pub use dispatch::{dispatch, DispatchAction, RESET_CODEWORD};
pub use render::RenderBridge;
pub use worker::BadgeWorker;

/// Font slots the badge build carries. Three condensed display sizes for the
/// name lines plus the built-in tiny font used for the battery overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Large,
    Medium,
    Small,
    Tiny,
}

/// The e-paper panel, as consumed by the render bridge.
///
/// Draw calls mutate an in-memory canvas; nothing reaches the physical panel
/// until `refresh`.
pub trait EpaperPanel {
    /// Fill the whole canvas with the background color.
    fn clear(&mut self);
    fn draw_text(&mut self, x: u32, y: u32, text: &str, font: Font);
    /// Blit a packed 1-bpp monochrome image, row-major, MSB first.
    fn draw_bitmap(&mut self, x: u32, y: u32, data: &[u8], width: u32, height: u32);
    /// Bounding box of `text` in `font`, in pixels.
    fn measure_text(&mut self, text: &str, font: Font) -> (u32, u32);
    /// Push the canvas to the physical panel. Slow; worker context only.
    fn refresh(&mut self);
}

/// The ADC-backed battery reader.
pub trait BatteryProbe {
    /// Current battery voltage in millivolts.
    fn read_millivolts(&mut self) -> f32;
}

/// Device-level control the worker can trigger.
pub trait DeviceControl {
    /// Soft-restart the device. Invoked by the operator reset codeword.
    fn restart(&self);
}
