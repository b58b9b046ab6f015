//! The badge worker task: sole consumer of the frame queue and the only place
//! dispatch, reassembly, and rendering happen.
//!
//! The worker blocks indefinitely waiting for frames; it has no other duty.
//! The reassembly buffer is an owned value here, not ambient global state, so
//! no other task can race it. There is no cancellation for an in-flight
//! transfer: a badge that misses fragments stays partially filled until
//! overflow or the next full transfer, and callers needing a clean slate send
//! an explicit clear first.

use log::{info, warn};

use crate::config::BadgeConfig;
use crate::protocol::{Frame, FrameReceiver, ReassemblyBuffer, ReassemblyResult};

use super::dispatch::{dispatch, DispatchAction};
use super::render::RenderBridge;
use super::{BatteryProbe, DeviceControl, EpaperPanel};

pub struct BadgeWorker<P, B, D> {
    reassembly: ReassemblyBuffer,
    render: RenderBridge<P, B>,
    control: D,
}

impl<P: EpaperPanel, B: BatteryProbe, D: DeviceControl> BadgeWorker<P, B, D> {
    /// Build a worker for a panel of `width` x `height` pixels at one bit per
    /// pixel.
    pub fn new(panel: P, battery: B, control: D, width: u32, height: u32) -> Self {
        let capacity = (width as usize * height as usize) / 8;
        Self {
            reassembly: ReassemblyBuffer::new(capacity),
            render: RenderBridge::new(panel, battery, width, height),
            control,
        }
    }

    /// Build a worker for the panel geometry in the badge config section.
    pub fn from_config(panel: P, battery: B, control: D, config: &BadgeConfig) -> Self {
        Self::new(panel, battery, control, config.width, config.height)
    }

    /// Consume frames until every producer handle is dropped.
    pub async fn run(mut self, mut frames: FrameReceiver) {
        info!(
            "badge worker started, bitmap capacity {} bytes",
            self.reassembly.capacity()
        );
        while let Some(frame) = frames.dequeue().await {
            self.handle_frame(&frame);
        }
        info!("frame queue closed, badge worker exiting");
    }

    /// Dispatch one frame. Split out from [`run`](Self::run) so the receive
    /// path can be driven synchronously in tests.
    pub fn handle_frame(&mut self, frame: &Frame) {
        match dispatch(&frame.payload) {
            None => {}
            Some(DispatchAction::Clear) => {
                // Clear and bitmap transfer are mutually exclusive features,
                // but a stale partial transfer must not survive a clear.
                self.reassembly.reset();
                self.render.render_clear();
            }
            Some(DispatchAction::Restart) => {
                warn!("reset codeword received from {}, restarting", frame.source);
                self.control.restart();
            }
            Some(DispatchAction::RenderText {
                first_name,
                last_name,
                additional_info,
            }) => {
                self.render
                    .render_text(&first_name, &last_name, &additional_info);
            }
            Some(DispatchAction::BitmapFragment) => match self.reassembly.append(&frame.payload) {
                ReassemblyResult::Accepted => {}
                ReassemblyResult::Completed(bitmap) => self.render.render_bitmap(&bitmap),
                ReassemblyResult::Overflowed => {
                    warn!(
                        "bitmap fragment of {} bytes from {} overflowed the {}-byte buffer, transfer abandoned",
                        frame.payload.len(),
                        frame.source,
                        self.reassembly.capacity()
                    );
                }
            },
        }
    }

    /// True while a bitmap transfer is partially accumulated.
    pub fn transfer_in_progress(&self) -> bool {
        self.reassembly.in_progress()
    }
}
