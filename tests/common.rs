//! Test fixtures: a recording e-paper panel, fixed battery probe, restart
//! counter, and a recording radio transport. Measurement is deterministic so
//! font-selection assertions stay stable.
#![allow(dead_code)] // Each test binary uses a subset of these fixtures.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use inkbadge::badge::{BatteryProbe, DeviceControl, EpaperPanel, Font};
use inkbadge::protocol::PeerAddress;
use inkbadge::radio::{RadioError, RadioTransport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelCall {
    Clear,
    Text {
        x: u32,
        y: u32,
        text: String,
        font: Font,
    },
    Bitmap {
        x: u32,
        y: u32,
        len: usize,
        width: u32,
        height: u32,
    },
    Refresh,
}

/// Panel that records every draw call. Character cells are fixed per font:
/// Large 80x140, Medium 60x110, Small 40x70, Tiny 6x8.
#[derive(Clone, Default)]
pub struct RecordingPanel {
    pub calls: Arc<Mutex<Vec<PanelCall>>>,
}

impl RecordingPanel {
    pub fn new() -> (Self, Arc<Mutex<Vec<PanelCall>>>) {
        let panel = Self::default();
        let log = Arc::clone(&panel.calls);
        (panel, log)
    }

    fn cell(font: Font) -> (u32, u32) {
        match font {
            Font::Large => (80, 140),
            Font::Medium => (60, 110),
            Font::Small => (40, 70),
            Font::Tiny => (6, 8),
        }
    }
}

impl EpaperPanel for RecordingPanel {
    fn clear(&mut self) {
        self.calls.lock().unwrap().push(PanelCall::Clear);
    }

    fn draw_text(&mut self, x: u32, y: u32, text: &str, font: Font) {
        self.calls.lock().unwrap().push(PanelCall::Text {
            x,
            y,
            text: text.to_string(),
            font,
        });
    }

    fn draw_bitmap(&mut self, x: u32, y: u32, data: &[u8], width: u32, height: u32) {
        self.calls.lock().unwrap().push(PanelCall::Bitmap {
            x,
            y,
            len: data.len(),
            width,
            height,
        });
    }

    fn measure_text(&mut self, text: &str, font: Font) -> (u32, u32) {
        let (w, h) = Self::cell(font);
        (w * text.chars().count() as u32, h)
    }

    fn refresh(&mut self) {
        self.calls.lock().unwrap().push(PanelCall::Refresh);
    }
}

/// Battery probe reporting a constant millivolt reading.
pub struct FixedBattery(pub f32);

impl BatteryProbe for FixedBattery {
    fn read_millivolts(&mut self) -> f32 {
        self.0
    }
}

/// Counts restart requests. Clones share the counter.
#[derive(Clone, Default)]
pub struct RestartCounter {
    restarts: Arc<AtomicUsize>,
}

impl RestartCounter {
    pub fn count(&self) -> usize {
        self.restarts.load(Ordering::SeqCst)
    }
}

impl DeviceControl for RestartCounter {
    fn restart(&self) {
        self.restarts.fetch_add(1, Ordering::SeqCst);
    }
}

/// Radio transport that records every accepted frame.
#[derive(Default)]
pub struct RecordingRadio {
    pub frames: Mutex<Vec<(PeerAddress, Vec<u8>)>>,
}

impl RecordingRadio {
    pub fn payloads_for(&self, dest: PeerAddress) -> Vec<Vec<u8>> {
        self.frames
            .lock()
            .unwrap()
            .iter()
            .filter(|(d, _)| *d == dest)
            .map(|(_, p)| p.clone())
            .collect()
    }
}

impl RadioTransport for RecordingRadio {
    fn register_peer(&self, _peer: PeerAddress) -> Result<(), RadioError> {
        Ok(())
    }

    fn send(&self, destination: PeerAddress, payload: &[u8]) -> Result<(), RadioError> {
        self.frames
            .lock()
            .unwrap()
            .push((destination, payload.to_vec()));
        Ok(())
    }
}

pub fn badge_addr() -> PeerAddress {
    "34:5F:45:2D:B1:68".parse().unwrap()
}
