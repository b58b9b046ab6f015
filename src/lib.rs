//! # Inkbadge - E-paper badge protocol core and gateway
//!
//! Inkbadge drives battery-powered e-paper badges over a short-range,
//! connectionless radio link with a frame MTU of 250 bytes. A gateway exposes
//! an HTTP control surface and forwards commands to one or more badges, which
//! render either text fields or a full-frame monochrome bitmap.
//!
//! ## Features
//!
//! - **Frame dispatch**: A single worker task per badge classifies inbound
//!   payloads as JSON control messages or raw bitmap fragments.
//! - **Chunked bitmap transfer**: Large images are fragmented into MTU-sized
//!   frames on the gateway and reassembled on the badge without any wire
//!   header, paced to respect the radio duty cycle.
//! - **Interrupt-safe handoff**: Received frames cross from the radio callback
//!   to the worker through a bounded, non-blocking queue.
//! - **Text cleanup**: Czech diacritics are folded to the ASCII glyphs the
//!   badge fonts carry.
//! - **HTTP gateway**: Axum endpoints for text sends, image uploads, badge
//!   clearing, and maintenance of the persisted badge address set.
//! - **Async design**: Built with Tokio; the HTTP path never blocks on the
//!   radio and the radio path never blocks on rendering.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use inkbadge::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     println!("gateway binds {}", config.gateway.bind);
//!     Ok(())
//! }
//! ```
//!
//! ## Module organization
//!
//! - [`protocol`] - Wire types, the frame queue, and bitmap reassembly
//! - [`badge`] - Receive-side dispatch, text cleanup, and rendering
//! - [`gateway`] - HTTP endpoints and the paced chunk sender
//! - [`radio`] - The radio transport seam
//! - [`storage`] - Persisted badge address set
//! - [`config`] - Configuration management
//!
//! ## Architecture
//!
//! ```text
//! HTTP endpoint -> Chunked Sender -> radio transport
//!                                        |
//!      receive callback -> Frame Queue -> worker -> Dispatcher
//!                                                     |
//!                                  { text path | bitmap reassembly }
//!                                                     |
//!                                              Render Bridge -> panel
//! ```

pub mod badge;
pub mod config;
pub mod gateway;
pub mod logutil;
pub mod protocol;
pub mod radio;
pub mod storage;
