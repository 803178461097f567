//! Clients for the external generative services.
//!
//! - [`client`]: one-shot WebSocket round trip to the chat generation server
//! - [`service`]: the [`GenerationService`](service::GenerationService) seam the
//!   HTTP layer depends on, so tests can swap in a stub
//! - [`image`]: HTTP client for the text-to-image server

pub mod client;
pub mod image;
pub mod messages;
pub mod service;
