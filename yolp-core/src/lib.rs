//! Client library for the Yahoo! Open Local Platform (YOLP) APIs.
//!
//! This crate defines:
//! - The `Yolp` client for the weather, zip code search and static map endpoints
//! - Static map options, pins and overlays with their validation rules
//! - The YDF document model the JSON endpoints decode into
//! - Configuration & credentials handling
//!
//! Logging goes through `tracing`; install a subscriber to see request spans.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod static_map;

pub use client::{MapApi, Yolp};
pub use config::{Config, Endpoints};
pub use error::{DecodeError, Error, Result, ValidationError};
pub use model::{Feature, Geometry, ResultInfo, Shape, Style, StyleKind, Weather, WeatherType, Ydf};
pub use static_map::{MapMode, Overlay, OverlayType, Pin, PinColor, PinStyle, StaticOptions};
