//! Core library for the `forecast` CLI.
//!
//! This crate defines:
//! - The two-step api.weather.gov forecast client
//! - The HTTP session abstraction it borrows from callers
//! - Configuration for callers that build their own session
//!
//! It is used by `forecast-cli`, but can also be reused by other binaries or services.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod session;

pub use client::{DEFAULT_BASE_URL, WeatherClient};
pub use config::Config;
pub use error::ForecastError;
pub use model::Coordinates;
pub use session::{HttpSession, SessionResponse, build_session};
