//! Types shared by the match orchestrator and its front-ends.

pub mod config;
pub mod vec3;
pub mod viewport;

pub use config::{CameraConfig, ConfigError, MatchConfig};
pub use vec3::Vec3;
pub use viewport::{PhysicalViewport, ViewportRect};
