//! Monte-Carlo path tracer that renders sphere scenes to the terminal
//!
//! The pipeline: jittered camera rays, recursive light transport over
//! diffuse, specular and refractive materials, per-pixel radiance
//! accumulation, then a frame-global log-domain tone map onto a glyph
//! ramp and a 9-color ANSI palette.

pub mod camera;
pub mod config;
pub mod display;
pub mod renderer;
pub mod sampler;
pub mod scene;
pub mod terminal;

pub use camera::Camera;
pub use config::RenderConfig;
pub use renderer::Renderer;
pub use sampler::HaltonSampler;
pub use scene::Scene;

/// Glyph ramp used for grayscale quantization, index 0 = darkest pixels.
pub const GLYPH_RAMP: &str = "█.`:,;'_^\"></-!~=)(|j?}{][ti+l7v1%yrfcJ32uIC$zwo96sngaT5qpkYVOL40&mG8*xhedbZUSAQPFDXWK#RNEHBM@";
