pub mod config;
pub mod render;

pub use config::EngineConfig;
pub use render::RenderEngine;
