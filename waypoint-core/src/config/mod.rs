//! Configuration system for Waypoint.
//! TOML-based, 4-layer resolution: CLI > env > project > user > defaults.

pub mod healing_config;
pub mod llkb_config;
pub mod mapping_config;
pub mod runner_config;
pub mod waypoint_config;

pub use healing_config::HealingConfig;
pub use llkb_config::LlkbConfig;
pub use mapping_config::MappingConfig;
pub use runner_config::RunnerConfig;
pub use waypoint_config::{CliOverrides, WaypointConfig};
