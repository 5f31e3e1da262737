// src/config/mod.rs

//! Parameter loading and validation for exectester.
//!
//! Responsibilities:
//! - Define the layered raw model and the validated `RunParameters` (`model.rs`).
//! - Load an optional TOML config file (`loader.rs`).
//! - Enforce the parameter-set invariants (`validate.rs`).
//! - Parse duration values (`duration.rs`).

pub mod duration;
pub mod loader;
pub mod model;
pub mod validate;

pub use duration::parse_duration;
pub use loader::{default_config_path, load_config_layer, load_from_path, resolve};
pub use model::{
    InterpolationSettings, RawParameters, RunParameters, Schedule, SocketParameters,
};
