pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use app::{build_installer, run_action};
pub use config::{cli::Cli, ActionConfig};
pub use core::installer::{InstallRequest, Installation, Installer};
pub use utils::error::{Result, SetupError};
