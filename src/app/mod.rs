//! Application orchestration module

pub mod execution;
pub mod initialization;

pub use execution::{render_report, run_transfer};
pub use initialization::{
    configure_logging,
    create_colour_manager,
    load_configuration,
    resolve_pipeline_config,
};
