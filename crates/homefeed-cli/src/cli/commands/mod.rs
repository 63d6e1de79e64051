//! CLI command handlers, one per file.

mod add;
mod diagnose;
mod remove;
mod render;
mod show;
mod update;

pub use add::run_add;
pub use diagnose::run_diagnose;
pub use remove::run_remove;
pub use render::{render_feature_line, render_notice, render_state};
pub use show::{parse_input, run_show, Input};
pub use update::run_update;
