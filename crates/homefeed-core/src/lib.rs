pub mod config;
pub mod logging;

pub mod control;
pub mod controller;
pub mod diagnostics;
pub mod feature;
pub mod remote;
pub mod retry;
