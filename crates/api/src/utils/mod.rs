//! Command plumbing shared by the calendar commands

pub mod command_helpers;
pub mod logging;
