//! Commands - calendar view to backend bridge

mod availability;

pub use availability::*;
