//! Two-click range selection over the calendar and the bulk actions it offers

pub mod machine;
pub mod service;
