//! Availability slots: ports, link resolution, the optimistic slot cache, and
//! horizon maintenance.

pub mod horizon;
pub mod linker;
pub mod ports;
pub mod slot_store;
