//! File-backed persistence adapters.
//!
//! The gate pass store is a single human-readable JSON array rewritten in
//! full on every save. Access is scoped to the directory holding the file
//! through a `cap_std` capability, and writes go through a temp file and
//! rename so a crash never leaves the array half written.
//!
//! # Example
//!
//! ```no_run
//! use gatepass::outbound::persistence::JsonFileGatePassRepository;
//!
//! let repo = JsonFileGatePassRepository::open("data/gatepass_data.json")?;
//! # Ok::<(), std::io::Error>(())
//! ```

mod atomic_io;
mod json_file_repository;

pub use json_file_repository::{CORRUPT_SUFFIX, JsonFileGatePassRepository};
