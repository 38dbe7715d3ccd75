//! Static catalog data for the VisaFlow session engine
//!
//! Everything here is immutable after process start: the five flow packs,
//! the demo scenario presets, the shared micro-check bank, and the citation
//! source index. The catalog carries no session state.

#![deny(unsafe_code)]

mod checks;
mod flows;
mod knowledge;
mod scenarios;

pub use checks::CheckBank;
pub use flows::FlowCatalog;
pub use knowledge::{source_index, SourceEntry};
pub use scenarios::demo_scenarios;
