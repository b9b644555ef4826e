//! Tower middleware: the authentication gate.

pub mod gate;

pub use gate::{CasGateLayer, CasGateService};
