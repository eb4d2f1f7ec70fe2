mod nova;
mod registry;

pub use nova::{CaseProfile, NovaClient, NovaConfig};
pub use registry::{CaseRegistry, FixedCaseNumber};
