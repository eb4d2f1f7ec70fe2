pub mod address;
pub mod cpr;
pub mod dates;
pub mod models;
pub mod names;

pub use cpr::Cpr;
pub use dates::DateFormatter;
pub use models::{AddressPeriod, PersonRecord};
pub use names::NameRecord;
