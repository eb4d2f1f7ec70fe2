pub mod connection;
pub mod history;
pub mod lookup;
pub mod person;

pub use connection::{init_db, Database};
pub use lookup::PersonLookup;
