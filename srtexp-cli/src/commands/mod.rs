//! CLI command implementations.
//!
//! - `dump`: Print the resolved configuration
//! - `validate`: Report load problems
//! - `lookup`: Show the resolved settings for one object
//! - `port`: Print the listening port for one object

pub mod dump;
pub mod lookup;
pub mod port;
pub mod validate;

pub use dump::DumpCommand;
pub use lookup::LookupCommand;
pub use port::PortCommand;
pub use validate::ValidateCommand;
