mod catalog;
mod error;
mod eval;
mod generate;
mod ports;
mod prompt;
mod record;
mod sweep;
mod types;

pub use catalog::*;
pub use error::*;
pub use eval::*;
pub use generate::*;
pub use ports::*;
pub use prompt::*;
pub use record::*;
pub use sweep::*;
pub use types::*;
