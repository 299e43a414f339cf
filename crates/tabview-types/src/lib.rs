pub mod criteria;
pub mod error;
pub mod pagination;
pub mod record;
pub mod selection;
pub mod wire;

pub use criteria::*;
pub use error::{Error, Result};
pub use pagination::*;
pub use record::*;
pub use selection::*;
pub use wire::*;
