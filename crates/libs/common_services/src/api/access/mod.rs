pub mod error;
pub mod policy;
pub mod ticket;

pub use error::AccessError;
pub use policy::*;
pub use ticket::*;
