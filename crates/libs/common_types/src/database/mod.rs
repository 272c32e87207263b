mod album;
mod photo;
mod tag;
mod ticket;

pub use album::*;
pub use photo::*;
pub use tag::*;
pub use ticket::*;
