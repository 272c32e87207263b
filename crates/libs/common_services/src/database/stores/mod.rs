mod album_store;
mod photo_store;
mod tag_store;
mod ticket_store;

pub use album_store::AlbumStore;
pub use photo_store::PhotoStore;
pub use tag_store::TagStore;
pub use ticket_store::TicketStore;
