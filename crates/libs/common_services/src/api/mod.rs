pub mod access;
pub mod album;
pub mod auth;
pub mod photos;
pub mod upload;
