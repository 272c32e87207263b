pub mod error;
pub mod interfaces;
pub mod naming;
pub mod pipeline;
pub mod service;
pub mod tags;
