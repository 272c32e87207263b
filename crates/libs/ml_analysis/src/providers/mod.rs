mod custom;
mod disabled;
mod google;
mod openai;

pub use custom::CustomHttpProvider;
pub use disabled::DisabledProvider;
pub use google::{GoogleVisionProvider, labels_to_analysis};
pub use openai::{OpenAiVisionProvider, parse_curator_reply};
