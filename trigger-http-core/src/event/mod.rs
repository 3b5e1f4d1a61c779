mod error;
mod http_request_event;
mod json;
pub mod normalization;
mod str_map;
mod variant;
mod view;

pub use error::*;
pub use http_request_event::*;
pub use str_map::*;
pub use variant::*;
pub use view::*;
