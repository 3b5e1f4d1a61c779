mod body;
mod cookies;
mod form;
mod headers;
mod names;
mod query;
#[cfg(test)]
mod tests;

pub use body::*;
pub use cookies::*;
pub use form::*;
pub use headers::*;
pub use names::*;
pub use query::*;
