pub mod document;
pub mod request;

pub use document::*;
pub use request::*;
