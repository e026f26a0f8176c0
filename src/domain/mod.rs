pub mod admin;
pub mod news;
pub mod photo;

pub use admin::*;
pub use news::*;
pub use photo::*;
