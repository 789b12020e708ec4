pub mod api_handler;
pub mod page_handler;

pub use api_handler::*;
pub use page_handler::*;
