mod category;
mod tool;

pub use category::Category;
pub use tool::{ListingStatus, NewTool, Tool};
