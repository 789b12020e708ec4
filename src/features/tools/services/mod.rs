mod catalog_service;
mod submission_service;
mod tool_store;

pub use catalog_service::CatalogService;
pub use submission_service::SubmissionService;
pub use tool_store::ToolStore;
