mod tool_dto;

pub use tool_dto::{
    CategorySummaryDto, DirectoryQuery, SubmitToolDto, SubmittedToolDto, ToolResponseDto,
};
