pub mod config;
pub mod content;
pub mod error;
pub mod excerpt;
pub mod logger;
pub mod post_list;
pub mod post_processor;
pub mod tag_pages;
pub mod text_utils;
mod test_data;
