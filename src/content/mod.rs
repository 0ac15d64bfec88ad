pub mod fence;
pub mod frontmatter;
pub mod hashtag;
pub mod post;
pub mod shortcode;
