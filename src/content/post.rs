use std::path::{Path, PathBuf};
use std::fs;

use chrono::{DateTime, FixedOffset};

use crate::content::fence::{classify_line, FenceStack};
use crate::content::frontmatter::Frontmatter;
use crate::content::hashtag::Hashtag;
use crate::content::shortcode::hashtag_token;
use crate::error::{MarkoutError, MetadataError, Result};
use crate::text_utils::NEWLINE;

const FRONTMATTER_DELIMITER: &str = "---";

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub raw_text: String,
    /// Line with its trailing hashtag run removed
    pub text: String,
    /// What gets written back out
    pub output: String,
    pub hashtags: Vec<Hashtag>,
    pub is_fenced: bool,
}

impl Line {
    fn apply_shortcodes(&mut self) {
        let mut sorted: Vec<&Hashtag> = self.hashtags.iter().collect();
        sorted.sort();

        let mut output = self.text.clone();
        for hashtag in sorted {
            output.push_str(&hashtag_token(hashtag.as_str(), None));
        }
        self.output = output;
    }
}

pub struct Post {
    pub path: PathBuf,
    pub frontmatter: Frontmatter,
    pub content: Vec<Line>,
}

/// Example of post
/// ---
/// title: Notes
/// draft: false
/// ---
///
/// Something worth remembering #rust #tips
impl Post {
    pub fn read(path: &Path, now: &DateTime<FixedOffset>) -> Result<Post> {
        let content = fs::read_to_string(path).map_err(|e| MarkoutError::Io(path.to_path_buf(), e))?;
        Self::from_string(path, &content, now)
    }

    pub fn from_string(path: &Path, content: &str, now: &DateTime<FixedOffset>) -> Result<Post> {
        let (frontmatter_lines, body_lines) =
            split_frontmatter(content).map_err(|e| MarkoutError::Metadata(path.to_path_buf(), e))?;

        let frontmatter = Frontmatter::parse(&frontmatter_lines.join("\n"), now)
            .map_err(|e| MarkoutError::Metadata(path.to_path_buf(), e))?;

        Ok(Post {
            path: path.to_path_buf(),
            frontmatter,
            content: parse_lines(&body_lines),
        })
    }

    /// Appends a shortcode for every hashtag of a line to its output text.
    pub fn apply_shortcodes(&mut self) {
        for line in self.content.iter_mut() {
            line.apply_shortcodes();
        }
    }

    pub fn hashtag_count(&self) -> usize {
        self.content.iter().map(|line| line.hashtags.len()).sum()
    }

    pub fn to_text(&self) -> String {
        let body: Vec<&str> = self.content.iter().map(|line| line.output.as_str()).collect();
        let body = body.join(NEWLINE);
        [
            FRONTMATTER_DELIMITER,
            self.frontmatter.raw_text.as_str(),
            FRONTMATTER_DELIMITER,
            body.as_str(),
            NEWLINE,
        ].join(NEWLINE)
    }
}

fn split_frontmatter(content: &str) -> std::result::Result<(Vec<&str>, Vec<&str>), MetadataError> {
    let mut lines = content.lines().skip_while(|line| line.is_empty()).peekable();

    let mut frontmatter = vec![];
    if lines.peek() == Some(&FRONTMATTER_DELIMITER) {
        lines.next();
        loop {
            match lines.next() {
                Some(FRONTMATTER_DELIMITER) => break,
                Some(line) => frontmatter.push(line),
                None => return Err(MetadataError::Unterminated),
            }
        }
    }

    Ok((frontmatter, lines.collect()))
}

/// Runs every body line through the classifier, keeping fence state across lines.
/// Fences still open at the end of the body are dropped.
pub fn parse_lines(raw_lines: &[&str]) -> Vec<Line> {
    let mut fences = FenceStack::new();
    raw_lines
        .iter()
        .map(|raw_line| {
            let classified = classify_line(&mut fences, raw_line);
            Line {
                raw_text: raw_line.to_string(),
                output: classified.text.clone(),
                text: classified.text,
                hashtags: classified.hashtags,
                is_fenced: classified.is_fenced,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use crate::test_data::{POST_DATA, POST_NO_FRONTMATTER};

    use super::*;

    fn now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn tags(line: &Line) -> Vec<&str> {
        line.hashtags.iter().map(|h| h.as_str()).collect()
    }

    #[test]
    fn test_from_string() {
        let path = PathBuf::from("posts/notes.md");
        let post = Post::from_string(&path, POST_DATA, &now()).unwrap();

        assert_eq!(post.frontmatter.raw_text, "title: Notes on tooling\ndraft: false");
        assert!(!post.frontmatter.is_draft);
        assert_eq!(post.content[0].text, "# Notes on tooling");
        assert_eq!(post.content[2].text, "Cargo workspaces keep things tidy ");
        assert_eq!(tags(&post.content[2]), ["rust", "cargo"]);

        let fenced: Vec<&Line> = post.content.iter().filter(|l| l.raw_text.contains("# not a tag")).collect();
        assert_eq!(fenced.len(), 1);
        assert!(fenced[0].is_fenced);
        assert!(fenced[0].hashtags.is_empty());
    }

    #[test]
    fn test_no_frontmatter() {
        let path = PathBuf::from("plain.md");
        let post = Post::from_string(&path, POST_NO_FRONTMATTER, &now()).unwrap();
        assert_eq!(post.frontmatter.raw_text, "");
        assert!(!post.frontmatter.is_draft);
        assert!(!post.frontmatter.is_future);
        assert_eq!(post.content.len(), 3);
        assert_eq!(post.content[0].raw_text, "First line");
    }

    #[test]
    fn test_round_trip_without_hashtags() {
        let path = PathBuf::from("plain.md");
        let mut post = Post::from_string(&path, POST_NO_FRONTMATTER, &now()).unwrap();
        post.apply_shortcodes();
        let expected = format!("---{nl}{nl}---{nl}First line{nl}{nl}Last line{nl}{nl}", nl = NEWLINE);
        assert_eq!(post.to_text(), expected);
    }

    #[test]
    fn test_apply_shortcodes() {
        let path = PathBuf::from("a.md");
        let mut post = Post::from_string(&path, "---\ndraft: false\n---\nSome note #foo #bar\n", &now()).unwrap();
        post.apply_shortcodes();
        assert_eq!(
            post.content[0].output,
            "Some note {{% hashtag %}}#bar{{% /hashtag %}}{{% hashtag %}}#foo{{% /hashtag %}}"
        );
        assert_eq!(post.content[0].text, "Some note ");
        assert_eq!(post.hashtag_count(), 2);
    }

    #[test]
    fn test_unterminated_frontmatter() {
        let path = PathBuf::from("broken.md");
        let err = Post::from_string(&path, "---\ntitle: x\nbody", &now()).err().unwrap();
        assert!(matches!(err, MarkoutError::Metadata(_, MetadataError::Unterminated)));
    }

    #[test]
    fn test_invalid_metadata_reports_path() {
        let path = PathBuf::from("posts/bad.md");
        let err = Post::from_string(&path, "---\ndraft: perhaps\n---\nbody", &now()).err().unwrap();
        assert!(format!("{}", err).contains("posts/bad.md"));
    }

    #[test]
    fn test_unbalanced_fence_is_accepted() {
        let path = PathBuf::from("a.md");
        let post = Post::from_string(&path, "```\ncode #x\n", &now()).unwrap();
        assert!(post.content[1].is_fenced);
        assert!(post.content[1].hashtags.is_empty());
    }

    #[test]
    fn test_read_missing_file() {
        let err = Post::read(Path::new("/definitely/not/here.md"), &now()).err().unwrap();
        assert!(matches!(err, MarkoutError::Io(..)));
    }
}
