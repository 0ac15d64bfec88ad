use chrono::{DateTime, FixedOffset};
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::MetadataError;
use crate::text_utils::{parse_bool, parse_date_time};

/// The `---` delimited header of a post.
///
/// `is_future` depends on the moment the header is parsed: a post with a
/// `publishDate` later than `now` is held back until a run happens after that
/// date. The same input can therefore publish differently on different days.
#[derive(Debug, Clone, PartialEq)]
pub struct Frontmatter {
    pub raw_text: String,
    pub is_draft: bool,
    pub is_future: bool,
}

impl Frontmatter {
    pub fn parse(raw_text: &str, now: &DateTime<FixedOffset>) -> Result<Frontmatter, MetadataError> {
        lazy_static! {
            static ref PUBLISH_DATE_REGEX: Regex = Regex::new(
                r#"(?m)^\s*publishDate:\s*['"]?(?P<value>.*?)['"]?\s*$"#
            ).unwrap();
            static ref DRAFT_REGEX: Regex = Regex::new(
                r#"(?m)^\s*draft:\s*['"]?(?P<value>.*?)['"]?\s*$"#
            ).unwrap();
        }

        let is_future = match extract_value(raw_text, &PUBLISH_DATE_REGEX) {
            Some(value) => {
                let publish_date = parse_date_time(value).map_err(|reason| MetadataError::InvalidDate {
                    value: value.to_string(),
                    reason,
                })?;
                publish_date.resolve(now.offset()) > *now
            }
            None => false,
        };

        let is_draft = match extract_value(raw_text, &DRAFT_REGEX) {
            Some(value) => parse_bool(value).ok_or_else(|| MetadataError::InvalidBool {
                value: value.to_string(),
            })?,
            None => false,
        };

        Ok(Frontmatter {
            raw_text: raw_text.to_string(),
            is_draft,
            is_future,
        })
    }
}

fn extract_value<'a>(raw_text: &'a str, key_regex: &Regex) -> Option<&'a str> {
    key_regex
        .captures(raw_text)
        .and_then(|cap| cap.name("value").map(|val| val.as_str()))
}
