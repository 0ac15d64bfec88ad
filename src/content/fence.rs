use lazy_static::lazy_static;
use regex::Regex;

use crate::content::hashtag::Hashtag;

const FENCE_DELIMITERS: [&str; 2] = ["```", "$$"];

/// Open fence delimiters, innermost last. A delimiter line only closes the
/// innermost fence when it is the exact same string, so "```" cannot close "$$".
#[derive(Debug, Default)]
pub struct FenceStack {
    open: Vec<String>,
}

impl FenceStack {
    pub fn new() -> Self {
        FenceStack { open: vec![] }
    }

    pub fn is_fence(line: &str) -> bool {
        FENCE_DELIMITERS.contains(&line)
    }

    /// Opens or closes a fence for a delimiter line.
    pub fn toggle(&mut self, delimiter: &str) {
        match self.open.last() {
            Some(top) if top == delimiter => {
                self.open.pop();
            }
            _ => self.open.push(delimiter.to_string()),
        }
    }

    pub fn is_open(&self) -> bool {
        !self.open.is_empty()
    }
}

/// Result of classifying a single body line.
#[derive(Debug, Clone, PartialEq)]
pub struct Classified {
    pub text: String,
    pub hashtags: Vec<Hashtag>,
    pub is_fenced: bool,
}

/// Classifies one line against the fence state left by the previous lines.
///
/// Delimiter lines update the stack and report the state after the update.
/// Other lines inside a fence pass through untouched. Outside a fence, the
/// trailing run of hashtags is collected and cut from the text.
pub fn classify_line(fences: &mut FenceStack, raw_line: &str) -> Classified {
    if FenceStack::is_fence(raw_line) {
        fences.toggle(raw_line);
        return Classified {
            text: raw_line.to_string(),
            hashtags: vec![],
            is_fenced: fences.is_open(),
        };
    }

    if fences.is_open() {
        return Classified {
            text: raw_line.to_string(),
            hashtags: vec![],
            is_fenced: true,
        };
    }

    let (text, hashtags) = extract_hashtags(raw_line);
    Classified {
        text,
        hashtags,
        is_fenced: false,
    }
}

/// Splits the trailing hashtag run off a line. Hashtags elsewhere in the line
/// are left as written.
pub fn extract_hashtags(line: &str) -> (String, Vec<Hashtag>) {
    lazy_static! {
        static ref HASHTAG_REGEX: Regex = Regex::new(r"#[a-zA-Z0-9-]+").unwrap();
        static ref HASHTAG_SET_REGEX: Regex = Regex::new(r"(#[a-zA-Z0-9-]+\s*)+$").unwrap();
    }

    let Some(run) = HASHTAG_SET_REGEX.find(line) else {
        return (line.to_string(), vec![]);
    };

    let hashtags = HASHTAG_REGEX
        .find_iter(run.as_str())
        .map(|m| Hashtag::new(m.as_str()))
        .collect();

    (line[..run.start()].to_string(), hashtags)
}
