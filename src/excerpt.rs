use std::collections::{BTreeMap, HashMap};
use std::path::{Component, Path};
use std::rc::Rc;

use lazy_static::lazy_static;
use regex::Regex;
use spdlog::debug;

use crate::content::hashtag::Hashtag;
use crate::content::post::Post;
use crate::content::shortcode::hashtag_token;

/// One hashtagged line, as it appears on a compilation page.
#[derive(Debug, Clone, PartialEq)]
pub struct Excerpt {
    pub address: String,
    pub text: String,
}

impl Excerpt {
    /// Display text with everything but word characters dropped, so
    /// punctuation does not affect page ordering.
    pub fn sort_key(&self) -> String {
        lazy_static! {
            static ref NON_WORD_REGEX: Regex = Regex::new(r"\W").unwrap();
        }
        NON_WORD_REGEX.replace_all(&self.text, "").to_string()
    }
}

/// Excerpts collected for every hashtag over a whole run, ordered by hashtag.
/// An excerpt carrying several hashtags is shared between their lists.
#[derive(Debug, Default)]
pub struct HashtagIndex {
    excerpts: BTreeMap<Hashtag, Vec<Rc<Excerpt>>>,
}

impl HashtagIndex {
    pub fn new() -> Self {
        HashtagIndex { excerpts: BTreeMap::new() }
    }

    pub fn add(&mut self, hashtag: Hashtag, excerpt: Rc<Excerpt>) {
        self.excerpts.entry(hashtag).or_default().push(excerpt);
    }

    pub fn get(&self, hashtag: &Hashtag) -> Option<&[Rc<Excerpt>]> {
        self.excerpts.get(hashtag).map(|v| v.as_slice())
    }

    /// Hashtags in ascending order with their excerpts
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&Hashtag, &Vec<Rc<Excerpt>>)> {
        self.excerpts.iter()
    }

    pub fn len(&self) -> usize {
        self.excerpts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.excerpts.is_empty()
    }
}

/// Tracks the heading an excerpt should link to. Repeated headings get the
/// `-1`, `-2`, ... suffixes markdown renderers give duplicate anchors.
#[derive(Default)]
struct HeadingTracker {
    seen: HashMap<String, usize>,
    current: Option<String>,
}

impl HeadingTracker {
    fn visit(&mut self, heading: &str) {
        let base = heading.to_lowercase().replace(' ', "-");
        let count = self.seen.entry(base.clone()).or_insert(0);
        *count += 1;
        let anchor = match *count {
            1 => base,
            n => format!("{}-{}", base, n - 1),
        };
        self.current = Some(anchor);
    }

    fn address(&self, post_address: &str) -> String {
        match self.current {
            Some(ref heading) => format!("{}#{}", post_address, heading),
            None => post_address.to_string(),
        }
    }
}

/// Site address of a post: its path relative to the content root, without
/// extension, always `/` separated.
pub fn post_address(relative_path: &Path) -> String {
    let without_ext = relative_path.with_extension("");
    let parts: Vec<String> = without_ext
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().to_string()),
            _ => None,
        })
        .collect();
    format!("/{}", parts.join("/"))
}

pub fn excerpt_text(line_text: &str, hashtags: &[Hashtag]) -> String {
    lazy_static! {
        static ref LIST_PREFIX_REGEX: Regex = Regex::new(r"^(>|\s|\*|(\d+\.))+").unwrap();
    }

    let mut text = LIST_PREFIX_REGEX.replace(line_text, "").to_string();
    for hashtag in hashtags {
        text.push(' ');
        text.push_str(&hashtag_token(hashtag.as_str(), None));
    }
    text
}

/// Adds an excerpt to `index` for every hashtag of every unfenced line of `post`.
/// Returns the number of excerpts created.
pub fn index_post(post: &Post, relative_path: &Path, index: &mut HashtagIndex) -> usize {
    lazy_static! {
        static ref HEADING_REGEX: Regex = Regex::new(r"^#+\s+(?P<value>.+)").unwrap();
    }

    let base_address = post_address(relative_path);
    let mut headings = HeadingTracker::default();
    let mut created = 0;

    for line in post.content.iter().filter(|line| !line.is_fenced) {
        if let Some(heading) = HEADING_REGEX.captures(&line.text).and_then(|cap| cap.name("value")) {
            headings.visit(heading.as_str());
        }

        if line.hashtags.is_empty() {
            continue;
        }

        let excerpt = Rc::new(Excerpt {
            address: headings.address(&base_address),
            text: excerpt_text(&line.text, &line.hashtags),
        });
        debug!("Excerpt {} for {:?}", excerpt.address, line.hashtags);

        for hashtag in line.hashtags.iter() {
            index.add(hashtag.clone(), Rc::clone(&excerpt));
        }
        created += 1;
    }

    created
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use chrono::{FixedOffset, TimeZone};

    use crate::test_data::POST_DATA;

    use super::*;

    fn parse(content: &str) -> Post {
        let now = FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        Post::from_string(&PathBuf::from("posts/notes.md"), content, &now).unwrap()
    }

    fn excerpts<'a>(index: &'a HashtagIndex, name: &str) -> &'a [Rc<Excerpt>] {
        index.get(&Hashtag::new(name)).unwrap()
    }

    #[test]
    fn test_post_address() {
        assert_eq!(post_address(Path::new("a.md")), "/a");
        assert_eq!(post_address(Path::new("notes/2024/b.md")), "/notes/2024/b");
        assert_eq!(post_address(Path::new("./c.md")), "/c");
    }

    #[test]
    fn test_excerpt_text() {
        let tags = vec![Hashtag::new("foo"), Hashtag::new("bar")];
        assert_eq!(
            excerpt_text("> * 12. quoted item ", &tags),
            "quoted item  {{% hashtag %}}#foo{{% /hashtag %}} {{% hashtag %}}#bar{{% /hashtag %}}"
        );
        assert_eq!(excerpt_text("plain", &[]), "plain");
    }

    #[test]
    fn test_index_post() {
        let post = parse(POST_DATA);
        let mut index = HashtagIndex::new();
        let created = index_post(&post, Path::new("notes.md"), &mut index);

        assert_eq!(created, 4);
        assert_eq!(index.len(), 3);

        let rust = excerpts(&index, "rust");
        assert_eq!(rust.len(), 3);
        assert_eq!(rust[0].address, "/notes#notes-on-tooling");
        assert_eq!(rust[1].address, "/notes#formatting");
        assert!(rust[1].text.starts_with("rustfmt settles the argument "));
        assert_eq!(rust[2].address, "/notes#formatting-1");
        assert!(rust[2].text.starts_with("Clippy catches the rest "));

        let tips = excerpts(&index, "tips");
        assert_eq!(tips[0].text, "Run it before every commit  {{% hashtag %}}#tips{{% /hashtag %}}");

        // Fenced "#rust" and math "#y" are not indexed
        assert!(index.get(&Hashtag::new("y")).is_none());
    }

    #[test]
    fn test_excerpt_is_shared() {
        let post = parse("Some note #foo #bar");
        let mut index = HashtagIndex::new();
        index_post(&post, Path::new("a.md"), &mut index);

        let foo = excerpts(&index, "foo");
        let bar = excerpts(&index, "bar");
        assert_eq!(foo.len(), 1);
        assert_eq!(bar.len(), 1);
        assert_eq!(foo[0].address, "/a");
        assert!(Rc::ptr_eq(&foo[0], &bar[0]));
    }

    #[test]
    fn test_duplicate_headings() {
        let post = parse("# H\nx #t\n# H\ny #t\n# H\nz #t\n");
        let mut index = HashtagIndex::new();
        index_post(&post, Path::new("doc.md"), &mut index);

        let addresses: Vec<&str> = excerpts(&index, "t").iter().map(|e| e.address.as_str()).collect();
        assert_eq!(addresses, ["/doc#h", "/doc#h-1", "/doc#h-2"]);
    }

    #[test]
    fn test_heading_inside_fence_is_ignored() {
        let post = parse("# Real\n```\n# Fake\n```\nafter #t\n");
        let mut index = HashtagIndex::new();
        index_post(&post, Path::new("doc.md"), &mut index);
        assert_eq!(excerpts(&index, "t")[0].address, "/doc#real");
    }

    #[test]
    fn test_sort_key_ignores_punctuation() {
        let a = Excerpt { address: "/a".to_string(), text: "Hello, world!".to_string() };
        let b = Excerpt { address: "/b".to_string(), text: "Hello world".to_string() };
        assert_eq!(a.sort_key(), b.sort_key());
        assert_eq!(a.sort_key(), "Helloworld");
    }
}
