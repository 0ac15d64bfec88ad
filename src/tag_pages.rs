use std::fmt::Write;
use std::rc::Rc;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::content::hashtag::Hashtag;
use crate::content::shortcode::hashtag_token;
use crate::excerpt::{Excerpt, HashtagIndex};
use crate::text_utils::{format_date_time, NEWLINE};

/// Renders the page linking every hashtag, with its excerpt count, in
/// ascending order. A stub, when given, is placed above the generated block.
pub fn render_index(index: &HashtagIndex, stub: Option<&str>, css_class: &str) -> String {
    let tokens: Vec<String> = index
        .iter()
        .map(|(hashtag, excerpts)| {
            let label = format!("#{} ({})", hashtag, excerpts.len());
            hashtag_token(hashtag.as_str(), Some(&label))
        })
        .collect();

    let mut buf = String::new();
    if let Some(stub) = stub {
        buf.push_str(stub.trim_end_matches(['\r', '\n']));
        buf.push_str(NEWLINE);
        buf.push_str(NEWLINE);
    }
    let _ = write!(&mut buf, "<div class=\"{}\">{}", css_class, NEWLINE);
    let _ = write!(&mut buf, "{}{}", tokens.join("<br>"), NEWLINE);
    let _ = write!(&mut buf, "</div>{}", NEWLINE);
    buf
}

/// Renders the compilation page of one hashtag.
///
/// Without a stub, a header is synthesized whose `date` and `lastmod` are
/// `offset` seconds past the epoch and past midnight of `today`. Returns the
/// page and the offset for the next synthesized header, so pages generated in
/// one pass never share a timestamp.
pub fn render_tag_page(hashtag: &Hashtag, excerpts: &[Rc<Excerpt>], stub: Option<&str>,
                       today: NaiveDate, offset: u32) -> (String, u32) {
    let mut buf = String::new();
    let next_offset = match stub {
        Some(stub) => {
            buf.push_str(stub);
            buf.push_str(NEWLINE);
            offset
        }
        None => {
            buf.push_str(&render_header(hashtag, today, offset));
            offset + 1
        }
    };

    let mut sorted: Vec<&Rc<Excerpt>> = excerpts.iter().collect();
    sorted.sort_by_cached_key(|excerpt| excerpt.sort_key());

    for excerpt in sorted {
        let _ = write!(&mut buf, "* [\\[Source\\]]({}) {}{}", excerpt.address, excerpt.text, NEWLINE);
    }

    (buf, next_offset)
}

fn render_header(hashtag: &Hashtag, today: NaiveDate, offset: u32) -> String {
    let seconds = Duration::seconds(offset as i64);
    // NaiveDateTime::default() is 1970-01-01 00:00:00
    let fake = NaiveDateTime::default() + seconds;
    let lastmod = today.and_time(NaiveTime::default()) + seconds;

    let mut buf = String::new();
    let _ = writeln!(&mut buf, "---");
    let _ = writeln!(&mut buf, "title: '#{}'", hashtag);
    let _ = writeln!(&mut buf, "description: Compilation page of all hashtags");
    let _ = writeln!(&mut buf, "date: {}", format_date_time(&fake));
    let _ = writeln!(&mut buf, "lastmod: {}", format_date_time(&lastmod));
    let _ = writeln!(&mut buf, "---");
    buf.push_str(NEWLINE);
    buf.push_str(NEWLINE);
    buf
}
