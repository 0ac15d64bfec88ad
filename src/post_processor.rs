use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::{fmt, fs};

use spdlog::{debug, info, warn};

use crate::config::Settings;
use crate::content::post::Post;
use crate::error::{MarkoutError, Result};
use crate::excerpt::{index_post, HashtagIndex};
use crate::post_list::PostList;
use crate::tag_pages::{render_index, render_tag_page};

#[derive(Debug, Default, PartialEq)]
pub struct RunSummary {
    pub processed: usize,
    pub skipped_drafts: usize,
    pub skipped_future: usize,
    pub excerpts: usize,
    pub hashtags: usize,
    pub pages: usize,
}

impl Display for RunSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "posts={}, drafts={}, future={}, excerpts={}, hashtags={}, pages={}",
               self.processed,
               self.skipped_drafts,
               self.skipped_future,
               self.excerpts,
               self.hashtags,
               self.pages
        )
    }
}

/// Runs the whole pipeline: rewrites every published post with shortcodes,
/// then writes the hashtag index and one compilation page per hashtag.
/// Every post is parsed before anything is written, and the first error stops
/// the run.
pub fn process_posts(settings: &Settings) -> Result<RunSummary> {
    let post_list = PostList::new(&settings.input_dir);
    let mut summary = RunSummary::default();

    let mut paths = post_list.retrieve_posts()
        .map_err(|e| MarkoutError::Io(settings.input_dir.clone(), e))?;

    let in_place = settings.in_place();
    if !in_place {
        // An output directory nested in the input holds last run's results
        if let Some(nested) = locate_output(settings)? {
            paths.retain(|path| !post_list.relative(path).starts_with(&nested));
        }
    }

    let mut posts = vec![];
    for path in paths {
        let post = Post::read(&path, &settings.now)?;

        if post.frontmatter.is_future {
            warn!("Skipping future post '{}'...", path.display());
            summary.skipped_future += 1;
            continue;
        }
        if post.frontmatter.is_draft {
            warn!("Skipping draft '{}'...", path.display());
            summary.skipped_drafts += 1;
            continue;
        }
        posts.push(post);
    }

    if !in_place {
        prepare_output(settings, &post_list)?;
    }

    let mut index = HashtagIndex::new();
    for mut post in posts {
        post.apply_shortcodes();
        let relative = post_list.relative(&post.path);

        let dest_path = settings.output_dir.join(relative);
        write_file(&dest_path, &post.to_text(), settings.dry_run)?;
        info!("Shortcodes processed to '{}' ({} hashtags)", dest_path.display(), post.hashtag_count());

        summary.excerpts += index_post(&post, relative, &mut index);
        summary.processed += 1;
    }

    summary.pages += generate_index(settings, &index)?;
    summary.pages += generate_tag_pages(settings, &index)?;
    summary.hashtags = index.len();

    Ok(summary)
}

/// Refuses an output root that holds the input, since clearing it would
/// delete the input tree. Returns the output's path relative to the input
/// root when it is nested inside it.
fn locate_output(settings: &Settings) -> Result<Option<PathBuf>> {
    let input = fs::canonicalize(&settings.input_dir)
        .map_err(|e| MarkoutError::Io(settings.input_dir.clone(), e))?;
    // A missing output cannot hold the input or any of its posts
    let Ok(output) = fs::canonicalize(&settings.output_dir) else {
        return Ok(None);
    };

    if input.starts_with(&output) {
        return Err(MarkoutError::OutputContainsInput(settings.output_dir.clone(), settings.input_dir.clone()));
    }
    Ok(output.strip_prefix(&input).ok().map(Path::to_path_buf))
}

/// Clears the output directory and publishes every non-post file into it.
fn prepare_output(settings: &Settings, post_list: &PostList) -> Result<()> {
    let output_dir = &settings.output_dir;
    if output_dir.exists() {
        if settings.dry_run {
            info!("[dry-run] Would delete '{}'", output_dir.display());
        } else {
            fs::remove_dir_all(output_dir).map_err(|e| MarkoutError::Io(output_dir.clone(), e))?;
            debug!("Deleted '{}'", output_dir.display());
        }
    }

    let assets = post_list.retrieve_assets()
        .map_err(|e| MarkoutError::Io(settings.input_dir.clone(), e))?;
    for asset in assets {
        let dest_path = output_dir.join(post_list.relative(&asset));
        if settings.dry_run {
            info!("[dry-run] Would copy '{}' to '{}'", asset.display(), dest_path.display());
            continue;
        }
        create_parent(&dest_path)?;
        fs::copy(&asset, &dest_path).map_err(|e| MarkoutError::Io(asset.clone(), e))?;
        debug!("Copied '{}' to '{}'", asset.display(), dest_path.display());
    }

    Ok(())
}

fn generate_index(settings: &Settings, index: &HashtagIndex) -> Result<usize> {
    let layout = &settings.layout;
    let stub = read_stub(&layout.index_path(&settings.input_dir))?;
    let content = render_index(index, stub.as_deref(), &layout.index_class);

    let dest_path = layout.index_path(&settings.output_dir);
    write_file(&dest_path, &content, settings.dry_run)?;
    info!("Created hashtags page '{}'", dest_path.display());
    Ok(1)
}

fn generate_tag_pages(settings: &Settings, index: &HashtagIndex) -> Result<usize> {
    let layout = &settings.layout;
    let today = settings.today();
    let mut offset = 0;
    let mut pages = 0;

    for (hashtag, excerpts) in index.iter().rev() {
        let stub = read_stub(&layout.tag_path(&settings.input_dir, hashtag.as_str()))?;
        let (content, next_offset) = render_tag_page(hashtag, excerpts, stub.as_deref(), today, offset);
        offset = next_offset;

        let dest_path = layout.tag_path(&settings.output_dir, hashtag.as_str());
        write_file(&dest_path, &content, settings.dry_run)?;
        info!("Created tag page '{}'", dest_path.display());
        pages += 1;
    }

    Ok(pages)
}

fn read_stub(path: &Path) -> Result<Option<String>> {
    if !path.is_file() {
        return Ok(None);
    }
    debug!("Using stub '{}'", path.display());
    fs::read_to_string(path)
        .map(Some)
        .map_err(|e| MarkoutError::Io(path.to_path_buf(), e))
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| MarkoutError::Io(parent.to_path_buf(), e))?;
    }
    Ok(())
}

fn write_file(path: &Path, content: &str, dry_run: bool) -> Result<()> {
    if dry_run {
        info!("[dry-run] Would write '{}' ({} bytes)", path.display(), content.len());
        return Ok(());
    }
    create_parent(path)?;
    fs::write(path, content).map_err(|e| MarkoutError::Io(path.to_path_buf(), e))
}
