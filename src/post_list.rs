use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

const POST_EXTENSION: &str = "md";

pub struct PostList {
    pub root_dir: PathBuf,
}

impl PostList {
    pub fn new(root_dir: &Path) -> Self {
        PostList { root_dir: root_dir.to_path_buf() }
    }

    /// Every `.md` file under the root, at any depth.
    pub fn retrieve_posts(&self) -> io::Result<Vec<PathBuf>> {
        self.retrieve_files(is_post)
    }

    /// Every other file under the root, published as-is.
    pub fn retrieve_assets(&self) -> io::Result<Vec<PathBuf>> {
        self.retrieve_files(|path| !is_post(path))
    }

    /// Path of `path` relative to the root directory
    pub fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root_dir).unwrap_or(path)
    }

    fn retrieve_files<F>(&self, filter: F) -> io::Result<Vec<PathBuf>>
    where
        F: Fn(&Path) -> bool,
    {
        let mut files = vec![];
        for entry in WalkDir::new(&self.root_dir).sort_by_file_name() {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            if filter(entry.path()) {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}

fn is_post(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == POST_EXTENSION)
}
