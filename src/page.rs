use serde::Serialize;

use crate::metadata::{Meta, Post};

/// Template context for one request.
#[derive(Serialize, Debug, Default)]
pub struct Page {
    pub path: String,
    pub post: Option<Post>,
    pub metas: Option<Vec<Meta>>,
}

impl Page {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            ..Default::default()
        }
    }

    pub fn with_post(mut self, post: Post) -> Self {
        self.post = Some(post);
        self
    }

    pub fn with_metas(mut self, metas: Vec<Meta>) -> Self {
        self.metas = Some(metas);
        self
    }

    pub fn is_active(&self, href: &str) -> bool {
        is_active(&self.path, href)
    }
}

/// Whether a navigation link to `href` points at `current`. The root only matches itself.
pub fn is_active(current: &str, href: &str) -> bool {
    if href == "/" {
        return current == href;
    }
    current.starts_with(href)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_is_exact() {
        assert!(Page::new("/").is_active("/"));
        assert!(!Page::new("/blog").is_active("/"));
        assert!(!Page::new("/anything").is_active("/"));
    }

    #[test]
    fn sections_match_by_prefix() {
        for path in ["/blog", "/blog/", "/blog/anything"] {
            assert!(Page::new(path).is_active("/blog"), "{path}");
        }
        assert!(!Page::new("/").is_active("/blog"));
    }
}
