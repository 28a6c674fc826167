use std::path::Path;

use anyhow::Context;
use log::{debug, info};

use crate::{config::BuildConfig, index::save_index, metadata::Meta};

pub mod highlight;
pub mod markdown;

use markdown::render_markdown;

pub const POSTS_DIR: &str = "posts";
pub const INDEX_FILE: &str = "meta.json";

/// Renders one post source into its HTML fragment and metadata.
pub fn build_post(slug: &str, source: &str) -> anyhow::Result<(String, Meta)> {
    let rendered = render_markdown(source)?;
    let front = rendered.front_matter()?;
    let meta = Meta::from_front_matter(slug, front)?;

    Ok((rendered.html, meta))
}

/// Slugs of the post sources, in directory listing order.
fn post_slugs(posts_dir: &Path) -> anyhow::Result<Vec<String>> {
    let mut slugs = vec![];
    let entries =
        std::fs::read_dir(posts_dir).with_context(|| format!("reading {posts_dir:?}"))?;
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() || path.extension().map_or(true, |ext| ext != "md") {
            debug!("skipping {path:?}");
            continue;
        }
        if let Some(stem) = path.file_stem() {
            slugs.push(stem.to_string_lossy().to_string());
        }
    }

    Ok(slugs)
}

/// Builds every post under `posts_dir` into `out_dir`. Stops at the first failing post.
pub fn generate(config: &BuildConfig) -> anyhow::Result<Vec<Meta>> {
    let posts_out = config.out_dir.join(POSTS_DIR);
    // `false`: keep whatever already exists
    fs_extra::dir::create_all(&posts_out, false)
        .with_context(|| format!("creating {posts_out:?}"))?;

    let slugs = post_slugs(&config.posts_dir)?;
    let mut metas = Vec::with_capacity(slugs.len());

    for slug in slugs.iter() {
        info!("{slug}");
        let source_path = config.posts_dir.join(format!("{slug}.md"));
        let source = std::fs::read_to_string(&source_path)
            .with_context(|| format!("reading {source_path:?}"))?;
        let (html, meta) =
            build_post(slug, &source).with_context(|| format!("while building {source_path:?}"))?;

        let out_path = posts_out.join(format!("{slug}.html"));
        std::fs::write(&out_path, html).with_context(|| format!("writing {out_path:?}"))?;
        metas.push(meta);
    }

    info!("writing {} entries to {INDEX_FILE}", metas.len());
    save_index(&config.out_dir.join(INDEX_FILE), &metas)?;

    Ok(metas)
}
