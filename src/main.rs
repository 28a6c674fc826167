use std::path::PathBuf;

use anyhow::bail;
use blogpress::{config::BuildConfig, generator::generate};
use clap::{command, Arg};
use log::info;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let matches = command!()
        .args([
            Arg::new("posts_dir")
                .help("Directory of markdown posts")
                .value_parser(clap::value_parser!(PathBuf))
                .default_value("posts"),
            Arg::new("out_dir")
                .help("Directory of output. Existing files are overwritten, others are kept.")
                .value_parser(clap::value_parser!(PathBuf))
                .default_value("build"),
        ])
        .get_matches();

    let defaults = BuildConfig::default();
    let config = BuildConfig {
        posts_dir: matches
            .get_one::<PathBuf>("posts_dir")
            .cloned()
            .unwrap_or(defaults.posts_dir),
        out_dir: matches
            .get_one::<PathBuf>("out_dir")
            .cloned()
            .unwrap_or(defaults.out_dir),
    };
    if !config.posts_dir.is_dir() {
        bail!("posts_dir must be a directory.");
    }
    if config.out_dir.exists() && !config.out_dir.is_dir() {
        bail!("if out_dir exists, it must be directory.");
    }

    info!("Building posts from {:?}...", config.posts_dir);
    let metas = generate(&config)?;
    info!("Done! {} posts written to {:?}", metas.len(), config.out_dir);

    Ok(())
}
