use std::path::PathBuf;

pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub posts_dir: PathBuf,
    pub out_dir: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            posts_dir: PathBuf::from("posts"),
            out_dir: PathBuf::from("build"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: String,
    pub build_dir: PathBuf,
    pub public_dir: PathBuf,
}

impl ServerConfig {
    /// `PORT` binds every interface on that port, otherwise [`DEFAULT_ADDR`].
    pub fn from_env() -> Self {
        Self::with_port(std::env::var("PORT").ok().as_deref())
    }

    pub fn with_port(port: Option<&str>) -> Self {
        let addr = match port.map(str::trim) {
            Some(port) if !port.is_empty() => format!("0.0.0.0:{port}"),
            _ => DEFAULT_ADDR.to_string(),
        };
        Self {
            addr,
            build_dir: PathBuf::from("build"),
            public_dir: PathBuf::from("public"),
        }
    }
}
