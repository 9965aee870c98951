use std::path::{Path, PathBuf};

use tracing::info;

/// Poster storage on local disk, one jpg per movie.
#[derive(Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub async fn init(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    pub fn path(&self, movie_id: i64) -> PathBuf {
        self.dir.join(format!("movie_{}.jpg", movie_id))
    }

    // URL, под которым постер раздается через /static
    pub fn url(movie_id: i64) -> String {
        format!("/static/images/movie_{}.jpg", movie_id)
    }

    pub fn default_url() -> String {
        "/static/images/default.jpg".to_string()
    }

    pub async fn save(&self, movie_id: i64, bytes: &[u8]) -> std::io::Result<String> {
        let path = self.path(movie_id);
        tokio::fs::write(&path, bytes).await?;
        info!("Saved poster for movie {} ({} bytes)", movie_id, bytes.len());
        Ok(Self::url(movie_id))
    }

    pub fn serve_root(&self) -> &Path {
        &self.dir
    }
}
