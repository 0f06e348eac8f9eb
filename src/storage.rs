use async_trait::async_trait;
use bytes::Bytes;
use rand::Rng;

/// Where uploaded project images go. Returns the public URL of the stored image.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn put_image(&self, body: Bytes, content_type: &str) -> anyhow::Result<String>;
}

/// Stores nothing and hands back a placeholder image URL of random size.
#[derive(Clone)]
pub struct PlaceholderImages {
    base: String,
}

impl PlaceholderImages {
    pub const TEXT: &'static str = "Project+Image";

    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    fn url(&self, width: u32, height: u32) -> String {
        format!("{}/{}x{}?text={}", self.base, width, height, Self::TEXT)
    }
}

#[async_trait]
impl ImageStore for PlaceholderImages {
    async fn put_image(&self, _body: Bytes, _content_type: &str) -> anyhow::Result<String> {
        let mut rng = rand::thread_rng();
        let width = rng.gen_range(600..800);
        let height = rng.gen_range(400..600);
        Ok(self.url(width, height))
    }
}
