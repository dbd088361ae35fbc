use super::comic::{mime_for_url, Comic, ComicImage, ComicInfo};
use crate::error::{ComicError, Result};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct XkcdClient {
    client: reqwest::Client,
    base_url: String,
}

impl XkcdClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(concat!("xkcd-widget-mcp/", env!("CARGO_PKG_VERSION"))));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn comic_url(&self, comic_number: Option<u32>) -> String {
        match comic_number {
            Some(n) => format!("{}/{}/info.0.json", self.base_url, n),
            None => format!("{}/info.0.json", self.base_url),
        }
    }

    /// Fetches comic metadata, then tries to inline the image.
    ///
    /// Only the metadata request can fail the call. An image that cannot be
    /// downloaded leaves the comic pointing at its remote URL.
    pub async fn fetch(&self, comic_number: Option<u32>) -> Result<Comic> {
        let url = self.comic_url(comic_number);
        debug!("Fetching comic metadata from {}", url);

        let body = self.get_bytes(&url).await?;
        let info: ComicInfo = serde_json::from_slice(&body)?;

        let image = if info.img.is_empty() {
            ComicImage::remote("")
        } else {
            match self.get_bytes(&info.img).await {
                Ok(bytes) => {
                    let data_uri = format!(
                        "data:{};base64,{}",
                        mime_for_url(&info.img),
                        BASE64_STANDARD.encode(&bytes)
                    );
                    ComicImage::inlined(info.img.clone(), data_uri)
                }
                Err(e) => {
                    warn!("Image fetch failed for comic #{}, using remote URL: {}", info.num, e);
                    ComicImage::remote(info.img.clone())
                }
            }
        };

        Ok(Comic::from_info(info, image))
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let resp = self.client.get(url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ComicError::Api { status: status.as_u16(), url: url.to_string() });
        }

        Ok(resp.bytes().await?.to_vec())
    }
}
