use serde::{Deserialize, Deserializer};

/// Comic metadata as served by `info.0.json`.
///
/// The upstream API sends `year`, `month` and `day` as strings; they are
/// coerced to integers here so formatting never has to care.
#[derive(Debug, Clone, Deserialize)]
pub struct ComicInfo {
    pub num: u32,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_alt")]
    pub alt: String,
    #[serde(default)]
    pub img: String,
    #[serde(deserialize_with = "loose_int")]
    pub year: i64,
    #[serde(default = "default_date_part", deserialize_with = "loose_int")]
    pub month: i64,
    #[serde(default = "default_date_part", deserialize_with = "loose_int")]
    pub day: i64,
}

fn default_title() -> String { "XKCD Comic".into() }
fn default_alt() -> String { "No alt text available".into() }
fn default_date_part() -> i64 { 1 }

pub(crate) fn loose_int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Int(i64),
        Text(String),
    }

    match Loose::deserialize(deserializer)? {
        Loose::Int(n) => Ok(n),
        Loose::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("expected an integer, got '{s}'"))),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComicImage {
    /// Remote image URL, kept for the "view original" fallback link.
    pub url: String,
    /// `data:<mime>;base64,...` when the bytes could be downloaded.
    pub data_uri: Option<String>,
}

impl ComicImage {
    pub fn remote(url: impl Into<String>) -> Self {
        Self { url: url.into(), data_uri: None }
    }

    pub fn inlined(url: impl Into<String>, data_uri: String) -> Self {
        Self { url: url.into(), data_uri: Some(data_uri) }
    }

    /// What the `<img>` element should load.
    pub fn src(&self) -> &str {
        self.data_uri.as_deref().unwrap_or(&self.url)
    }
}

#[derive(Debug, Clone)]
pub struct Comic {
    pub num: u32,
    pub title: String,
    pub alt: String,
    pub year: i64,
    pub month: i64,
    pub day: i64,
    pub image: ComicImage,
}

impl Comic {
    pub fn from_info(info: ComicInfo, image: ComicImage) -> Self {
        Self {
            num: info.num,
            title: info.title,
            alt: info.alt,
            year: info.year,
            month: info.month,
            day: info.day,
            image,
        }
    }

    pub fn date(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }

    pub fn page_url(&self) -> String {
        format!("https://xkcd.com/{}", self.num)
    }
}

/// MIME type guessed from the image URL's extension; anything unknown is PNG.
pub fn mime_for_url(url: &str) -> &'static str {
    if url.ends_with(".png") {
        "image/png"
    } else if url.ends_with(".jpg") || url.ends_with(".jpeg") {
        "image/jpeg"
    } else if url.ends_with(".gif") {
        "image/gif"
    } else {
        "image/png"
    }
}
