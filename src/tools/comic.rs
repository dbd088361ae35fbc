use crate::xkcd::comic::loose_int;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ShowComicParams {
    /// The user's request - can be a URL, comic number, or natural language
    /// (e.g., 'https://xkcd.com/327/', 'show comic 2000', '#327', 'show me latest')
    pub user_query: String,

    /// Specific XKCD comic number to fetch (optional)
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "loose_comic_number")]
    pub comic_number: Option<u32>,

    /// Optional parameters
    #[serde(default)]
    pub options: serde_json::Map<String, serde_json::Value>,
}

/// Accepts `10` as well as `"10"`, the way hosts sometimes stringify numbers.
fn loose_comic_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    #[derive(Deserialize)]
    struct Loose(#[serde(deserialize_with = "loose_int")] i64);

    match Option::<Loose>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Loose(n)) => u32::try_from(n)
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("comicNumber must be a positive integer, got {n}"))),
    }
}

impl ShowComicParams {
    pub fn from_arguments(arguments: Option<serde_json::Map<String, serde_json::Value>>) -> Result<Self, String> {
        let args = serde_json::Value::Object(arguments.unwrap_or_default());
        let params: Self = serde_json::from_value(args).map_err(|e| e.to_string())?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.comic_number == Some(0) {
            return Err("comicNumber must be a positive integer".into());
        }
        Ok(())
    }
}

pub fn input_schema() -> serde_json::Map<String, serde_json::Value> {
    match serde_json::to_value(schemars::schema_for!(ShowComicParams)) {
        Ok(serde_json::Value::Object(map)) => map,
        _ => serde_json::Map::new(),
    }
}
