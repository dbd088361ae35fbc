use crate::error::{ComicError, Result};
use std::net::SocketAddr;

pub const DEFAULT_API_URL: &str = "https://xkcd.com";
const DEFAULT_HTTP_HOST: &str = "0.0.0.0";
const DEFAULT_HTTP_PORT: u16 = 8000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Stdio,
    Http,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub transport: Transport,
    pub http_host: String,
    pub http_port: u16,
    pub log_level: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        let api_url = env_opt("XKCD_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into());
        validate_url(&api_url)?;

        let transport = match env_opt("XKCD_TRANSPORT").map(|s| s.trim().to_lowercase()).as_deref() {
            None | Some("stdio") => Transport::Stdio,
            Some("http") => Transport::Http,
            Some(other) => {
                return Err(ComicError::ConfigInvalid(format!(
                    "XKCD_TRANSPORT must be 'stdio' or 'http', got '{other}'"
                )));
            }
        };

        Ok(Self {
            api_url: api_url.trim().trim_end_matches('/').to_string(),
            transport,
            http_host: env_opt("XKCD_HTTP_HOST").unwrap_or_else(|| DEFAULT_HTTP_HOST.into()),
            http_port: env_u16_range("XKCD_HTTP_PORT", DEFAULT_HTTP_PORT, 1, u16::MAX)?,
            log_level: env_opt("XKCD_LOG_LEVEL").unwrap_or_else(|| "info".into()).to_lowercase(),
        })
    }

    pub fn http_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.http_host.trim(), self.http_port)
            .parse()
            .map_err(|_| {
                ComicError::ConfigInvalid(format!(
                    "XKCD_HTTP_HOST '{}' is not a valid IP address",
                    self.http_host
                ))
            })
    }
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.trim().is_empty())
}

fn env_u16_range(name: &str, default: u16, min: u16, max: u16) -> Result<u16> {
    let Some(raw) = env_opt(name) else { return Ok(default) };
    let val: u16 = raw.trim().parse().map_err(|_| {
        ComicError::ConfigInvalid(format!("{name} must be an integer between {min} and {max}"))
    })?;
    if !(min..=max).contains(&val) {
        return Err(ComicError::ConfigInvalid(format!("{name} must be an integer between {min} and {max}")));
    }
    Ok(val)
}

fn validate_url(url: &str) -> Result<()> {
    let url = url.trim();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ComicError::ConfigInvalid("XKCD_API_URL must be a valid http or https URL".into()));
    }
    Ok(())
}
