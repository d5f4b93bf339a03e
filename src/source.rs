use std::fmt;
use std::path::PathBuf;

use url::Url;

use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::parser;

pub const BUNDLED_CARDS: &str = include_str!("../assets/cards.csv");

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(Url),
    Bundled,
}

impl DataSource {
    pub fn from_arg(arg: &str) -> Self {
        match Url::parse(arg) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Self::Url(url),
            _ => Self::File(PathBuf::from(arg)),
        }
    }

    pub async fn read(&self) -> Result<String> {
        match self {
            Self::File(path) => Ok(tokio::fs::read_to_string(path).await?),
            Self::Url(url) => {
                let response = reqwest::get(url.clone()).await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(Error::HttpStatus {
                        url: url.to_string(),
                        status: status.as_u16(),
                    });
                }
                Ok(response.text().await?)
            }
            Self::Bundled => Ok(BUNDLED_CARDS.to_string()),
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{url}"),
            Self::Bundled => write!(f, "bundled cards"),
        }
    }
}

// Failures are logged and produce an empty dataset; nothing is retried.
pub async fn load_dataset(source: &DataSource) -> Dataset {
    match source.read().await {
        Ok(raw) => {
            let dataset = parser::parse(&raw);
            tracing::info!(%source, cards = dataset.len(), "loaded prompts");
            dataset
        }
        Err(e) => {
            tracing::error!(%source, error = %e, "could not load prompts");
            Dataset::empty()
        }
    }
}
