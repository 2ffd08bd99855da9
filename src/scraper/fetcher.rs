use crate::model::{ScrapeRequest, ScraperError};
use crate::scraper::traits::Scraper;
use reqwest::Client;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

pub struct ScraperImpl {
    client: Client,
    base_url: String,
}

impl ScraperImpl {
    pub fn new(base_url: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ScraperError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    fn build_url(&self, req: &ScrapeRequest) -> String {
        format!("{}?page={}", self.base_url, req.page)
    }
}

#[async_trait::async_trait]
impl Scraper for ScraperImpl {
    async fn fetch(&self, req: &ScrapeRequest) -> Result<String, ScraperError> {
        let url = self.build_url(req);

        let response = self
            .client
            .get(&url)
            .header("Accept-Language", "zh-TW,zh;q=0.9")
            .send()
            .await
            .map_err(|e| ScraperError::HttpError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ScraperError::InvalidResponse(response.status().as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| ScraperError::HttpError(e.to_string()))
    }
}
