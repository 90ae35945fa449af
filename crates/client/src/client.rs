use crate::{ClientConfig, ClientError, Result};
use async_trait::async_trait;
use lecture_dates_curriculum::{
    sort_descending, CourseInfo, CurriculumItem, CurriculumSource, ItemClass,
};
use log::debug;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;

const ITEM_FIELDS: &str = "title,created,sort_order";
const COURSE_FIELDS: &str = "created,last_update_date";

#[derive(Debug, Deserialize)]
struct ApiPage {
    #[serde(default)]
    next: Option<String>,
    #[serde(default)]
    results: Vec<CurriculumItem>,
}

/// Reads course curricula from the REST API.
#[derive(Debug, Clone)]
pub struct CurriculumClient {
    http: Client,
    config: ClientConfig,
}

impl CurriculumClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { http, config })
    }

    /// Every curriculum item of the course, all pages merged, in visual
    /// order (descending `sort_order`).
    pub async fn fetch_all_items(&self, course_id: u64) -> Result<Vec<CurriculumItem>> {
        let mut query = vec![
            ("page".to_string(), "1".to_string()),
            ("page_size".to_string(), self.config.page_size.to_string()),
        ];
        for class in ItemClass::ALL {
            query.push((format!("fields[{}]", class.as_str()), ITEM_FIELDS.to_string()));
        }

        let mut request = self
            .get(&self.api_url(&format!("courses/{course_id}/subscriber-curriculum-items/")))
            .query(&query);
        let mut items = Vec::new();
        let mut pages = 0usize;

        loop {
            if pages >= self.config.max_pages {
                return Err(ClientError::TooManyPages(self.config.max_pages));
            }
            let page: ApiPage = self.send(request).await?;
            pages += 1;
            items.extend(page.results);

            match page.next.filter(|next| !next.is_empty()) {
                Some(next) => request = self.get(&self.resolve_next(&next)?),
                None => break,
            }
        }

        sort_descending(&mut items);
        debug!(
            "Fetched {} curriculum items for course {course_id} in {pages} page(s)",
            items.len()
        );
        Ok(items)
    }

    pub async fn fetch_course(&self, course_id: u64) -> Result<CourseInfo> {
        let request = self
            .get(&self.api_url(&format!("courses/{course_id}/")))
            .query(&[("fields[course]", COURSE_FIELDS)]);
        self.send(request).await
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api-2.0/{path}", self.config.base_url.trim_end_matches('/'))
    }

    fn resolve_next(&self, next: &str) -> Result<String> {
        if next.starts_with("http://") || next.starts_with("https://") {
            Ok(next.to_string())
        } else if next.starts_with('/') {
            Ok(format!("{}{next}", self.config.base_url.trim_end_matches('/')))
        } else {
            Err(ClientError::InvalidUrl(next.to_string()))
        }
    }

    fn get(&self, url: &str) -> RequestBuilder {
        let request = self.http.get(url);
        match &self.config.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl CurriculumSource for CurriculumClient {
    type Error = ClientError;

    async fn fetch_curriculum_items(&self, course_id: u64) -> Result<Vec<CurriculumItem>> {
        self.fetch_all_items(course_id).await
    }

    async fn fetch_course_info(&self, course_id: u64) -> Result<CourseInfo> {
        self.fetch_course(course_id).await
    }
}
