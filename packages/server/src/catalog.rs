//! Client for the third-party problem catalog (LeetCode).
//!
//! Metadata for every free problem comes from one bulk listing. Statements,
//! starter code and topic tags are fetched per problem through GraphQL when
//! a problem is first opened.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, ORIGIN, USER_AGENT};
use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{info, instrument};

use crate::config::CatalogConfig;

const LIST_TIMEOUT: Duration = Duration::from_secs(20);
const DETAIL_TIMEOUT: Duration = Duration::from_secs(10);
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const CATALOG_ORIGIN: &str = "https://leetcode.com";

const QUESTION_DETAIL_QUERY: &str = r#"
query getQuestionDetail($titleSlug: String!) {
  question(titleSlug: $titleSlug) {
    content
    codeSnippets {
      lang
      code
    }
    topicTags {
      name
    }
  }
}
"#;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    Network(String),
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("GraphQL errors: {0}")]
    GraphQl(String),
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => CatalogError::Status(status.as_u16()),
            None if err.is_decode() => CatalogError::Decode(err.to_string()),
            None => CatalogError::Network(err.to_string()),
        }
    }
}

/// Metadata of one free problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub slug: String,
    pub title: String,
    pub difficulty: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CodeSnippet {
    pub lang: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TopicTag {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDetail {
    pub content: Option<String>,
    #[serde(default)]
    pub code_snippets: Vec<CodeSnippet>,
    #[serde(default)]
    pub topic_tags: Vec<TopicTag>,
}

impl ProblemDetail {
    /// First `Python` or `Python3` starter snippet.
    pub fn python_snippet(&self) -> Option<&str> {
        self.code_snippets
            .iter()
            .find(|s| s.lang == "Python" || s.lang == "Python3")
            .map(|s| s.code.as_str())
    }

    pub fn topic_tag_names(&self) -> Vec<String> {
        self.topic_tags.iter().map(|t| t.name.clone()).collect()
    }
}

#[async_trait]
pub trait ProblemCatalog: Send + Sync {
    /// Every problem that is not behind a paywall.
    async fn list_free_problems(&self) -> Result<Vec<CatalogEntry>, CatalogError>;

    /// Statement details, or `None` if the catalog has no such question.
    async fn problem_detail(&self, slug: &str) -> Result<Option<ProblemDetail>, CatalogError>;
}

pub fn difficulty_label(level: i64) -> &'static str {
    match level {
        1 => "Easy",
        2 => "Medium",
        3 => "Hard",
        _ => "Unknown",
    }
}

#[derive(Deserialize)]
struct ProblemList {
    #[serde(default)]
    stat_status_pairs: Vec<StatStatusPair>,
}

#[derive(Deserialize)]
struct StatStatusPair {
    stat: Stat,
    difficulty: Difficulty,
    #[serde(default)]
    paid_only: bool,
}

#[derive(Deserialize)]
struct Stat {
    #[serde(rename = "question__title_slug")]
    title_slug: String,
    #[serde(rename = "question__title")]
    title: String,
}

#[derive(Deserialize)]
struct Difficulty {
    level: i64,
}

pub fn parse_problem_list(body: &str) -> Result<Vec<CatalogEntry>, CatalogError> {
    let list: ProblemList =
        serde_json::from_str(body).map_err(|e| CatalogError::Decode(e.to_string()))?;

    Ok(list
        .stat_status_pairs
        .into_iter()
        .filter(|pair| !pair.paid_only)
        .map(|pair| CatalogEntry {
            slug: pair.stat.title_slug,
            title: pair.stat.title,
            difficulty: difficulty_label(pair.difficulty.level).to_string(),
        })
        .collect())
}

#[derive(Deserialize)]
struct GraphQlResponse {
    data: Option<QuestionData>,
    errors: Option<Value>,
}

#[derive(Deserialize)]
struct QuestionData {
    question: Option<ProblemDetail>,
}

pub fn parse_question_detail(body: &str) -> Result<Option<ProblemDetail>, CatalogError> {
    let response: GraphQlResponse =
        serde_json::from_str(body).map_err(|e| CatalogError::Decode(e.to_string()))?;

    match response.errors {
        Some(errors) if !errors.is_null() && errors != json!([]) => {
            Err(CatalogError::GraphQl(errors.to_string()))
        }
        _ => Ok(response.data.and_then(|d| d.question)),
    }
}

pub struct LeetCodeCatalog {
    client: reqwest::Client,
    list_url: String,
    graphql_url: String,
}

impl LeetCodeCatalog {
    pub fn new(config: &CatalogConfig) -> reqwest::Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder().build()?,
            list_url: config.list_url.clone(),
            graphql_url: config.graphql_url.clone(),
        })
    }
}

#[async_trait]
impl ProblemCatalog for LeetCodeCatalog {
    #[instrument(skip(self))]
    async fn list_free_problems(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        let body = self
            .client
            .get(&self.list_url)
            .timeout(LIST_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let entries = parse_problem_list(&body)?;
        info!(count = entries.len(), "Fetched free problem list");
        Ok(entries)
    }

    #[instrument(skip(self))]
    async fn problem_detail(&self, slug: &str) -> Result<Option<ProblemDetail>, CatalogError> {
        let payload = json!({
            "operationName": "getQuestionDetail",
            "query": QUESTION_DETAIL_QUERY,
            "variables": { "titleSlug": slug },
        });

        let body = self
            .client
            .post(&self.graphql_url)
            .timeout(DETAIL_TIMEOUT)
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .header(ORIGIN, CATALOG_ORIGIN)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_question_detail(&body)
    }
}
