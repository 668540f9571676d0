use std::sync::LazyLock;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Url;
use scraper::{Html, Selector};
use splice_core::sequence::Sequence;
use splice_formats::genbank;
use tracing::{debug, info};

use crate::{AddgeneError, ADDGENE_ORIGIN};

/// Sequence sections in order of preference: full sequences deposited by
/// Addgene, then full sequences from the depositor.
const SEQUENCE_SECTIONS: [&str; 2] = ["#addgene-full", "#depositor-full"];

static GENBANK_LINK: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a.genbank-file-download").expect("static selector parses")
});

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: ADDGENE_ORIGIN.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: concat!("splice/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Retrieves annotated sequence records by Addgene id.
pub trait SequenceFetcher {
    fn fetch_sequence_record(&self, addgene_id: &str) -> Result<Sequence, AddgeneError>;
}

pub struct AddgeneClient {
    http: Client,
    base_url: Url,
}

impl AddgeneClient {
    pub fn new(config: &ClientConfig) -> Result<Self, AddgeneError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        let base_url = Url::parse(&config.base_url).map_err(|e| AddgeneError::InvalidUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self { http, base_url })
    }

    fn get_text(&self, url: &str) -> Result<String, AddgeneError> {
        debug!(url, "GET");
        let response = self.http.get(url).send()?.error_for_status()?;
        Ok(response.text()?)
    }

    fn resolve(&self, link: &str) -> Result<Url, AddgeneError> {
        self.base_url.join(link).map_err(|e| AddgeneError::InvalidUrl {
            url: link.to_string(),
            reason: e.to_string(),
        })
    }

    pub fn fetch_kit_page(&self, url: &str) -> Result<String, AddgeneError> {
        self.get_text(url)
    }

    pub fn sequence_page_url(&self, addgene_id: &str) -> Result<Url, AddgeneError> {
        self.resolve(&format!("{addgene_id}/sequences/"))
    }
}

impl SequenceFetcher for AddgeneClient {
    fn fetch_sequence_record(&self, addgene_id: &str) -> Result<Sequence, AddgeneError> {
        let page = self.get_text(self.sequence_page_url(addgene_id)?.as_str())?;
        let link = extract_sequence_link(&page)
            .ok_or_else(|| AddgeneError::NoSequence(addgene_id.to_string()))?;
        let file_url = self.resolve(&link)?;
        info!(addgene_id, url = %file_url, "downloading sequence");

        let mut record = genbank::parse(&self.get_text(file_url.as_str())?)?;
        record.name = addgene_id.to_string();
        Ok(record)
    }
}

/// First GenBank download link on a plasmid's sequences page.
pub fn extract_sequence_link(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    SEQUENCE_SECTIONS.iter().find_map(|css| {
        let section = Selector::parse(css).ok()?;
        document
            .select(&section)
            .next()?
            .select(&GENBANK_LINK)
            .next()?
            .value()
            .attr("href")
            .map(str::to_string)
    })
}
