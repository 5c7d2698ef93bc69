use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::model::{Contact, ContactDraft, ContactId};

use super::{ContactRepository, read_body, read_json};

/// REST client for the `/persons` resource.
#[derive(Debug, Clone)]
pub struct HttpContactRepository {
    base_url: String,
    http: Client,
}

impl HttpContactRepository {
    /// `base_url` is the collection URL, e.g. `http://localhost:3001/persons`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, http: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    fn item_url(&self, id: &ContactId) -> String {
        format!("{}/{}", self.base_url, id)
    }
}

#[async_trait]
impl ContactRepository for HttpContactRepository {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Contact>> {
        debug!(url = %self.base_url, "listing contacts");
        let res = self
            .http
            .get(&self.base_url)
            .send()
            .await
            .context("Failed to send request to contacts backend (list)")?;

        read_json(res, "contacts list").await
    }

    #[instrument(skip(self))]
    async fn create(&self, draft: &ContactDraft) -> Result<Contact> {
        debug!("creating contact");
        let res = self
            .http
            .post(&self.base_url)
            .json(draft)
            .send()
            .await
            .context("Failed to send request to contacts backend (create)")?;

        read_json(res, "contact create").await
    }

    #[instrument(skip(self))]
    async fn update(&self, id: &ContactId, draft: &ContactDraft) -> Result<Contact> {
        debug!("updating contact");
        let res = self
            .http
            .put(self.item_url(id))
            .json(draft)
            .send()
            .await
            .context("Failed to send request to contacts backend (update)")?;

        read_json(res, "contact update").await
    }

    #[instrument(skip(self))]
    async fn remove(&self, id: &ContactId) -> Result<()> {
        debug!("removing contact");
        let res = self
            .http
            .delete(self.item_url(id))
            .send()
            .await
            .context("Failed to send request to contacts backend (delete)")?;

        read_body(res, "contact delete").await.map(|_| ())
    }
}
