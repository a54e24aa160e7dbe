//! Tag namespace resolver

use cachet_domain::constants::{NAMESPACE_SEPARATOR, tag_key};
use cachet_domain::error::{Error, Result};
use cachet_domain::{Store, Value};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// An ordered list of tag names bound to a store
///
/// Each tag's version token is kept in the store forever under
/// `tag:<name>:key`. Tokens are minted on first use.
#[derive(Debug, Clone)]
pub struct TagSet {
    store: Arc<dyn Store>,
    names: Vec<String>,
}

impl TagSet {
    /// Create a tag set; order matters for the resulting namespace
    pub fn new<I, S>(store: Arc<dyn Store>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            store,
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Tag names in caller order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Current version token of one tag, minting it if absent
    ///
    /// Two callers resolving a new tag at the same time may each mint a
    /// token; the last write wins and the other caller's entries are
    /// invalidated early.
    pub async fn tag_id(&self, name: &str) -> Result<String> {
        match self.store.get_string(&tag_key(name)).await {
            Ok(token) => Ok(token),
            Err(Error::NotFound { .. }) => self.reset_tag(name).await,
            Err(e) => Err(e),
        }
    }

    /// Version tokens of every tag, in order
    pub async fn tag_ids(&self) -> Result<Vec<String>> {
        let mut ids = Vec::with_capacity(self.names.len());
        for name in &self.names {
            ids.push(self.tag_id(name).await?);
        }
        Ok(ids)
    }

    /// The `|`-joined version tokens of every tag
    pub async fn namespace(&self) -> Result<String> {
        Ok(self
            .tag_ids()
            .await?
            .join(&NAMESPACE_SEPARATOR.to_string()))
    }

    /// Replace a tag's token, orphaning every namespace that contained it
    pub async fn reset_tag(&self, name: &str) -> Result<String> {
        let token = Uuid::new_v4().simple().to_string();
        self.store
            .forever(&tag_key(name), Value::from(token.as_str()))
            .await?;
        debug!(tag = name, "Tag version rotated");
        Ok(token)
    }

    /// Rotate every tag of the set
    pub async fn reset(&self) -> Result<()> {
        for name in &self.names {
            self.reset_tag(name).await?;
        }
        Ok(())
    }
}
