//! Filter hooks: named extension points where registered listeners may rewrite
//! data in flight.
//!
//! A [`FilterChain`] holds its listeners in registration order. Firing the chain
//! hands the payload to the first listener, feeds each listener's output to the
//! next, and returns the last output. An empty chain returns the payload unchanged.

use std::{fmt, sync::Arc};

use async_trait::async_trait;

use crate::{errors::CategoryError, types::CategoryRecord};

/// Fired after category hashes are read and before they are normalized.
pub const CATEGORY_GET_FIELDS: &str = "filter:category.getFields";

/// Payload of [`CATEGORY_GET_FIELDS`].
///
/// Listeners may rewrite `categories`; it must stay aligned with `cids`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetFieldsPayload {
    pub cids: Vec<i64>,
    pub categories: Vec<Option<CategoryRecord>>,
    pub fields: Vec<String>,
    pub keys: Vec<String>,
}

#[async_trait]
pub trait FilterListener<P>: Send + Sync
where
    P: Send + 'static,
{
    async fn filter(&self, payload: P) -> Result<P, CategoryError>;
}

/// Adapts a synchronous closure into a [`FilterListener`].
pub struct FnListener<F>(F);

pub fn listener_fn<P, F>(f: F) -> FnListener<F>
where
    P: Send + 'static,
    F: Fn(P) -> Result<P, CategoryError> + Send + Sync,
{
    FnListener(f)
}

#[async_trait]
impl<P, F> FilterListener<P> for FnListener<F>
where
    P: Send + 'static,
    F: Fn(P) -> Result<P, CategoryError> + Send + Sync,
{
    async fn filter(&self, payload: P) -> Result<P, CategoryError> {
        (self.0)(payload)
    }
}

pub struct FilterChain<P>
where
    P: Send + 'static,
{
    name: String,
    listeners: Vec<Arc<dyn FilterListener<P>>>,
}

impl<P> FilterChain<P>
where
    P: Send + 'static,
{
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            listeners: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Appends a listener; it runs after every listener registered before it.
    pub fn register<L>(&mut self, listener: L) -> &mut Self
    where
        L: FilterListener<P> + 'static,
    {
        self.listeners.push(Arc::new(listener));
        self
    }

    pub async fn fire(&self, payload: P) -> Result<P, CategoryError> {
        let mut payload = payload;
        for (position, listener) in self.listeners.iter().enumerate() {
            log::trace!("firing {} listener #{position}", self.name);
            payload = listener.filter(payload).await?;
        }
        Ok(payload)
    }
}

impl<P> Clone for FilterChain<P>
where
    P: Send + 'static,
{
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            listeners: self.listeners.clone(),
        }
    }
}

impl<P> fmt::Debug for FilterChain<P>
where
    P: Send + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterChain")
            .field("name", &self.name)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// The hooks consulted by category reads.
#[derive(Debug, Clone)]
pub struct CategoryHooks {
    pub get_fields: FilterChain<GetFieldsPayload>,
}

impl Default for CategoryHooks {
    fn default() -> Self {
        Self {
            get_fields: FilterChain::new(CATEGORY_GET_FIELDS),
        }
    }
}
