//! Shared application state handed to every handler

use crate::core::auth::TokenSigner;
use crate::core::service::{OrderStore, ReferenceStore, UserStore};
use axum::extract::FromRef;
use std::sync::Arc;

/// State shared across all in-flight requests.
///
/// The three store handles usually point at the same backend instance; they
/// are split per trait so handlers only see the collections they touch.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub orders: Arc<dyn OrderStore>,
    pub references: Arc<dyn ReferenceStore>,
    pub users: Arc<dyn UserStore>,
    pub tokens: TokenSigner,
}

impl AppState {
    /// Build state from one backend implementing all three store traits.
    pub fn new<S>(store: Arc<S>, tokens: TokenSigner) -> Self
    where
        S: OrderStore + ReferenceStore + UserStore + 'static,
    {
        Self {
            orders: store.clone(),
            references: store.clone(),
            users: store,
            tokens,
        }
    }
}
