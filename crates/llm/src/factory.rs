//! Text-generation client factory.
//!
//! Holds the credential gate: a client is only ever constructed when the
//! complete credential set is present, so an unconfigured deployment can
//! never issue a network call.

use crate::client::TextGenerator;
use crate::providers::WatsonxClient;
use krishi_core::config::WatsonxSettings;
use krishi_core::AppResult;
use std::sync::Arc;

/// Create a text generator from watsonx settings, if configured.
///
/// Returns `None` when any of the three credentials (url, api key,
/// project id) is absent. This is a configuration state, not a failure,
/// and is logged at diagnostic level only.
pub fn create_generator(
    settings: &WatsonxSettings,
) -> AppResult<Option<Arc<dyn TextGenerator>>> {
    if !settings.is_configured() {
        tracing::debug!("watsonx credentials not configured, AI augmentation disabled");
        return Ok(None);
    }

    let client = WatsonxClient::new(settings)?;
    Ok(Some(Arc::new(client)))
}
