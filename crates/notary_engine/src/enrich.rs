use futures_util::stream::{self, StreamExt};
use notary_core::{Credential, ItemDetail, NotaryError};
use notary_logging::{notary_debug, notary_info};

use crate::decode::decode_log_url;
use crate::tool::Altool;
use crate::PollSettings;

/// A lookup that did not produce a log URL. The item stays eligible for the next cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichFailure {
    pub uuid: String,
    pub error: NotaryError,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Enrichment {
    pub details: Vec<ItemDetail>,
    pub failures: Vec<EnrichFailure>,
}

/// Looks up the log URL of every uuid, at most `settings.max_concurrent_info`
/// at a time. Returns once every lookup has finished.
pub async fn enrich(
    tool: &Altool,
    credential: &Credential,
    uuids: Vec<String>,
    settings: &PollSettings,
) -> Enrichment {
    let total = uuids.len();
    let results: Vec<(String, Result<String, NotaryError>)> = stream::iter(uuids)
        .map(|uuid| async move {
            let result = lookup(tool, credential, &uuid).await;
            (uuid, result)
        })
        .buffer_unordered(settings.max_concurrent_info.max(1))
        .collect()
        .await;

    let mut enrichment = Enrichment::default();
    for (uuid, result) in results {
        match result {
            Ok(detail_url) => enrichment.details.push(ItemDetail { uuid, detail_url }),
            Err(error) => {
                notary_debug!("No log URL for {} this cycle: {}", uuid, error);
                enrichment.failures.push(EnrichFailure { uuid, error });
            }
        }
    }
    notary_info!(
        "Enrichment finished: requested={} found={} failed={}",
        total,
        enrichment.details.len(),
        enrichment.failures.len()
    );
    enrichment
}

async fn lookup(tool: &Altool, credential: &Credential, uuid: &str) -> Result<String, NotaryError> {
    let xml = tool.info(credential, uuid).await?;
    Ok(decode_log_url(&xml)?)
}
