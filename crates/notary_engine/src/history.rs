use std::collections::HashSet;

use notary_core::{Credential, HistoryItem, NotaryError};
use notary_logging::notary_debug;

use crate::decode::{decode_history_page, DecodeError};
use crate::tool::Altool;
use crate::PollSettings;

/// Walks the history pages from page 0 until the tool stops handing out cursors.
///
/// An empty page ends the walk whatever its cursor says. A cursor pointing at a
/// page already fetched in this walk, or a walk longer than
/// `settings.max_pages`, is reported as a decode failure.
pub async fn fetch_all_history(
    tool: &Altool,
    credential: &Credential,
    settings: &PollSettings,
) -> Result<Vec<HistoryItem>, NotaryError> {
    let mut items = Vec::new();
    let mut visited = HashSet::new();
    let mut page = 0u64;

    loop {
        if visited.len() >= settings.max_pages {
            return Err(DecodeError::PageLimit(settings.max_pages).into());
        }
        visited.insert(page);

        let xml = tool.history_page(credential, page).await?;
        let decoded = decode_history_page(&xml)?;
        let count = decoded.items.len();
        let next = decoded.next_page();
        notary_debug!("History page {}: items={} next={:?}", page, count, next);
        items.extend(decoded.items);

        if count == 0 {
            break;
        }
        match next {
            Some(next) if visited.contains(&next) => {
                return Err(DecodeError::CursorRevisited(next).into());
            }
            Some(next) => page = next,
            None => break,
        }
    }

    Ok(items)
}
