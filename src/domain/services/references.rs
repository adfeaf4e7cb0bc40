//! Cross-reference URL handling

use tracing::warn;

use crate::domain::value_objects::EntityId;

/// Extract the canonical id from a reference URL ending in `/<digits>/`.
///
/// URLs of any other shape map to id 0, which the remote never assigns,
/// so a later lookup of that id fails as not found.
pub fn extract_id_from_url(url: &str) -> EntityId {
    let parsed = url
        .strip_suffix('/')
        .and_then(|rest| rest.rsplit_once('/'))
        .map(|(_, last)| last)
        .filter(|last| !last.is_empty() && last.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|digits| digits.parse::<u32>().ok());

    match parsed {
        Some(id) => EntityId::new(id),
        None => {
            warn!(url, "Reference URL has no trailing id");
            EntityId::new(0)
        }
    }
}
