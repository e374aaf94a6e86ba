use crate::domain::model::{BackerRow, Holding};
use crate::domain::traits::IdentityDirectory;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Merge holdings with Farcaster identities into display-ready rows.
///
/// Rows with a linked profile come first, highest counts first within each
/// group. A failed identity lookup degrades to an anonymous board instead
/// of failing the render.
pub async fn assemble_backers(
    identity: &dyn IdentityDirectory,
    holdings: &[Holding],
) -> Vec<BackerRow> {
    let addresses: Vec<String> = holdings.iter().map(|h| h.address.clone()).collect();

    let profiles = match identity.profiles_for_addresses(&addresses).await {
        Ok(profiles) => profiles,
        Err(e) => {
            tracing::warn!("identity lookup failed, rendering without profiles: {}", e);
            HashMap::new()
        }
    };

    let mut rows: Vec<BackerRow> = holdings
        .iter()
        .map(|h| BackerRow {
            address: h.address.clone(),
            count: h.count,
            profile: profiles.get(&h.address).cloned(),
        })
        .collect();

    rows.sort_by(|a, b| match (a.profile.is_some(), b.profile.is_some()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => b.count.cmp(&a.count),
    });

    rows
}
