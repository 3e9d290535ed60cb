use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

use crate::models::resume::ItemId;

static LAST_MINTED: AtomicI64 = AtomicI64::new(0);

/// Mints a process-unique item id from the wall clock in milliseconds.
///
/// Two calls in the same millisecond still get distinct, increasing values. `taken`
/// lets the caller skip ids already present in a section (e.g. a loaded document
/// that was written by another process).
pub fn mint_item_id(taken: impl Fn(ItemId) -> bool) -> ItemId {
    loop {
        let now = Utc::now().timestamp_millis();
        let previous = LAST_MINTED
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        let candidate = ItemId(now.max(previous + 1));
        if !taken(candidate) {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_strictly_increase() {
        let a = mint_item_id(|_| false);
        let b = mint_item_id(|_| false);
        let c = mint_item_id(|_| false);
        assert!(a < b && b < c);
    }

    #[test]
    fn test_taken_ids_are_skipped() {
        let probe = mint_item_id(|_| false);
        let next = mint_item_id(|id| id.0 <= probe.0 + 5);
        assert!(next.0 > probe.0 + 5);
    }
}
