//! Pure state transitions for the recommendation feed.
//!
//! Everything here is synchronous and network-free so the partition and
//! reveal rules can be tested exactly. Categories are always walked in
//! [`Category::ALL`] order; per-category relative order is preserved by
//! only ever taking from the front of a bucket.

use crate::models::{Category, RecommendationItem};

/// Items revealed per step, across all categories combined. A rendering
/// batch size, not a server limit.
pub(crate) const REVEAL_BATCH: usize = 4;

/// Per-category item queues, indexed in fixed walk order.
#[derive(Debug, Default, Clone)]
pub(crate) struct Buckets {
    items: [Vec<RecommendationItem>; 3],
}

impl Buckets {
    pub fn from_ordered(ordered: [Vec<RecommendationItem>; 3]) -> Self {
        Self { items: ordered }
    }

    pub fn get(&self, category: Category) -> &[RecommendationItem] {
        &self.items[category.index()]
    }

    pub fn push(&mut self, category: Category, item: RecommendationItem) {
        self.items[category.index()].push(item);
    }

    pub fn total(&self) -> usize {
        self.items.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.iter().all(Vec::is_empty)
    }

    pub fn contains(&self, category: Category, name: &str) -> bool {
        self.get(category).iter().any(|item| item.name == name)
    }
}

/// Split a fetched page into the immediately displayed slice and the
/// read-ahead buffer: walk categories in fixed order, assigning items to
/// the displayed side until `cap` have been taken, everything after that
/// to the buffer.
pub(crate) fn partition_initial(incoming: Buckets, cap: usize) -> (Buckets, Buckets) {
    let mut displayed = Buckets::default();
    let mut buffered = Buckets::default();
    let mut taken = 0;

    for (category, items) in Category::ALL.into_iter().zip(incoming.items) {
        for item in items {
            if taken < cap {
                displayed.push(category, item);
                taken += 1;
            } else {
                buffered.push(category, item);
            }
        }
    }

    (displayed, buffered)
}

/// Move up to `cap` items from the front of the buffers into the
/// displayed side. Returns the moved items in walk order.
pub(crate) fn reveal(
    displayed: &mut Buckets,
    buffered: &mut Buckets,
    cap: usize,
) -> Vec<(Category, RecommendationItem)> {
    let mut moved = Vec::new();

    for category in Category::ALL {
        let bucket = &mut buffered.items[category.index()];
        let take = cap.saturating_sub(moved.len()).min(bucket.len());
        for item in bucket.drain(..take) {
            displayed.push(category, item.clone());
            moved.push((category, item));
        }
    }

    moved
}

/// Append a freshly fetched page to the buffers, dropping items whose
/// name is already displayed or buffered in the same category.
pub(crate) fn merge_page(displayed: &Buckets, buffered: &mut Buckets, incoming: Buckets) {
    for (category, items) in Category::ALL.into_iter().zip(incoming.items) {
        for item in items {
            if displayed.contains(category, &item.name) || buffered.contains(category, &item.name)
            {
                continue;
            }
            buffered.push(category, item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str) -> RecommendationItem {
        RecommendationItem::named(name, "Testland")
    }

    fn names(bucket: &[RecommendationItem]) -> Vec<&str> {
        bucket.iter().map(|i| i.name.as_str()).collect()
    }

    fn page(dream: &[&str], target: &[&str], safe: &[&str]) -> Buckets {
        Buckets::from_ordered([
            dream.iter().map(|n| item(n)).collect(),
            target.iter().map(|n| item(n)).collect(),
            safe.iter().map(|n| item(n)).collect(),
        ])
    }

    #[test]
    fn test_initial_partition_scenario() {
        // 3 Dream + 6 Target + 3 Safe with a cap of 4: Dream drains first,
        // one Target makes the cut, Safe starts fully buffered.
        let incoming = page(
            &["d1", "d2", "d3"],
            &["t1", "t2", "t3", "t4", "t5", "t6"],
            &["s1", "s2", "s3"],
        );

        let (displayed, buffered) = partition_initial(incoming, REVEAL_BATCH);

        assert_eq!(names(displayed.get(Category::Dream)), ["d1", "d2", "d3"]);
        assert_eq!(names(displayed.get(Category::Target)), ["t1"]);
        assert!(displayed.get(Category::Safe).is_empty());

        assert!(buffered.get(Category::Dream).is_empty());
        assert_eq!(
            names(buffered.get(Category::Target)),
            ["t2", "t3", "t4", "t5", "t6"]
        );
        assert_eq!(names(buffered.get(Category::Safe)), ["s1", "s2", "s3"]);
    }

    #[test]
    fn test_partition_with_fewer_items_than_cap() {
        let (displayed, buffered) = partition_initial(page(&["d1"], &[], &["s1"]), REVEAL_BATCH);
        assert_eq!(displayed.total(), 2);
        assert!(buffered.is_empty());
    }

    #[test]
    fn test_reveal_caps_at_batch_size() {
        let mut displayed = Buckets::default();
        let mut buffered = page(&["d1", "d2"], &["t1", "t2"], &["s1"]);

        let moved = reveal(&mut displayed, &mut buffered, REVEAL_BATCH);

        assert_eq!(moved.len(), 4);
        assert_eq!(displayed.total(), 4);
        assert_eq!(buffered.total(), 1);
        // Dream and Target drained first; Safe still waiting.
        assert_eq!(names(buffered.get(Category::Safe)), ["s1"]);
    }

    #[test]
    fn test_reveal_preserves_per_category_order() {
        let mut displayed = Buckets::default();
        let mut buffered = page(&[], &["t1", "t2", "t3", "t4", "t5"], &[]);

        reveal(&mut displayed, &mut buffered, REVEAL_BATCH);
        reveal(&mut displayed, &mut buffered, REVEAL_BATCH);

        assert_eq!(
            names(displayed.get(Category::Target)),
            ["t1", "t2", "t3", "t4", "t5"]
        );
        assert!(buffered.is_empty());
    }

    #[test]
    fn test_reveal_on_empty_buffer_moves_nothing() {
        let mut displayed = page(&["d1"], &[], &[]);
        let mut buffered = Buckets::default();

        let moved = reveal(&mut displayed, &mut buffered, REVEAL_BATCH);
        assert!(moved.is_empty());
        assert_eq!(displayed.total(), 1);
    }

    #[test]
    fn test_merge_appends_and_dedupes_by_name() {
        let displayed = page(&["d1"], &[], &[]);
        let mut buffered = page(&["d2"], &["t1"], &[]);

        merge_page(
            &displayed,
            &mut buffered,
            page(&["d1", "d2", "d3"], &["t1", "t2"], &["s1"]),
        );

        assert_eq!(names(buffered.get(Category::Dream)), ["d2", "d3"]);
        assert_eq!(names(buffered.get(Category::Target)), ["t1", "t2"]);
        assert_eq!(names(buffered.get(Category::Safe)), ["s1"]);
    }

    #[test]
    fn test_same_name_allowed_across_categories() {
        let displayed = page(&["u1"], &[], &[]);
        let mut buffered = Buckets::default();

        merge_page(&displayed, &mut buffered, page(&[], &["u1"], &[]));
        assert_eq!(names(buffered.get(Category::Target)), ["u1"]);
    }
}
