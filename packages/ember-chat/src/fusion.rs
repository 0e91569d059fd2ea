use std::collections::{HashMap, hash_map::Entry};

/// Reciprocal rank fusion over ranked key lists. Each list contributes
/// `1 / (rank + rrf_k)` per key, ranks are 1-based, and keys absent from a
/// list contribute nothing for it. The result is ordered by descending fused
/// score; ties keep first-seen insertion order, so nothing is dropped or
/// reshuffled on equal scores.
pub(crate) fn rrf_fuse(lists: &[Vec<String>], rrf_k: u32) -> Vec<(String, f64)> {
	let mut order = Vec::new();
	let mut scores: HashMap<String, f64> = HashMap::new();

	for list in lists {
		for (position, key) in list.iter().enumerate() {
			let contribution = 1.0 / ((position + 1) as f64 + rrf_k as f64);

			match scores.entry(key.clone()) {
				Entry::Occupied(mut entry) => *entry.get_mut() += contribution,
				Entry::Vacant(entry) => {
					entry.insert(contribution);
					order.push(key.clone());
				},
			}
		}
	}

	let mut fused: Vec<(String, f64)> =
		order.into_iter().map(|key| { let score = scores[&key]; (key, score) }).collect();

	// Stable sort keeps insertion order among equal scores.
	fused.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

	fused
}
