//! Relevance ordering of fetched candidates.
//!
//! Ranking runs in tiers over a shrinking pool. Each tier appends the pool
//! members it matches to an insertion-ordered result keyed by primary key,
//! then drains everything already placed from the pool. Whatever is left in
//! the pool after the last tier goes to the end.

use ahash::AHashSet as HashSet;
use tracing::trace;

use crate::{group::EntityGroup, record::SearchCandidate};

/// Insertion-ordered set of candidate indices with O(1) key membership.
struct RankedSet {
    keys: HashSet<i64>,
    order: Vec<usize>,
}

impl RankedSet {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            keys: HashSet::with_capacity(capacity),
            order: Vec::with_capacity(capacity),
        }
    }

    fn push<T: SearchCandidate>(&mut self, candidates: &[T], index: usize) {
        if self.keys.insert(candidates[index].candidate_key()) {
            self.order.push(index);
        }
    }

    fn contains<T: SearchCandidate>(&self, candidates: &[T], index: usize) -> bool {
        self.keys.contains(&candidates[index].candidate_key())
    }

    fn len(&self) -> usize {
        self.order.len()
    }

    /// Move the ranked candidates out of `candidates`, keeping at most `limit`.
    fn into_records<T>(self, candidates: Vec<T>, limit: usize) -> Vec<T> {
        let mut slots: Vec<Option<T>> = candidates.into_iter().map(Some).collect();
        self.order
            .into_iter()
            .take(limit)
            .filter_map(|index| slots[index].take())
            .collect()
    }
}

/// Orders candidates by how well they match the query tokens.
#[derive(Debug, Clone, Copy)]
pub struct RelevanceRanker {
    limit: usize,
}

impl RelevanceRanker {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn rank<T: SearchCandidate>(
        &self,
        group: EntityGroup,
        tokens: &[String],
        candidates: Vec<T>,
    ) -> Vec<T> {
        match group {
            EntityGroup::Person => self.rank_people(tokens, candidates),
            EntityGroup::Title => self.rank_titles(tokens, candidates),
            EntityGroup::SingleField => candidates,
        }
    }

    /// Per token: first-name prefix matches, then second-name prefix matches.
    pub fn rank_people<T: SearchCandidate>(&self, tokens: &[String], candidates: Vec<T>) -> Vec<T> {
        let mut result = RankedSet::with_capacity(candidates.len());
        let mut pool: Vec<usize> = (0..candidates.len()).collect();

        for token in tokens {
            let first = pool
                .iter()
                .copied()
                .filter(|&i| candidates[i].primary_text().starts_with(token.as_str()));
            let second = pool.iter().copied().filter(|&i| {
                candidates[i]
                    .secondary_text()
                    .is_some_and(|text| text.starts_with(token.as_str()))
            });
            for index in first.chain(second).collect::<Vec<_>>() {
                result.push(&candidates, index);
            }
            pool.retain(|&i| !result.contains(&candidates, i));
            trace!(token = token.as_str(), placed = result.len(), "Ranked person tier");
        }

        for index in pool {
            result.push(&candidates, index);
        }
        result.into_records(candidates, self.limit)
    }

    /// For `i = n..1`, candidates whose lower-cased title starts with the
    /// first `i` tokens, each tier sorted by title. Stops as soon as the
    /// limit is reached.
    pub fn rank_titles<T: SearchCandidate>(&self, tokens: &[String], candidates: Vec<T>) -> Vec<T> {
        let mut result = RankedSet::with_capacity(candidates.len());
        let mut pool: Vec<usize> = (0..candidates.len()).collect();

        for i in (1..=tokens.len()).rev() {
            let partial = tokens[..i].join(" ").to_lowercase();
            let mut tier: Vec<usize> = pool
                .iter()
                .copied()
                .filter(|&idx| candidates[idx].primary_text().to_lowercase().starts_with(&partial))
                .collect();
            tier.sort_by(|&a, &b| candidates[a].primary_text().cmp(candidates[b].primary_text()));

            for index in tier {
                result.push(&candidates, index);
            }
            trace!(partial = partial.as_str(), placed = result.len(), "Ranked title tier");
            if result.len() >= self.limit {
                return result.into_records(candidates, self.limit);
            }
            pool.retain(|&idx| !result.contains(&candidates, idx));
        }

        for index in pool {
            result.push(&candidates, index);
        }
        result.into_records(candidates, self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Candidate {
        key: i64,
        first: &'static str,
        second: Option<&'static str>,
    }

    impl SearchCandidate for Candidate {
        fn candidate_key(&self) -> i64 {
            self.key
        }
        fn primary_text(&self) -> &str {
            self.first
        }
        fn secondary_text(&self) -> Option<&str> {
            self.second
        }
    }

    fn person(key: i64, first: &'static str, second: &'static str) -> Candidate {
        Candidate {
            key,
            first,
            second: Some(second),
        }
    }

    fn title(key: i64, name: &'static str) -> Candidate {
        Candidate {
            key,
            first: name,
            second: None,
        }
    }

    fn tokens(raw: &str) -> Vec<String> {
        raw.split(' ').map(str::to_string).collect()
    }

    fn texts(ranked: &[Candidate]) -> Vec<&str> {
        ranked.iter().map(|c| c.first).collect()
    }

    #[test]
    fn test_person_first_name_matches_lead() {
        let ranker = RelevanceRanker::new(5);
        let pool = vec![
            person(1, "Bob", "Annaway"),
            person(2, "Ann", "Lee"),
            person(3, "Anna", "Smith"),
        ];
        let ranked = ranker.rank_people(&tokens("An"), pool);
        assert_eq!(texts(&ranked), vec!["Ann", "Anna", "Bob"]);
    }

    #[test]
    fn test_person_tiers_follow_token_order() {
        let ranker = RelevanceRanker::new(5);
        let pool = vec![
            person(1, "Zed", "Ray"),
            person(2, "Lee", "Child"),
            person(3, "Ann", "Lee"),
            person(4, "Mia", "Stone"),
        ];
        // "Ann" places Ann Lee; "Lee" then places Lee Child by first name.
        let ranked = ranker.rank_people(&tokens("Ann Lee"), pool);
        assert_eq!(
            ranked.iter().map(|c| c.key).collect::<Vec<_>>(),
            vec![3, 2, 1, 4]
        );
    }

    #[test]
    fn test_person_matched_by_both_names_placed_once() {
        let ranker = RelevanceRanker::new(5);
        let pool = vec![person(1, "Annie", "Annist"), person(2, "Ann", "Lee")];
        let ranked = ranker.rank_people(&tokens("Ann"), pool);
        assert_eq!(ranked.iter().map(|c| c.key).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_person_prefix_is_case_sensitive() {
        let ranker = RelevanceRanker::new(5);
        let pool = vec![person(1, "ann", "x"), person(2, "Ann", "y")];
        let ranked = ranker.rank_people(&tokens("Ann"), pool);
        assert_eq!(ranked.iter().map(|c| c.key).collect::<Vec<_>>(), vec![2, 1]);
    }

    #[test]
    fn test_person_result_is_truncated() {
        let ranker = RelevanceRanker::new(5);
        let pool = (0..9).map(|k| person(k, "Ann", "Lee")).collect();
        assert_eq!(ranker.rank_people(&tokens("Ann"), pool).len(), 5);
    }

    #[test]
    fn test_title_longest_partial_first() {
        let ranker = RelevanceRanker::new(5);
        let pool = vec![title(1, "Zen"), title(2, "The Rover"), title(3, "The Road")];
        let ranked = ranker.rank_titles(&tokens("The Ro"), pool);
        assert_eq!(texts(&ranked), vec!["The Road", "The Rover", "Zen"]);
    }

    #[test]
    fn test_title_prefix_ignores_case_but_tier_sort_does_not() {
        let ranker = RelevanceRanker::new(5);
        let pool = vec![
            title(1, "the roaring days"),
            title(2, "The Road"),
            title(3, "Theory of Roads"),
        ];
        let ranked = ranker.rank_titles(&tokens("The Ro"), pool);
        // Tier "the ro": uppercase sorts before lowercase. Tier "the": the rest.
        assert_eq!(
            texts(&ranked),
            vec!["The Road", "the roaring days", "Theory of Roads"]
        );
    }

    #[test]
    fn test_title_keeps_empty_tokens_in_place() {
        let ranker = RelevanceRanker::new(5);
        let pool = vec![
            title(1, "Zen"),
            title(2, "Theory of Roads"),
            title(3, "The Rover"),
            title(4, "The  Road Trip"),
        ];
        // Partials are "the  road", "the " and "the".
        let ranked = ranker.rank_titles(&tokens("The  Road"), pool);
        assert_eq!(
            texts(&ranked),
            vec!["The  Road Trip", "The Rover", "Theory of Roads", "Zen"]
        );
    }

    #[test]
    fn test_title_early_return_is_capped_at_limit() {
        let ranker = RelevanceRanker::new(5);
        let pool = (0..8)
            .map(|k| title(k, ["The Road A", "The Road B", "The Road C", "The Road D"][k as usize % 4]))
            .collect();
        let ranked = ranker.rank_titles(&tokens("The Road"), pool);
        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked[0].first, "The Road A");
        assert_eq!(ranked[1].first, "The Road A");
    }

    #[test]
    fn test_single_field_is_pass_through() {
        let ranker = RelevanceRanker::new(5);
        let pool: Vec<_> = (0..8).map(|k| title(k, "Fiction")).collect();
        let ranked = ranker.rank(EntityGroup::SingleField, &tokens("Fiction"), pool.clone());
        assert_eq!(ranked, pool);
    }

    #[test]
    fn test_ranking_is_deterministic_and_drawn_from_pool() {
        let ranker = RelevanceRanker::new(5);
        let pool = vec![
            title(1, "Magic Hour"),
            title(2, "The Colour of Magic"),
            title(3, "Magical Thinking"),
            title(4, "Maps"),
        ];
        let first = ranker.rank(EntityGroup::Title, &tokens("Magic Thinking"), pool.clone());
        let second = ranker.rank(EntityGroup::Title, &tokens("Magic Thinking"), pool.clone());

        assert_eq!(first, second);
        assert!(first.iter().all(|c| pool.contains(c)));
        assert_eq!(texts(&first), vec!["Magic Hour", "Magical Thinking", "The Colour of Magic", "Maps"]);
    }

    #[test]
    fn test_duplicate_keys_appear_once() {
        let ranker = RelevanceRanker::new(5);
        let pool = vec![title(1, "The Road"), title(1, "The Road"), title(2, "Other")];
        let ranked = ranker.rank_titles(&tokens("The Road"), pool);
        assert_eq!(ranked.iter().map(|c| c.key).collect::<Vec<_>>(), vec![1, 2]);
    }
}
