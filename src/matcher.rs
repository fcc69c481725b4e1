use strsim::normalized_levenshtein;

use crate::{cache::NormalizeCache, normalize::normalize, reference::ReferenceSet};

/// Similarity scorer on the 0-100 scale.
///
/// Source datasets disagree on whether plain edit distance or a token-order-
/// insensitive ratio fits journal names better, so the choice is explicit
/// configuration rather than baked in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Scorer {
    /// Normalized Levenshtein ratio over the whole string.
    #[default]
    Ratio,
    /// Normalized Levenshtein ratio after sorting whitespace tokens, so
    /// "science journal" and "journal science" score 100.
    TokenSort,
}

impl Scorer {
    /// Score two canonical keys: 0 = no similarity, 100 = identical.
    pub fn score(self, a: &str, b: &str) -> u8 {
        let ratio = match self {
            Scorer::Ratio => normalized_levenshtein(a, b),
            Scorer::TokenSort => normalized_levenshtein(&sort_tokens(a), &sort_tokens(b)),
        };
        (ratio * 100.0).round() as u8
    }
}

fn sort_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Matching policy: which scorer to run and the minimum score at which a
/// fuzzy candidate counts as a match. A candidate scoring exactly the
/// threshold is accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchConfig {
    pub scorer: Scorer,
    pub threshold: u8,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            scorer: Scorer::Ratio,
            threshold: 80,
        }
    }
}

/// Outcome of a single lookup. `key` is `None` when nothing cleared the
/// threshold; `payloads` then is empty and `score` is 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Match<'r, M> {
    /// The query as the caller supplied it.
    pub query: String,
    /// Canonical key of the accepted candidate.
    pub key: Option<&'r str>,
    /// Similarity score in [0, 100]; 100 for exact canonical hits.
    pub score: u8,
    /// Every metadata payload recorded under the matched key.
    pub payloads: &'r [M],
}

impl<'r, M> Match<'r, M> {
    fn none(query: &str) -> Self {
        Match {
            query: query.to_string(),
            key: None,
            score: 0,
            payloads: &[],
        }
    }

    pub fn is_match(&self) -> bool {
        self.key.is_some()
    }
}

/// Two-stage lookup against a published [`ReferenceSet`]: a hash-indexed
/// exact check first, then a linear fuzzy scan in reference order.
///
/// Lookups are independent computations over the immutable reference set;
/// results do not depend on the order queries arrive in. The optional
/// normalization cache only memoizes a pure function.
pub struct Matcher<'r, M> {
    reference: &'r ReferenceSet<M>,
    config: MatchConfig,
    cache: Option<NormalizeCache>,
}

impl<'r, M> Matcher<'r, M> {
    pub fn new(reference: &'r ReferenceSet<M>, config: MatchConfig) -> Self {
        Matcher {
            reference,
            config,
            cache: None,
        }
    }

    /// Memoize normalization of raw queries in a bounded LRU cache.
    /// A capacity of 0 disables caching.
    pub fn with_cache(mut self, capacity: usize) -> Self {
        self.cache = (capacity > 0).then(|| NormalizeCache::new(capacity));
        self
    }

    /// Normalize a raw name, then match its canonical key.
    pub fn lookup(&mut self, raw: &str) -> Match<'r, M> {
        let canonical = match &mut self.cache {
            Some(cache) => cache.canonical(raw),
            None => normalize(raw),
        };
        let mut result = self.lookup_canonical(&canonical);
        result.query = raw.to_string();
        result
    }

    /// Match an already-canonical key against the reference set.
    ///
    /// Empty queries and empty reference sets short-circuit to no-match
    /// without invoking the scorer. Ties between fuzzy candidates resolve to
    /// the first-encountered key in reference order, never to map iteration
    /// order.
    pub fn lookup_canonical(&self, canonical: &str) -> Match<'r, M> {
        if canonical.is_empty() || self.reference.is_empty() {
            return Match::none(canonical);
        }

        // Exact canonical hits always win, via the hash index.
        if let Some((key, payloads)) = self.reference.get(canonical) {
            return Match {
                query: canonical.to_string(),
                key: Some(key),
                score: 100,
                payloads,
            };
        }

        let mut best: Option<(usize, u8)> = None;
        for (i, key) in self.reference.keys().enumerate() {
            let score = self.config.scorer.score(canonical, key);
            // Strict ">" keeps the first of equally-scored candidates.
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((i, score));
            }
        }

        match best {
            Some((i, score)) if score >= self.config.threshold => {
                let (key, payloads) = self.reference.entry(i);
                Match {
                    query: canonical.to_string(),
                    key: Some(key),
                    score,
                    payloads,
                }
            }
            _ => Match::none(canonical),
        }
    }

    /// Run [`Matcher::lookup`] over a batch of raw queries.
    pub fn lookup_all<I, S>(&mut self, queries: I) -> Vec<Match<'r, M>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        queries
            .into_iter()
            .map(|raw| self.lookup(raw.as_ref()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(keys: &[&str]) -> ReferenceSet<u32> {
        ReferenceSet::from_rows(keys.iter().enumerate().map(|(i, k)| (*k, i as u32)))
    }

    #[test]
    fn exact_match_scores_100_and_skips_fuzzy() {
        let reference = keys(&["journal of biology", "journal of science"]);
        let matcher = Matcher::new(&reference, MatchConfig::default());
        let m = matcher.lookup_canonical("journal of science");
        assert_eq!(m.key, Some("journal of science"));
        assert_eq!(m.score, 100);
        assert_eq!(m.payloads, &[1]);
    }

    #[test]
    fn duplicate_keys_keep_every_payload_and_match_once() {
        let reference = ReferenceSet::from_rows([("Nature", 1u32), ("nature", 2), ("NATURE ", 3)]);
        let matcher = Matcher::new(&reference, MatchConfig::default());
        let m = matcher.lookup_canonical("nature");
        assert_eq!(m.key, Some("nature"));
        assert_eq!(m.score, 100);
        assert_eq!(m.payloads, &[1, 2, 3]);
    }

    #[test]
    fn fuzzy_tie_prefers_first_reference_key() {
        let reference = keys(&["abcd x", "abcd y"]);
        let matcher = Matcher::new(&reference, MatchConfig::default());
        // Equidistant from both candidates; reference order must decide.
        let m = matcher.lookup_canonical("abcd z");
        assert_eq!(m.key, Some("abcd x"));
    }

    #[test]
    fn threshold_boundary_at_80() {
        let near = "a".repeat(80) + &"b".repeat(20); // scores exactly 80
        let far = "a".repeat(79) + &"b".repeat(21); // scores exactly 79
        let query = "a".repeat(100);

        let config = MatchConfig {
            scorer: Scorer::Ratio,
            threshold: 80,
        };

        let accept = ReferenceSet::from_rows([(near.as_str(), ())]);
        let m = Matcher::new(&accept, config).lookup_canonical(&query);
        assert_eq!((m.key, m.score), (Some(near.as_str()), 80));

        let reject = ReferenceSet::from_rows([(far.as_str(), ())]);
        let m = Matcher::new(&reject, config).lookup_canonical(&query);
        assert_eq!((m.key, m.score), (None, 0));
    }

    #[test]
    fn threshold_boundary_at_90() {
        let near = "a".repeat(90) + &"b".repeat(10); // scores exactly 90
        let far = "a".repeat(89) + &"b".repeat(11); // scores exactly 89
        let query = "a".repeat(100);

        let config = MatchConfig {
            scorer: Scorer::Ratio,
            threshold: 90,
        };

        let accept = ReferenceSet::from_rows([(near.as_str(), ())]);
        let m = Matcher::new(&accept, config).lookup_canonical(&query);
        assert_eq!((m.key, m.score), (Some(near.as_str()), 90));

        let reject = ReferenceSet::from_rows([(far.as_str(), ())]);
        let m = Matcher::new(&reject, config).lookup_canonical(&query);
        assert_eq!((m.key, m.score), (None, 0));
    }

    #[test]
    fn rejected_candidates_report_score_zero() {
        let reference = keys(&["nature"]);
        let mut matcher = Matcher::new(&reference, MatchConfig::default());
        let m = matcher.lookup("xyzxyz totally unrelated");
        assert_eq!(m.key, None);
        assert_eq!(m.score, 0);
        assert!(m.payloads.is_empty());
    }

    #[test]
    fn empty_query_never_matches() {
        let reference = keys(&["nature", "cell", "science"]);
        for threshold in [0, 80, 90] {
            let config = MatchConfig {
                threshold,
                ..MatchConfig::default()
            };
            let m = Matcher::new(&reference, config).lookup_canonical("");
            assert_eq!((m.key, m.score), (None, 0));
        }
    }

    #[test]
    fn empty_reference_set_never_matches() {
        let reference: ReferenceSet<()> = ReferenceSet::from_rows(Vec::<(&str, ())>::new());
        let mut matcher = Matcher::new(&reference, MatchConfig::default());
        let m = matcher.lookup("nature");
        assert_eq!((m.key, m.score), (None, 0));
    }

    #[test]
    fn raw_query_normalizes_before_matching() {
        let reference = keys(&["journal of biology", "journal of science"]);
        let mut matcher = Matcher::new(&reference, MatchConfig::default());
        let m = matcher.lookup("J. of Biology");
        assert_eq!(m.key, Some("journal of biology"));
        assert!(m.score >= 90, "expected near-exact score, got {}", m.score);
        assert_eq!(m.query, "J. of Biology");
    }

    #[test]
    fn token_sort_scorer_ignores_token_order() {
        assert_eq!(Scorer::TokenSort.score("journal science", "science journal"), 100);
        assert!(Scorer::Ratio.score("journal science", "science journal") < 100);
    }

    #[test]
    fn scores_stay_in_range() {
        proptest::proptest!(|(a in "[a-z ]{0,32}", b in "[a-z ]{0,32}")| {
            for scorer in [Scorer::Ratio, Scorer::TokenSort] {
                let score = scorer.score(&a, &b);
                proptest::prop_assert!(score <= 100);
            }
        })
    }

    #[test]
    fn lookups_are_independent_of_order() {
        let reference = keys(&["journal of biology", "nature physics", "cell reports"]);
        proptest::proptest!(|(qs in proptest::collection::vec("[a-zA-Z .]{0,24}", 1..6))| {
            let mut warm = Matcher::new(&reference, MatchConfig::default()).with_cache(8);
            let batch = warm.lookup_all(&qs);
            for (raw, got) in qs.iter().zip(&batch) {
                // A fresh matcher with no history must agree with the batch run.
                let mut fresh = Matcher::new(&reference, MatchConfig::default());
                proptest::prop_assert_eq!(&fresh.lookup(raw), got);
            }
        })
    }
}
