use crate::search::record::SearchRecord;

/// Output of a filter pass over fetched records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filtered {
    pub records: Vec<SearchRecord>,
    /// Empty, or the full label of the first record whose leading word
    /// extends the query's leading word
    pub suggestion: String,
}

/// Keep the records whose searchable text contains `query` (case-insensitive)
/// and derive an inline completion from the survivors. Order is preserved.
pub fn filter_and_suggest(query: &str, records: &[SearchRecord]) -> Filtered {
    let needle = query.to_lowercase();
    let records: Vec<SearchRecord> = records
        .iter()
        .filter(|r| r.searchable_text().to_lowercase().contains(&needle))
        .cloned()
        .collect();
    let suggestion = suggest(query, &records);
    Filtered {
        records,
        suggestion,
    }
}

/// Pick the label of the first record whose first word starts with the
/// query's first word.
pub fn suggest(query: &str, records: &[SearchRecord]) -> String {
    records
        .iter()
        .find(|r| extends(r.label(), query))
        .map(|r| r.label().to_string())
        .unwrap_or_default()
}

/// Whether `suggestion`'s first word still starts with `query`'s first word
/// (case-insensitive).
pub fn extends(suggestion: &str, query: &str) -> bool {
    first_word(suggestion).starts_with(&first_word(query))
}

/// Records whose label starts with the accepted completion (case-insensitive).
pub fn narrow(records: &[SearchRecord], accepted: &str) -> Vec<SearchRecord> {
    let prefix = accepted.to_lowercase();
    records
        .iter()
        .filter(|r| r.label().to_lowercase().starts_with(&prefix))
        .cloned()
        .collect()
}

fn first_word(s: &str) -> String {
    s.split_whitespace().next().unwrap_or("").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::record::fixtures::{reply, topic};

    #[test]
    fn keeps_topics_by_title_and_replies_by_content() {
        let records = vec![
            topic(1, "SONiC Networking"),
            reply(2, 7, "offtopic", "no match"),
            reply(3, 8, "routing", "works with sonic images"),
            topic(4, "Observability"),
        ];
        let out = filter_and_suggest("sonic", &records);
        let ids: Vec<u64> = out.records.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(out.suggestion, "SONiC Networking");
    }

    #[test]
    fn reply_matches_on_content_not_slug() {
        let records = vec![reply(2, 7, "sonic-setup", "unrelated body")];
        let out = filter_and_suggest("sonic", &records);
        assert!(out.records.is_empty());
        assert_eq!(out.suggestion, "");
    }

    #[test]
    fn suggestion_skips_mid_string_matches() {
        let records = vec![
            topic(1, "Intro to SONiC"),
            topic(2, "sonic-mgmt tips"),
        ];
        let out = filter_and_suggest("sonic", &records);
        assert_eq!(out.records.len(), 2);
        assert_eq!(out.suggestion, "sonic-mgmt tips");
    }

    #[test]
    fn suggestion_uses_reply_topic_slug() {
        let records = vec![reply(5, 9, "bgp-peering guide", "bgp flaps")];
        let out = filter_and_suggest("bgp", &records);
        assert_eq!(out.suggestion, "bgp-peering guide");
    }

    #[test]
    fn only_first_query_word_drives_the_suggestion() {
        let records = vec![topic(1, "SONiC Networking basics")];
        let out = filter_and_suggest("sonic net", &records);
        assert_eq!(out.suggestion, "SONiC Networking basics");
    }

    #[test]
    fn filter_is_deterministic() {
        let records = vec![topic(1, "abc one"), topic(2, "abc two"), topic(3, "xyz")];
        let a = filter_and_suggest("abc", &records);
        let b = filter_and_suggest("abc", &records);
        assert_eq!(a, b);
    }

    #[test]
    fn extends_compares_leading_words_only() {
        assert!(extends("SONiC Networking", "sonic"));
        assert!(extends("SONiC Networking", "son routing"));
        assert!(!extends("SONiC Networking", "bgp routing"));
        assert!(!extends("SONiC Networking", "sonics"));
    }

    #[test]
    fn narrow_uses_starts_with_on_label() {
        let records = vec![
            topic(1, "SONiC Networking"),
            topic(2, "Why SONiC Networking"),
            reply(3, 1, "sonic networking faq", "sonic"),
        ];
        let narrowed = narrow(&records, "SONiC Networking");
        let ids: Vec<u64> = narrowed.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
