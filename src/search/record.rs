use serde::{Deserialize, Serialize};

/// A forum topic returned by the search endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub date: String,
}

/// A reply to a topic returned by the search endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub id: u64,
    pub topic_id: u64,
    pub topic_slug: String,
    pub content: String,
    #[serde(default)]
    pub date: String,
}

/// JSON wire schema: one object per record, discriminated by `"type"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SearchRecord {
    Topic(Topic),
    Reply(Reply),
}

impl SearchRecord {
    pub fn id(&self) -> u64 {
        match self {
            SearchRecord::Topic(t) => t.id,
            SearchRecord::Reply(r) => r.id,
        }
    }

    /// Text used for suggestions and acceptance narrowing: the title of a
    /// topic, the parent topic slug of a reply.
    pub fn label(&self) -> &str {
        match self {
            SearchRecord::Topic(t) => &t.title,
            SearchRecord::Reply(r) => &r.topic_slug,
        }
    }

    /// Text the query is matched against: the title of a topic, the body of a reply.
    pub fn searchable_text(&self) -> &str {
        match self {
            SearchRecord::Topic(t) => &t.title,
            SearchRecord::Reply(r) => &r.content,
        }
    }

    pub fn date(&self) -> &str {
        match self {
            SearchRecord::Topic(t) => &t.date,
            SearchRecord::Reply(r) => &r.date,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            SearchRecord::Topic(_) => "Topic",
            SearchRecord::Reply(_) => "Reply",
        }
    }
}

/// Decode a batch of JSON values one record at a time.
/// Returns the records that decoded and the number that did not.
pub fn decode_records(values: Vec<serde_json::Value>) -> (Vec<SearchRecord>, usize) {
    let mut records = Vec::with_capacity(values.len());
    let mut skipped = 0;
    for value in values {
        match serde_json::from_value::<SearchRecord>(value) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::debug!("Skipping malformed search record: {}", e);
                skipped += 1;
            }
        }
    }
    (records, skipped)
}

/// Decode one JSONL line. Blank lines and malformed records yield `None`.
pub fn decode_line(line: &str) -> Option<SearchRecord> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str::<SearchRecord>(line) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::debug!("Skipping malformed search record line: {}", e);
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn topic(id: u64, title: &str) -> SearchRecord {
        SearchRecord::Topic(Topic {
            id,
            title: title.to_string(),
            excerpt: None,
            date: "2024-05-01T10:00:00Z".to_string(),
        })
    }

    pub fn reply(id: u64, topic_id: u64, topic_slug: &str, content: &str) -> SearchRecord {
        SearchRecord::Reply(Reply {
            id,
            topic_id,
            topic_slug: topic_slug.to_string(),
            content: content.to_string(),
            date: "2024-05-02T10:00:00Z".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_both_variants_by_type_tag() {
        let values = vec![
            json!({"type": "topic", "id": 1, "title": "SONiC Networking", "excerpt": "intro", "date": "2024-01-01"}),
            json!({"type": "reply", "id": 2, "topic_id": 1, "topic_slug": "sonic-networking", "content": "thanks", "date": "2024-01-02"}),
        ];
        let (records, skipped) = decode_records(values);
        assert_eq!(skipped, 0);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].label(), "SONiC Networking");
        assert_eq!(records[1].label(), "sonic-networking");
        assert_eq!(records[1].searchable_text(), "thanks");
    }

    #[test]
    fn malformed_records_are_skipped_not_fatal() {
        let values = vec![
            json!({"type": "topic", "id": 1}),
            json!({"type": "reply", "id": 2, "topic_id": 1, "topic_slug": "x"}),
            json!({"type": "poll", "id": 3}),
            json!("not an object"),
            json!({"type": "topic", "id": 4, "title": "Kept"}),
        ];
        let (records, skipped) = decode_records(values);
        assert_eq!(skipped, 4);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id(), 4);
        assert_eq!(records[0].date(), "");
    }

    #[test]
    fn decode_line_ignores_blank_and_broken_lines() {
        assert!(decode_line("   ").is_none());
        assert!(decode_line("{oops").is_none());
        let record = decode_line(r#"{"type":"topic","id":9,"title":"Hello"}"#).unwrap();
        assert_eq!(record.kind_name(), "Topic");
    }
}
