use std::process::Stdio;

use crate::config::NavigationConfig;
use crate::search::record::SearchRecord;
use crate::service::command::resolve_command;

/// Where selecting a result leads: a slugged page path plus the topic id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub path: String,
    pub id: u64,
}

impl Destination {
    /// Topics link to their own page; replies link to their parent topic.
    pub fn for_record(record: &SearchRecord, prefix: &str) -> Self {
        let (label, id) = match record {
            SearchRecord::Topic(t) => (t.title.as_str(), t.id),
            SearchRecord::Reply(r) => (r.topic_slug.as_str(), r.topic_id),
        };
        Self {
            path: format!("{}/{}", prefix.trim_end_matches('/'), slugify(label)),
            id,
        }
    }

    /// Site-relative link, e.g. `/questions/sonic-networking?id=1`
    pub fn href(&self) -> String {
        format!("{}?id={}", self.path, self.id)
    }
}

/// Lowercase, collapse every run of non `[a-z0-9]` characters into one `-`,
/// and strip leading/trailing hyphens.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for c in text.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

/// Join a site-relative link to the base URL. Absolute links pass through.
pub fn absolute_url(base_url: &str, link: &str) -> String {
    if link.starts_with("http://") || link.starts_with("https://") || base_url.is_empty() {
        return link.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        link.trim_start_matches('/')
    )
}

/// Open a link with the configured opener command.
pub fn open(config: &NavigationConfig, link: &str) {
    let url = absolute_url(&config.base_url, link);
    let Some((program, args)) = config.open_command.split_first() else {
        tracing::error!("Navigation open command is empty");
        return;
    };
    let program = resolve_command(program);

    tracing::info!("Opening {} with {}", url, program);

    match std::process::Command::new(&program)
        .args(args)
        .arg(&url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(_) => {}
        Err(e) => {
            tracing::error!("Failed to open '{}' with '{}': {}", url, program, e);
        }
    }
}
