/// Sender shown when the upstream message carries no display name.
pub const ANONYMOUS_SENDER: &str = "anonymous";

/// Description shown when the message was nothing but the URL itself.
const EMPTY_DESCRIPTION: &str = "Shared link";

/// URLs containing any of these fragments are dropped outright
/// (invite/affiliate spam suppression).
const DENY_LIST: [&str; 2] = ["discord", "wraithesports"];

/// A chat message as delivered by history backfill or the live feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub content: String,
    pub sender: Option<String>,
}

impl ChatMessage {
    pub fn new(content: impl Into<String>, sender: Option<String>) -> Self {
        Self {
            content: content.into(),
            sender,
        }
    }
}

/// One URL occurrence lifted out of a message, category still unresolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLink {
    pub url: String,
    pub sender: String,
    pub description: String,
}

/// Extract every URL occurrence from a message.
///
/// A message with no parseable URL yields an empty vector; that is not an
/// error. Deny-listed URLs are skipped entirely. The description is the
/// message body with the first occurrence of the URL removed and trimmed.
pub fn parse_message(message: &ChatMessage) -> Vec<ParsedLink> {
    let sender = message
        .sender
        .as_deref()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(ANONYMOUS_SENDER);

    find_urls(&message.content)
        .into_iter()
        .filter_map(|url| {
            let lower = url.to_lowercase();
            if DENY_LIST.iter().any(|blocked| lower.contains(blocked)) {
                return None;
            }

            let remainder = message.content.replacen(url, "", 1);
            let remainder = remainder.trim();
            let description = if remainder.is_empty() {
                EMPTY_DESCRIPTION.to_string()
            } else {
                remainder.to_string()
            };

            Some(ParsedLink {
                url: url.to_string(),
                sender: sender.to_string(),
                description,
            })
        })
        .collect()
}

/// Scan for `http://` / `https://` runs up to the next whitespace.
///
/// Matches are non-overlapping, left to right; a scheme embedded in an
/// already-matched URL is not re-matched.
fn find_urls(content: &str) -> Vec<&str> {
    let mut urls = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = content[cursor..].find("http") {
        let start = cursor + offset;
        let rest = &content[start..];
        let scheme_len = if rest.starts_with("https://") {
            "https://".len()
        } else if rest.starts_with("http://") {
            "http://".len()
        } else {
            cursor = start + "http".len();
            continue;
        };

        // The pattern requires at least one non-whitespace character
        // after the scheme.
        let tail = &rest[scheme_len..];
        let tail_len = tail.find(char::is_whitespace).unwrap_or(tail.len());
        if tail_len == 0 {
            cursor = start + scheme_len;
            continue;
        }

        let end = start + scheme_len + tail_len;
        urls.push(&content[start..end]);
        cursor = end;
    }

    urls
}
