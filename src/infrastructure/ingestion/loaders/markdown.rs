//! Markdown loading: frontmatter split and title extraction

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag};
use tracing::debug;

use crate::domain::document::{keys, Metadata};

/// Split a leading `---` delimited block from the body
///
/// Returns `(None, text)` when the text does not open with a delimiter line
/// or the block is never closed.
pub fn split_frontmatter(text: &str) -> (Option<&str>, &str) {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text.split_inclusive('\n');

    let Some(first) = lines.next() else {
        return (None, text);
    };

    if first.trim_end() != "---" {
        return (None, text);
    }

    let start = first.len();
    let mut offset = start;

    for line in lines {
        if line.trim_end() == "---" {
            let frontmatter = &text[start..offset];
            let body = &text[offset + line.len()..];
            return (Some(frontmatter), body.trim_start_matches(['\r', '\n']));
        }
        offset += line.len();
    }

    (None, text)
}

/// Parse frontmatter as a YAML mapping, or as `key: value` lines when it is not valid YAML
pub fn parse_frontmatter(raw: &str) -> Metadata {
    match serde_yaml::from_str::<serde_yaml::Value>(raw) {
        Ok(serde_yaml::Value::Mapping(mapping)) => {
            let mut metadata = Metadata::new();

            for (key, value) in mapping {
                let Some(key) = key.as_str() else {
                    continue;
                };

                if let Ok(value) = serde_json::to_value(&value) {
                    metadata.insert(key.to_string(), value);
                }
            }

            metadata
        }
        Ok(serde_yaml::Value::Null) => Metadata::new(),
        Ok(_) => parse_key_values(raw),
        Err(e) => {
            debug!(error = %e, "Frontmatter is not valid YAML, reading key: value lines");
            parse_key_values(raw)
        }
    }
}

fn parse_key_values(raw: &str) -> Metadata {
    raw.lines()
        .filter_map(|line| line.split_once(':'))
        .filter_map(|(key, value)| {
            let key = key.trim();
            if key.is_empty() {
                return None;
            }

            let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
            Some((key.to_string(), serde_json::Value::String(value.to_string())))
        })
        .collect()
}

/// Text of the first level-one heading
pub fn extract_title(markdown: &str) -> Option<String> {
    let mut in_title = false;
    let mut title = String::new();

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Heading(HeadingLevel::H1, ..)) => in_title = true,
            Event::End(Tag::Heading(HeadingLevel::H1, ..)) => {
                let title = title.trim();
                if !title.is_empty() {
                    return Some(title.to_string());
                }
                in_title = false;
            }
            Event::Text(t) | Event::Code(t) if in_title => title.push_str(&t),
            Event::SoftBreak | Event::HardBreak if in_title => title.push(' '),
            _ => {}
        }
    }

    None
}

/// Fill markdown metadata and return the body that gets chunked
pub fn load(text: String, metadata: &mut Metadata) -> String {
    let (frontmatter, body) = split_frontmatter(&text);

    if let Some(title) = extract_title(body) {
        metadata.insert(keys::TITLE.to_string(), serde_json::Value::String(title));
    }

    if let Some(raw) = frontmatter {
        for (key, value) in parse_frontmatter(raw) {
            if keys::is_reserved(&key) {
                debug!(key = %key, "Ignoring frontmatter key that shadows loader metadata");
                continue;
            }
            metadata.insert(key, value);
        }
    }

    body.to_string()
}
