use http::{header, HeaderMap, HeaderValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Budget {
    Core,
    Search,
    Graphql,
}

impl Budget {
    pub fn classify(path: &str, resource_header: Option<&HeaderValue>) -> Self {
        if let Some(resource) = resource_header.and_then(|v| v.to_str().ok()) {
            return match resource {
                "search" => Budget::Search,
                "graphql" => Budget::Graphql,
                _ => Budget::Core,
            };
        }

        if path.ends_with("/graphql") || path == "graphql" {
            Budget::Graphql
        } else if path.contains("/search/") {
            Budget::Search
        } else {
            Budget::Core
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Budget::Core => "core",
            Budget::Search => "search",
            Budget::Graphql => "graphql",
        }
    }
}

/// `X-RateLimit-Remaining`; pagination only needs to know when it hits zero.
pub fn parse_remaining(headers: &HeaderMap) -> Option<i64> {
    header_i64(headers, "x-ratelimit-remaining")
}

fn header_i64(headers: &HeaderMap, name: &str) -> Option<i64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<i64>().ok())
}

/// Extracts the `rel="next"` target from an RFC 8288 `Link` header.
pub fn parse_next_link(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::LINK)?.to_str().ok()?;
    value.split(',').find_map(|link| {
        let mut parts = link.split(';');
        let target = parts.next()?.trim();
        let is_next = parts.any(|param| {
            let param = param.trim();
            param == r#"rel="next""# || param == "rel=next"
        });
        if !is_next {
            return None;
        }
        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(str::to_string)
    })
}
