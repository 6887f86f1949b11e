use crate::encoding::{decode_component, encode_component};

/// Target of a cross-reference link inside an article
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleLink {
    /// Last path segment, possibly still percent-encoded
    pub term: String,
    pub anchor: Option<String>,
}

/// Path part of the api prefix, e.g. `/api` for `http://host:2628/api`
fn prefix_path(api_prefix: &str) -> &str {
    let prefix = api_prefix.trim_end_matches('/');
    match prefix.find("://") {
        Some(scheme_end) => {
            let rest = &prefix[scheme_end + 3..];
            rest.find('/').map_or("", |slash| &rest[slash..])
        }
        None => prefix,
    }
}

/// Parse an `href` pointing at the query endpoint; other links are not ours
pub fn parse_query_link(href: &str, api_prefix: &str) -> Option<ArticleLink> {
    let absolute = format!("{}/query", api_prefix.trim_end_matches('/'));
    let relative = format!("{}/query", prefix_path(api_prefix));
    if !href.starts_with(&absolute) && !href.starts_with(&relative) {
        return None;
    }

    let last = href.rsplit('/').next()?;
    let (term, anchor) = match last.split_once('#') {
        Some((term, anchor)) => (term, Some(anchor.to_string()).filter(|a| !a.is_empty())),
        None => (last, None),
    };
    if term.is_empty() {
        return None;
    }

    Some(ArticleLink {
        term: term.to_string(),
        anchor,
    })
}

/// `?group=...&key=...` parameters that pre-seed a search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeepLink {
    pub group: Option<String>,
    pub key: Option<String>,
}

impl DeepLink {
    pub fn parse(query: &str) -> Self {
        let query = query.split_once('?').map_or(query, |(_, q)| q);
        let mut link = DeepLink::default();

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = value.replace('+', " ");
            let value = decode_component(&value).unwrap_or(value);
            match name {
                "group" if !value.is_empty() => link.group = Some(value),
                "key" if !value.is_empty() => link.key = Some(value),
                _ => {}
            }
        }
        link
    }

    pub fn is_empty(&self) -> bool {
        self.group.is_none() && self.key.is_none()
    }

    /// Query string that opens a search for `key`, e.g. in a new tab
    pub fn to_query(&self) -> String {
        let mut params = Vec::new();
        if let Some(group) = &self.group {
            params.push(format!("group={}", encode_component(group)));
        }
        if let Some(key) = &self.key {
            params.push(format!("key={}", encode_component(key)));
        }
        format!("?{}", params.join("&"))
    }
}
