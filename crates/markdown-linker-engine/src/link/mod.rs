//! Parsing and rendering of navigation links.
//!
//! A navigation link looks like `mdlink://jump-file/src/main.rs#L42`:
//!
//! ```text
//! <scheme>://<action>/<path>[#<fragment>]
//! action   := ["jump-"] target-kind
//! fragment := optional("L" | "line-") digits
//! ```
//!
//! The scheme itself is only meaningful to the browser-side interceptor; the
//! host accepts any scheme and routes purely on the action.

mod fragment;

pub use fragment::line_number_from_fragment;

use url::Url;

/// Prefix on the action that selects direct resolution instead of a search dialog.
pub const LUCKY_PREFIX: &str = "jump-";

/// Errors produced while turning raw link text into a [`NavigationLink`]
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LinkError {
    #[error("Malformed link '{link}': {reason}")]
    Malformed { link: String, reason: String },
}

/// A link clicked in the preview, decomposed into its routing parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationLink {
    /// Target key with any lucky prefix already stripped
    pub action: String,
    /// True when the link asked to jump straight to the first match
    pub is_lucky: bool,
    /// What to search for or navigate to, without the leading separator
    pub path: String,
    /// 1-based line number as written in the link
    pub line_number: Option<u32>,
}

impl NavigationLink {
    pub fn new(action: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            is_lucky: false,
            path: path.into(),
            line_number: None,
        }
    }

    pub fn lucky(mut self) -> Self {
        self.is_lucky = true;
        self
    }

    pub fn with_line(mut self, line_number: u32) -> Self {
        self.line_number = Some(line_number);
        self
    }

    /// Parse raw link text as received from the preview.
    pub fn parse(raw: &str) -> Result<Self, LinkError> {
        let url = Url::parse(raw).map_err(|e| LinkError::Malformed {
            link: raw.to_string(),
            reason: e.to_string(),
        })?;

        let mut action = url.host_str().unwrap_or_default().to_string();
        let path = decode(raw_path(raw));
        let line_number = url.fragment().and_then(line_number_from_fragment);

        let is_lucky = action.starts_with(LUCKY_PREFIX);
        if is_lucky {
            action.drain(..LUCKY_PREFIX.len());
        }

        Ok(Self {
            action,
            is_lucky,
            path,
            line_number,
        })
    }

    /// Text used to seed a search dialog: `path` or `path:line`
    pub fn search_text(&self) -> String {
        match self.line_number {
            Some(line) => format!("{}:{line}", self.path),
            None => self.path.clone(),
        }
    }

    /// Render this link under `scheme`, percent-encoding each path segment.
    pub fn to_uri(&self, scheme: &str) -> String {
        let prefix = if self.is_lucky { LUCKY_PREFIX } else { "" };
        let path = self
            .path
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");

        let mut uri = format!("{scheme}://{prefix}{}/{path}", self.action);
        if let Some(line) = self.line_number {
            uri.push_str(&format!("#L{line}"));
        }
        uri
    }
}

/// The path as written: after the authority's `/`, up to any query or fragment.
/// `.` and `..` segments are kept.
fn raw_path(raw: &str) -> &str {
    let after_scheme = raw.split_once("://").map_or("", |(_, rest)| rest);
    let hierarchical = after_scheme.split(['?', '#']).next().unwrap_or_default();
    hierarchical
        .find('/')
        .map_or("", |slash| &hierarchical[slash + 1..])
}

fn decode(path: &str) -> String {
    urlencoding::decode(path)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
