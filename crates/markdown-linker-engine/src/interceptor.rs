//! The browser-side click interceptor.
//!
//! The script runs inside the preview. It finds the nearest anchor around the
//! click target and, when its `href` uses the link scheme, swallows the click
//! and posts the `href` on the message channel. Every other click goes to the
//! handler that was installed before it.

const TEMPLATE: &str = include_str!("../assets/mdlink.js");

/// Resource name the script is published under
pub const SCRIPT_RESOURCE: &str = "mdlink/mdlink.js";
pub const SCRIPT_MIME_TYPE: &str = "application/javascript";

/// Bridge used when the preview exposes a `window.__mdlinkPipe` object
pub const DEFAULT_BRIDGE: &str = "(channel, href) => window.__mdlinkPipe.post(channel, href)";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InterceptorError {
    #[error("Invalid link scheme: '{0}'")]
    InvalidScheme(String),
    #[error("Invalid channel name: '{0}'")]
    InvalidChannel(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterceptorScript {
    scheme: String,
    channel: String,
}

impl InterceptorScript {
    pub fn new(scheme: &str, channel: &str) -> Result<Self, InterceptorError> {
        let mut chars = scheme.chars();
        let valid_scheme = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if !valid_scheme {
            return Err(InterceptorError::InvalidScheme(scheme.to_string()));
        }

        let valid_channel = !channel.is_empty()
            && channel
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/'));
        if !valid_channel {
            return Err(InterceptorError::InvalidChannel(channel.to_string()));
        }

        Ok(Self {
            scheme: scheme.to_string(),
            channel: channel.to_string(),
        })
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Render the script posting through [`DEFAULT_BRIDGE`]
    pub fn render(&self) -> String {
        self.render_with_bridge(DEFAULT_BRIDGE)
    }

    /// Render the script; `bridge` is a JS expression evaluating to `(channel, href) => ...`
    pub fn render_with_bridge(&self, bridge: &str) -> String {
        TEMPLATE
            .replace("__SCHEME__", &self.scheme)
            .replace("__CHANNEL__", &self.channel)
            .replace("__BRIDGE__", bridge)
    }

    /// Whether `href` would be intercepted by this script
    pub fn intercepts(&self, href: &str) -> bool {
        href.split_once(':')
            .is_some_and(|(scheme, _)| !scheme.is_empty() && scheme == self.scheme)
    }
}

impl Default for InterceptorScript {
    fn default() -> Self {
        Self {
            scheme: "mdlink".to_string(),
            channel: "mdlink".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_default_script() {
        let script = InterceptorScript::default().render();
        insta::assert_snapshot!(script, @r#"
        (function() {
          const scheme = "mdlink";
          const channel = "mdlink";
          const post = (channel, href) => window.__mdlinkPipe.post(channel, href);
          const previous = window.document.onclick;
          window.document.onclick = function(e) {
            let target = e.target;
            while (target && !(target.tagName && target.tagName.toLowerCase() === 'a')) {
              target = target.parentNode;
            }
            if (!target || !target.hasAttribute('href')) {
              return previous ? previous.call(this, e) : true;
            }

            const href = target.getAttribute('href');
            const colon = href.indexOf(':');
            if (colon > 0 && href.substring(0, colon) === scheme) {
              e.preventDefault();
              e.stopPropagation();
              post(channel, href);
              return false;
            }

            return previous ? previous.call(this, e) : true;
          };
        })();
        "#);
    }

    #[test]
    fn test_render_custom_scheme_and_bridge() {
        let script = InterceptorScript::new("ide", "nav").unwrap();
        let rendered = script.render_with_bridge("(c, h) => dioxus.send([c, h])");

        assert!(rendered.contains(r#"const scheme = "ide";"#));
        assert!(rendered.contains(r#"const channel = "nav";"#));
        assert!(rendered.contains("const post = (c, h) => dioxus.send([c, h]);"));
        assert!(!rendered.contains("__"));
    }

    #[test]
    fn test_script_chains_previous_handler() {
        let rendered = InterceptorScript::default().render();
        assert_eq!(rendered.matches("previous.call(this, e)").count(), 2);
    }

    #[test]
    fn test_rejects_unsafe_names() {
        assert_eq!(
            InterceptorScript::new("md\"link", "mdlink"),
            Err(InterceptorError::InvalidScheme("md\"link".to_string()))
        );
        assert!(InterceptorScript::new("1link", "mdlink").is_err());
        assert!(InterceptorScript::new("", "mdlink").is_err());
        assert_eq!(
            InterceptorScript::new("mdlink", "a b"),
            Err(InterceptorError::InvalidChannel("a b".to_string()))
        );
    }

    #[test]
    fn test_intercepts_only_scheme() {
        let script = InterceptorScript::default();
        assert!(script.intercepts("mdlink://jump-file/a.md"));
        assert!(!script.intercepts("https://example.com"));
        assert!(!script.intercepts("#heading"));
        assert!(!script.intercepts("mdlinks://file/a.md"));
        assert!(!script.intercepts(":mdlink"));
    }
}
