use pulldown_cmark::{Options, Parser, html};

/// Render Markdown to the HTML shown in the preview
pub fn render_markdown(source: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES;
    let parser = Parser::new_ext(source, options);

    let mut output = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut output, parser);
    output
}

/// Render file content as numbered lines, `highlighted` being a 0-based line
pub fn render_source_lines(content: &str, highlighted: Option<u32>) -> String {
    let mut output = String::with_capacity(content.len() * 2);
    for (index, line) in content.lines().enumerate() {
        let class = if highlighted == Some(index as u32) {
            "source-line highlighted"
        } else {
            "source-line"
        };
        output.push_str(&format!(
            r#"<div id="line-{index}" class="{class}"><span class="line-number">{}</span><span class="line-text">{}</span></div>"#,
            index + 1,
            html_escape::encode_text(line)
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_links_survive_rendering() {
        let html = render_markdown(
            "See [the router](mdlink://jump-class/LinkRouter) and [line 10](mdlink://file/docs/readme.md#L10).",
        );

        assert!(html.contains(r#"href="mdlink://jump-class/LinkRouter""#));
        assert!(html.contains(r#"href="mdlink://file/docs/readme.md#L10""#));
    }

    #[test]
    fn test_render_markdown_document() {
        let html = render_markdown("# Links\n\n- [Widget](mdlink://jump-all/Widget)\n");

        insta::assert_snapshot!(html, @r#"
        <h1>Links</h1>
        <ul>
        <li><a href="mdlink://jump-all/Widget">Widget</a></li>
        </ul>
        "#);
    }

    #[test]
    fn test_source_lines_escape_and_highlight() {
        let html = render_source_lines("fn a() {}\nlet b = x < y;\n", Some(1));

        assert!(html.contains(r#"<div id="line-0" class="source-line">"#));
        assert!(html.contains(r#"<div id="line-1" class="source-line highlighted">"#));
        assert!(html.contains("let b = x &lt; y;"));
        assert!(html.contains(r#"<span class="line-number">2</span>"#));
    }

    #[test]
    fn test_source_lines_without_highlight() {
        let html = render_source_lines("one\ntwo", None);
        assert!(!html.contains("highlighted"));
        assert_eq!(html.matches("source-line").count(), 2);
    }
}
