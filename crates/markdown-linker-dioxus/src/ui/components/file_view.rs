use crate::ui::markdown::render_source_lines;
use crate::ui::state::OpenedFile;
use dioxus::prelude::*;

/// A file opened by a link, scrolled to and highlighting the target line
#[component]
pub fn FileView(file: OpenedFile, on_back: Callback<()>) -> Element {
    let line = file.position.map(|position| position.line);
    let path = file.path.clone();

    use_effect(use_reactive((&line, &path), |(line, _path)| {
        if let Some(line) = line {
            document::eval(&format!(
                "document.getElementById('line-{line}')?.scrollIntoView({{block: 'center'}})"
            ));
        }
    }));

    let location = match file.position {
        Some(position) => format!("{}:{}", file.display_path, position.line + 1),
        None => file.display_path.clone(),
    };

    let body = match file.content {
        Ok(content) => rsx! {
            pre {
                class: "source",
                dangerous_inner_html: render_source_lines(&content, line),
            }
        },
        Err(error) => rsx! {
            p { class: "load-error", "Could not read file: {error}" }
        },
    };

    rsx! {
        div {
            class: "file-view",
            div {
                class: "file-header",
                button {
                    class: "back-button",
                    onclick: move |_| on_back.call(()),
                    "← Preview"
                }
                span { class: "file-location", "{location}" }
            }
            {body}
        }
    }
}
