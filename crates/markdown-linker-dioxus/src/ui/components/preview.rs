use dioxus::prelude::*;

/// The rendered Markdown document; the link interceptor listens on the whole page
#[component]
pub fn Preview(html: String) -> Element {
    rsx! {
        article {
            class: "markdown-preview",
            dangerous_inner_html: "{html}",
        }
    }
}
