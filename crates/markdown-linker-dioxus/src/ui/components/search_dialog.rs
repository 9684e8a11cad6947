use dioxus::events::Key;
use dioxus::prelude::*;
use markdown_linker_engine::TargetKind;
use markdown_linker_engine::workspace::SearchCandidate;

/// Search popup seeded by a non-lucky link
#[component]
pub fn SearchDialog(
    kind: TargetKind,
    query: String,
    candidates: Vec<SearchCandidate>,
    on_query: Callback<String>,
    on_select: Callback<SearchCandidate>,
    on_close: Callback<()>,
) -> Element {
    let title = kind.action_text();
    let first = candidates.first().cloned();

    rsx! {
        div {
            class: "modal-backdrop",
            onclick: move |_| on_close.call(()),
            div {
                class: "modal search-dialog",
                onclick: move |evt: MouseEvent| evt.stop_propagation(),
                h2 { "{title}" }
                input {
                    r#type: "text",
                    class: "search-input",
                    value: "{query}",
                    autofocus: true,
                    placeholder: "Type to filter",
                    oninput: move |evt: FormEvent| on_query.call(evt.value()),
                    onkeydown: move |evt: KeyboardEvent| match evt.key() {
                        Key::Escape => on_close.call(()),
                        Key::Enter => {
                            if let Some(candidate) = first.clone() {
                                on_select.call(candidate);
                            }
                        }
                        _ => {}
                    },
                }
                if candidates.is_empty() {
                    p { class: "no-results", "Nothing found" }
                }
                ul {
                    class: "candidates",
                    for (index, candidate) in candidates.into_iter().enumerate() {
                        li {
                            key: "{index}",
                            class: "candidate",
                            onclick: {
                                let candidate = candidate.clone();
                                move |_| on_select.call(candidate.clone())
                            },
                            span { class: "candidate-label", "{candidate.label}" }
                            span { class: "candidate-detail", "{candidate.detail}" }
                            span { class: "candidate-kind", "{candidate.kind}" }
                        }
                    }
                }
            }
        }
    }
}
