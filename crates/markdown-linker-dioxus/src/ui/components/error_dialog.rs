use dioxus::prelude::*;

/// Modal for router diagnostics such as an unrecognized link target
#[component]
pub fn ErrorDialog(title: String, message: String, on_close: Callback<()>) -> Element {
    rsx! {
        div {
            class: "modal-backdrop",
            div {
                class: "modal error-dialog",
                role: "alertdialog",
                h2 { "{title}" }
                pre { class: "error-message", "{message}" }
                button {
                    class: "dialog-button",
                    onclick: move |_| on_close.call(()),
                    "OK"
                }
            }
        }
    }
}
