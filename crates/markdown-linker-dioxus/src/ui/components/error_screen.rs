use dioxus::prelude::*;

/// Full-window error shown when the workspace cannot be opened at all
#[component]
pub fn ErrorScreen(title: String, message: String, details: Option<String>) -> Element {
    rsx! {
        div {
            class: "error-screen",
            h1 { "{title}" }
            p { "{message}" }
            if let Some(details) = details {
                pre { class: "error-details", "{details}" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dioxus::dioxus_core::VirtualDom;
    use dioxus_ssr::render;

    #[test]
    fn test_error_screen_with_details() {
        let mut dom = VirtualDom::new_with_props(
            ErrorScreen,
            ErrorScreenProps {
                title: "Could not open workspace".to_string(),
                message: "Invalid workspace: directory does not exist".to_string(),
                details: Some("/missing/project".to_string()),
            },
        );
        dom.rebuild_in_place();
        let html = render(&dom);

        assert!(html.contains("Could not open workspace"));
        assert!(html.contains("directory does not exist"));
        assert!(html.contains("/missing/project"));
    }

    #[test]
    fn test_error_screen_without_details() {
        let mut dom = VirtualDom::new_with_props(
            ErrorScreen,
            ErrorScreenProps {
                title: "Could not open workspace".to_string(),
                message: "Invalid link scheme".to_string(),
                details: None,
            },
        );
        dom.rebuild_in_place();

        assert!(!render(&dom).contains("error-details"));
    }
}
