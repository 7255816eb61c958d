use askama::Template;

/// Presentational dialog partial. Holds no state of its own; the embedding
/// page decides `open` and supplies the content.
#[derive(Template)]
#[template(path = "dialog.html")]
pub struct Dialog<'a> {
    pub open: bool,
    pub title: &'a str,
    pub body: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_dialog_renders_title_and_body() {
        let html = Dialog {
            open: true,
            title: "Keyboard shortcuts",
            body: "Press s to start a focus session.",
        }
        .render()
        .unwrap();
        assert!(html.contains("Keyboard shortcuts"));
        assert!(html.contains("Press s to start a focus session."));
        assert!(!html.contains("hidden"));
    }

    #[test]
    fn closed_dialog_stays_hidden() {
        let html = Dialog {
            open: false,
            title: "Keyboard shortcuts",
            body: "Press s to start a focus session.",
        }
        .render()
        .unwrap();
        assert!(html.contains("hidden"));
    }

    #[test]
    fn content_is_escaped() {
        let html = Dialog {
            open: true,
            title: "<script>alert(1)</script>",
            body: "",
        }
        .render()
        .unwrap();
        assert!(!html.contains("<script>"));
    }
}
