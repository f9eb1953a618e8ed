//! Plain class-wrapping containers (`::: tip`, `::: warning`).

use super::{ContainerEvent, ContainerRule};
use crate::Markdown;
use html_escape::encode_double_quoted_attribute;

/// Container rendered as `<div class="name">` around its markdown content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassContainer {
    name: String,
}

impl ClassContainer {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ContainerRule for ClassContainer {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&self, event: &ContainerEvent, _md: &Markdown) -> String {
        match event {
            ContainerEvent::Open { .. } => format!(
                "<div class=\"{}\">\n",
                encode_double_quoted_attribute(&self.name)
            ),
            ContainerEvent::Close => "</div>\n".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MarkdownConfig;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_open_and_close() {
        let md = Markdown::new(MarkdownConfig::default());
        let tip = ClassContainer::new("tip");
        let open = ContainerEvent::Open {
            info: "tip".to_owned(),
            body: String::new(),
        };
        assert_eq!(tip.render(&open, &md), "<div class=\"tip\">\n");
        assert_eq!(tip.render(&ContainerEvent::Close, &md), "</div>\n");
    }

    #[test]
    fn test_validate_first_word() {
        let tip = ClassContainer::new("tip");
        assert!(tip.validate("tip"));
        assert!(tip.validate("tip Be careful"));
        assert!(!tip.validate("tipster"));
        assert!(!tip.validate("warning"));
    }
}
