//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod render;

pub(crate) use build::BuildArgs;
pub(crate) use render::RenderArgs;

use demodoc_config::Config;
use demodoc_renderer::{
    AnchorOptions, ClassContainer, DemoBlockRule, Markdown, MarkdownConfig, highlight,
    render_fence, render_raw_fence,
};

/// Build the markdown engine described by the configuration.
pub(crate) fn markdown_from_config(config: &Config) -> Markdown {
    let mut md = MarkdownConfig::default().with_gfm(config.render.gfm);

    if let Some(class) = config.table_class() {
        md = md.with_table_class(class);
    }

    if config.anchors.enabled {
        md = md.with_anchors(AnchorOptions {
            level: config.anchors.level,
            permalink: config.anchors.permalink,
            permalink_before: config.anchors.permalink_before,
            permalink_symbol: config.anchors.permalink_symbol.clone(),
            ..AnchorOptions::default()
        });
    }

    md = match (config.render.raw_fences, config.render.highlight) {
        (true, true) => md.with_fence_renderer(highlight(render_raw_fence)),
        (true, false) => md.with_fence_renderer(render_raw_fence),
        (false, true) => md.with_fence_renderer(highlight(render_fence)),
        (false, false) => md,
    };

    md = md.with_container(
        DemoBlockRule::new()
            .with_element(config.demo.element.as_str())
            .with_class(config.demo.class.as_str())
            .with_payload_attr(config.demo.payload_attr.as_str()),
    );
    for class in &config.containers.classes {
        md = md.with_container(ClassContainer::new(class.as_str()));
    }

    Markdown::new(md)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config_matches_preset() {
        let source = "## Usage\n\n| a |\n|---|\n| 1 |\n\n\
                      ::: demo Click\n```html\n<button>OK</button>\n```\n:::\n\n\
                      ::: warning\nCareful\n:::\n";
        let from_config = markdown_from_config(&Config::default()).render(source);
        let preset = Markdown::new(MarkdownConfig::demo_docs()).render(source);
        assert_eq!(from_config, preset);
    }

    #[test]
    fn test_plain_fences_without_anchors() {
        let mut config = Config::default();
        config.render.raw_fences = false;
        config.render.highlight = false;
        config.anchors.enabled = false;
        let md = markdown_from_config(&config);
        let result = md.render("## Title\n\n```js\nx\n```\n");
        assert_eq!(
            result.html,
            "<h2>Title</h2>\n<pre><code class=\"language-js\">x\n</code></pre>\n"
        );
    }

    #[test]
    fn test_raw_fences_without_highlight() {
        let mut config = Config::default();
        config.render.highlight = false;
        let md = markdown_from_config(&config);
        let result = md.render("```html\n<b></b>\n```\n");
        assert!(result.html.starts_with("<pre v-pre><code v-pre class=\"language-html\">"));
    }

    #[test]
    fn test_custom_demo_element_and_containers() {
        let mut config = Config::default();
        config.demo.element = "live-demo".to_owned();
        config.containers.classes = vec!["danger".to_owned()];
        let md = markdown_from_config(&config);
        let result = md.render("::: demo\n<i>x</i>\n:::\n\n::: danger\nNo\n:::\n\n::: tip\nYes\n:::\n");
        assert!(result.html.starts_with("<live-demo class=\"demo-box\" :jsfiddle=\""));
        assert!(result.html.contains("</div></live-demo>\n"));
        assert!(result.html.contains("<div class=\"danger\">\n<p>No</p>\n</div>\n"));
        assert!(result.html.contains("<p>::: tip\nYes\n:::</p>"));
    }

    #[test]
    fn test_table_class_disabled() {
        let mut config = Config::default();
        config.render.table_class = String::new();
        let md = markdown_from_config(&config);
        let result = md.render("| a |\n|---|\n| 1 |\n");
        assert!(result.html.starts_with("<table><thead>"));
    }
}
