// ABOUTME: Stylesheet and standalone page generation for the console's two panes

use crate::config::{BoxStyle, ReplConfig, ReplMode};
use crate::transcript::{escape_html, OutputPane};
use std::fmt::Write;

fn push_property(css: &mut String, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        let _ = writeln!(css, " {name}: {value};");
    }
}

/// Margin and padding, then the two sizes in the order the pane lists them
fn push_box(css: &mut String, style: &BoxStyle, sizes: [&str; 2]) {
    push_property(css, "margin", style.margin.as_deref());
    push_property(css, "padding", style.padding.as_deref());
    for size in sizes {
        let value = match size {
            "width" => style.width.as_deref(),
            _ => style.height.as_deref(),
        };
        push_property(css, size, value);
    }
}

fn push_border(css: &mut String, style: &BoxStyle) {
    push_property(css, "border-width", style.border_width.as_deref());
    push_property(css, "border-color", style.border_color.as_deref());
    push_property(css, "border-style", style.border_style.as_deref());
    push_property(css, "text-align", style.text_align.as_deref());
    push_property(css, "overflow", style.overflow.as_deref());
}

/// CSS for `#<output id>` and `#<input id>`. The output pane starts with the closed background.
pub fn stylesheet(config: &ReplConfig) -> String {
    let style = &config.style;
    let mut css = String::new();

    let _ = writeln!(css, "#{} {{", config.output_element_id);
    push_box(&mut css, &style.output, ["height", "width"]);
    push_property(&mut css, "color", Some(style.send_color.as_str()));
    push_property(&mut css, "background-color", Some(style.closed_background.as_str()));
    push_border(&mut css, &style.output);
    css.push_str("}\n");

    let _ = writeln!(css, "#{} {{", config.input_element_id);
    push_box(&mut css, &style.input, ["width", "height"]);
    push_border(&mut css, &style.input);
    css.push('}');

    css
}

/// A self-contained HTML document showing the pane as last rendered
pub fn page(config: &ReplConfig, pane: &OutputPane) -> String {
    let mut html = String::from("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(
        html,
        "<title>{} / {}</title>",
        escape_html(&config.experiment_namespace),
        escape_html(&config.experiment_id)
    );
    let _ = writeln!(html, "<style type=\"text/css\">\n{}\n</style>", stylesheet(config));
    html.push_str("</head>\n<body>\n<div id=\"repl\">\n");
    let _ = writeln!(
        html,
        "<pre id=\"{}\" style=\"background-color:{}\">{}</pre>",
        escape_html(&config.output_element_id),
        escape_html(&pane.background),
        pane.markup
    );
    if config.mode == ReplMode::FullDuplex {
        let _ = writeln!(
            html,
            "<input id=\"{}\" type=\"text\" autofocus=\"autofocus\" tabindex=\"1\">",
            escape_html(&config.input_element_id)
        );
    }
    html.push_str("</div>\n</body>\n</html>\n");
    html
}
