//! SVG export: converts `RenderCommand` lists into standalone SVG strings.

use std::fmt::Write;

use dawg_viz_protocol::{RenderCommand, TextAnchor, ThemeToken};

/// Render a list of commands as an SVG document string.
///
/// `width` and `height` define the SVG viewBox dimensions.
/// `dark` selects the color palette.
pub fn render_svg(commands: &[RenderCommand], width: f64, height: f64, dark: bool) -> String {
    let mut svg = String::with_capacity(commands.len() * 120);
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" style="font-family:system-ui,-apple-system,sans-serif">"#,
    );
    let _ = write!(
        svg,
        r#"<rect width="{width}" height="{height}" fill="{}"/>"#,
        resolve_color(ThemeToken::Background, dark),
    );

    for cmd in commands {
        match cmd {
            RenderCommand::DrawCircle {
                center,
                radius,
                fill,
                stroke,
                ..
            } => {
                let fill = resolve_color(*fill, dark);
                let stroke = stroke.map_or("none", |s| resolve_color(s, dark));
                let _ = write!(
                    svg,
                    r#"<circle cx="{}" cy="{}" r="{radius}" fill="{fill}" stroke="{stroke}"/>"#,
                    center.x, center.y,
                );
            }
            RenderCommand::DrawLine {
                from,
                to,
                color,
                width: line_width,
            } => {
                let stroke = resolve_color(*color, dark);
                let _ = write!(
                    svg,
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{stroke}" stroke-width="{line_width}"/>"#,
                    from.x, from.y, to.x, to.y,
                );
            }
            RenderCommand::DrawText {
                position,
                text,
                color,
                font_size,
                anchor,
            } => {
                let fill = resolve_color(*color, dark);
                let placement = match anchor {
                    TextAnchor::TopLeft => r#" dominant-baseline="hanging""#,
                    TextAnchor::Left => r#" dominant-baseline="middle""#,
                    TextAnchor::Center => r#" dominant-baseline="middle" text-anchor="middle""#,
                };
                let _ = write!(
                    svg,
                    r#"<text x="{}" y="{}" font-size="{font_size}" fill="{fill}"{placement}>{}</text>"#,
                    position.x,
                    position.y,
                    escape_xml(text),
                );
            }
            RenderCommand::PushTransform { translate, scale } => {
                let _ = write!(
                    svg,
                    r#"<g transform="matrix({} 0 0 {} {} {})">"#,
                    scale.x, scale.y, translate.x, translate.y,
                );
            }
            RenderCommand::PopTransform => svg.push_str("</g>"),
            // Groups carry no geometry.
            RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {}
        }
    }

    svg.push_str("</svg>");
    svg
}

fn resolve_color(token: ThemeToken, dark: bool) -> &'static str {
    if dark {
        match token {
            ThemeToken::NodeTerminal => "#f38ba8",
            ThemeToken::NodeInner => "#cdd6f4",
            ThemeToken::NodeStroke | ThemeToken::EdgeLine => "#6c7086",
            ThemeToken::LabelText => "#cdd6f4",
            ThemeToken::Background => "#1e1e2e",
            ThemeToken::HoverHighlight => "#89b4fa",
        }
    } else {
        match token {
            ThemeToken::NodeTerminal => "red",
            ThemeToken::NodeInner => "white",
            ThemeToken::NodeStroke | ThemeToken::EdgeLine | ThemeToken::LabelText => "black",
            ThemeToken::Background => "white",
            ThemeToken::HoverHighlight => "#ffd60a",
        }
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use dawg_viz_protocol::Point;

    #[test]
    fn terminal_marker_is_red_in_light_mode() {
        let commands = vec![RenderCommand::DrawCircle {
            center: Point::new(10.0, 20.0),
            radius: 10.0,
            fill: ThemeToken::NodeTerminal,
            stroke: Some(ThemeToken::NodeStroke),
            node_id: Some(1),
        }];
        let svg = render_svg(&commands, 800.0, 400.0, false);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(r#"<circle cx="10" cy="20" r="10" fill="red" stroke="black"/>"#));
    }

    #[test]
    fn transform_becomes_group() {
        let commands = vec![
            RenderCommand::PushTransform {
                translate: Point::new(5.0, 6.0),
                scale: Point::new(2.0, 2.0),
            },
            RenderCommand::PopTransform,
        ];
        let svg = render_svg(&commands, 10.0, 10.0, true);
        assert!(svg.contains(r#"<g transform="matrix(2 0 0 2 5 6)"></g>"#));
    }

    #[test]
    fn escapes_label_text() {
        let commands = vec![RenderCommand::DrawText {
            position: Point::new(0.0, 0.0),
            text: "<&>".into(),
            color: ThemeToken::LabelText,
            font_size: 14.0,
            anchor: TextAnchor::TopLeft,
        }];
        let svg = render_svg(&commands, 100.0, 100.0, false);
        assert!(svg.contains("&lt;&amp;&gt;</text>"));
        assert!(svg.contains(r#"dominant-baseline="hanging""#));
    }
}
