//! Minimal SVG primitives for chart assembly.
//!
//! Charts are small enough that a handful of element structs with a
//! `to_svg()` method covers everything; there is no layout engine and
//! no external renderer.

use std::fmt::Write as _;

/// A filled rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: &'static str,
}

impl Rect {
    #[must_use]
    pub fn to_svg(&self) -> String {
        format!(
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"/>"#,
            self.x, self.y, self.width, self.height, self.fill
        )
    }
}

/// A straight line segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke: &'static str,
    pub stroke_width: f64,
}

impl Line {
    #[must_use]
    pub fn to_svg(&self) -> String {
        format!(
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{:.2}"/>"#,
            self.x1, self.y1, self.x2, self.y2, self.stroke, self.stroke_width
        )
    }
}

/// A polyline through a series of points.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub points: Vec<(f64, f64)>,
    pub stroke: &'static str,
    pub stroke_width: f64,
}

impl Polyline {
    #[must_use]
    pub fn to_svg(&self) -> String {
        let mut points = String::new();
        for (x, y) in &self.points {
            let _ = write!(points, "{x:.2},{y:.2} ");
        }
        format!(
            r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="{:.2}"/>"#,
            points.trim_end(),
            self.stroke,
            self.stroke_width
        )
    }
}

/// Horizontal anchor for text placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// A text label.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub x: f64,
    pub y: f64,
    pub content: String,
    pub size: f64,
    pub anchor: Anchor,
    pub fill: &'static str,
    /// Rotation in degrees around the anchor point, if any.
    pub rotate: Option<f64>,
}

impl Text {
    #[must_use]
    pub fn to_svg(&self) -> String {
        let transform = self.rotate.map_or_else(String::new, |deg| {
            format!(r#" transform="rotate({deg:.1} {:.2} {:.2})""#, self.x, self.y)
        });
        format!(
            r#"<text x="{:.2}" y="{:.2}" font-size="{:.1}" font-family="sans-serif" text-anchor="{}" fill="{}"{}>{}</text>"#,
            self.x,
            self.y,
            self.size,
            self.anchor.as_str(),
            self.fill,
            transform,
            escape(&self.content)
        )
    }
}

/// Escapes text content for embedding in SVG markup.
#[must_use]
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

/// Wraps rendered elements in an `<svg>` document of the given size.
#[must_use]
pub fn document(width: f64, height: f64, body: &str) -> String {
    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" "#,
            r#"width="{w}" height="{h}">{body}</svg>"#,
        ),
        w = width,
        h = height,
        body = body
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape(r#"O'Connor & "D<51>""#),
            "O&apos;Connor &amp; &quot;D&lt;51&gt;&quot;"
        );
    }

    #[test]
    fn text_rotation_emits_transform() {
        let text = Text {
            x: 10.0,
            y: 20.0,
            content: "Jul".to_owned(),
            size: 11.0,
            anchor: Anchor::End,
            fill: "#333",
            rotate: Some(-45.0),
        };
        let svg = text.to_svg();
        assert!(svg.contains("rotate(-45.0 10.00 20.00)"));
        assert!(svg.contains(r#"text-anchor="end""#));
    }

    #[test]
    fn document_wraps_body() {
        let svg = document(640.0, 480.0, "<rect/>");
        assert!(svg.starts_with("<svg "));
        assert!(svg.contains(r#"viewBox="0 0 640 480""#));
        assert!(svg.ends_with("<rect/></svg>"));
    }
}
