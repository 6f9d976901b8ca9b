use std::fmt::Write as _;

use crate::{
    card::{color::Color, fields::CardContent},
    foundation::core::{Bounds, Canvas},
    render::cpu::CardLayout,
};

/// A styled span of rules text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Run {
    pub text: String,
    pub italic: bool,
    pub bold: bool,
}

/// Split one line of rules text into styled runs.
///
/// `{i}`/`{/i}` and `{bold}`/`{/bold}` toggle styles; any other `{…}` token is kept as text.
pub(crate) fn parse_markup(line: &str) -> Vec<Run> {
    let mut runs = Vec::new();
    let (mut italic, mut bold) = (false, false);
    let mut buf = String::new();
    let mut rest = line;

    while let Some(open) = rest.find('{') {
        buf.push_str(&rest[..open]);
        let Some(close) = rest[open..].find('}') else {
            buf.push_str(&rest[open..]);
            rest = "";
            break;
        };
        let tag = &rest[open + 1..open + close];
        let toggled = match tag {
            "i" => Some((true, bold)),
            "/i" => Some((false, bold)),
            "bold" => Some((italic, true)),
            "/bold" => Some((italic, false)),
            _ => None,
        };
        match toggled {
            Some((i, b)) => {
                if !buf.is_empty() {
                    runs.push(Run {
                        text: std::mem::take(&mut buf),
                        italic,
                        bold,
                    });
                }
                italic = i;
                bold = b;
            }
            None => buf.push_str(&rest[open..=open + close]),
        }
        rest = &rest[open + close + 1..];
    }
    buf.push_str(rest);
    if !buf.is_empty() {
        runs.push(Run { text: buf, italic, bold });
    }
    runs
}

/// Greedy word wrap over styled runs using an estimated character budget per line.
pub(crate) fn wrap_runs(runs: &[Run], max_chars: usize) -> Vec<Vec<Run>> {
    let max_chars = max_chars.max(1);
    let mut lines: Vec<Vec<Run>> = Vec::new();
    let mut current: Vec<Run> = Vec::new();
    let mut width = 0usize;

    for run in runs {
        for word in run.text.split_whitespace() {
            let len = word.chars().count();
            if width > 0 && width + 1 + len > max_chars {
                lines.push(std::mem::take(&mut current));
                width = 0;
            }
            let text = if width > 0 {
                format!(" {word}")
            } else {
                word.to_string()
            };
            width += text.chars().count();
            current.push(Run {
                text,
                italic: run.italic,
                bold: run.bold,
            });
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

pub(crate) fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn rgb_hex([r, g, b]: [u8; 3]) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

fn single_line(
    out: &mut String,
    text: &str,
    bounds: Bounds,
    size_frac: f32,
    anchor: &str,
    fill: &str,
    canvas: Canvas,
) {
    if text.is_empty() {
        return;
    }
    let (x, y, w, h) = bounds.to_pixels(canvas);
    let fs = size_frac * canvas.height as f32;
    let tx = if anchor == "end" { x + w } else { x };
    let ty = y + (h + fs * 0.7) / 2.0;
    let _ = writeln!(
        out,
        r#"<text x="{tx:.2}" y="{ty:.2}" font-size="{fs:.2}" text-anchor="{anchor}" fill="{fill}">{}</text>"#,
        xml_escape(text)
    );
}

fn mana_pips(out: &mut String, symbols: &[char], bounds: Bounds, canvas: Canvas) {
    let (x, y, w, h) = bounds.to_pixels(canvas);
    let r = h / 2.0;
    let step = h * 1.1;
    let mut cx = x + w - r;
    for sym in symbols.iter().rev() {
        if cx - r < x {
            break;
        }
        let fill = Color::from_symbol(*sym)
            .map(Color::pip_rgb)
            .unwrap_or([204, 194, 192]);
        let _ = writeln!(
            out,
            r##"<circle cx="{cx:.2}" cy="{:.2}" r="{r:.2}" fill="{}" stroke="#000000" stroke-width="{:.2}"/>"##,
            y + r,
            rgb_hex(fill),
            (r * 0.08).max(0.5)
        );
        let _ = writeln!(
            out,
            r##"<text x="{cx:.2}" y="{:.2}" font-size="{:.2}" font-weight="bold" text-anchor="middle" fill="#000000">{}</text>"##,
            y + r + r * 0.45,
            r * 1.3,
            xml_escape(&sym.to_string())
        );
        cx -= step;
    }
}

fn rules_block(out: &mut String, text: &str, layout: &CardLayout, canvas: Canvas) {
    if text.is_empty() {
        return;
    }
    let (x, y, w, h) = layout.rules.to_pixels(canvas);
    let fs = layout.rules_size * canvas.height as f32;
    let line_h = fs * 1.25;
    let max_chars = (w / (fs * 0.5)).floor() as usize;
    let fill = xml_escape(&layout.text_color);

    let mut baseline = y + fs;
    for paragraph in text.split('\n') {
        for line in wrap_runs(&parse_markup(paragraph), max_chars) {
            if baseline > y + h {
                return;
            }
            let _ = write!(
                out,
                r#"<text x="{x:.2}" y="{baseline:.2}" font-size="{fs:.2}" fill="{fill}">"#
            );
            for run in line {
                let style = if run.italic { "italic" } else { "normal" };
                let weight = if run.bold { "bold" } else { "normal" };
                let _ = write!(
                    out,
                    r#"<tspan font-style="{style}" font-weight="{weight}">{}</tspan>"#,
                    xml_escape(&run.text)
                );
            }
            out.push_str("</text>\n");
            baseline += line_h;
        }
        baseline += fs * 0.35;
    }
}

/// SVG document holding every text element of the card.
pub(crate) fn text_layer_svg(content: &CardContent, layout: &CardLayout, canvas: Canvas) -> String {
    let fill = xml_escape(&layout.text_color);
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" font-family="{}">"#,
        canvas.width,
        canvas.height,
        xml_escape(&layout.font_family)
    );
    single_line(
        &mut out,
        &content.title,
        layout.title,
        layout.title_size,
        "start",
        &fill,
        canvas,
    );
    mana_pips(&mut out, &content.mana_symbols, layout.mana, canvas);
    single_line(
        &mut out,
        &content.type_line,
        layout.type_line,
        layout.type_size,
        "start",
        &fill,
        canvas,
    );
    rules_block(&mut out, &content.rules_text, layout, canvas);
    single_line(
        &mut out,
        &content.power_toughness,
        layout.power_toughness,
        layout.title_size,
        "end",
        &fill,
        canvas,
    );
    out.push_str("</svg>\n");
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
