//! ASCII-art rendering of element trees.
//!
//! Every element becomes a box with its debug name in the top border.
//! Children of a horizontal stack sit side by side; everything else stacks
//! its children top to bottom.
//!
//! ```text
//! ---StackLayoutSpec---
//! | ---a---  ---b---  |
//! | |     |  |     |  |
//! | -------  -------  |
//! ---------------------
//! ```

use super::element::LayoutElement;

pub(crate) fn render(element: &LayoutElement) -> String {
    lines(element).join("\n")
}

fn lines(element: &LayoutElement) -> Vec<String> {
    let children: Vec<Vec<String>> = element.children().into_iter().map(lines).collect();
    let body = match element {
        LayoutElement::Stack(spec) if spec.direction().is_horizontal() => side_by_side(children),
        _ => children.concat(),
    };
    boxed(&element.debug_name(), body)
}

fn width(line: &str) -> usize {
    line.chars().count()
}

fn boxed(name: &str, body: Vec<String>) -> Vec<String> {
    let inner = body
        .iter()
        .map(|line| width(line))
        .max()
        .unwrap_or(0)
        .max(width(name) + 2);
    let outer = inner + 4;
    let dashes = outer - width(name);
    let left = dashes / 2;

    let mut out = Vec::with_capacity(body.len() + 2);
    out.push(format!("{}{name}{}", "-".repeat(left), "-".repeat(dashes - left)));
    if body.is_empty() {
        out.push(format!("|{}|", " ".repeat(outer - 2)));
    }
    for line in body {
        out.push(format!("| {line:<inner$} |"));
    }
    out.push("-".repeat(outer));
    out
}

fn side_by_side(blocks: Vec<Vec<String>>) -> Vec<String> {
    let height = blocks.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = blocks
        .iter()
        .map(|block| block.first().map(|line| width(line)).unwrap_or(0))
        .collect();

    (0..height)
        .map(|row| {
            blocks
                .iter()
                .zip(&widths)
                .map(|(block, &w)| match block.get(row) {
                    Some(line) => format!("{line:<w$}"),
                    None => " ".repeat(w),
                })
                .collect::<Vec<_>>()
                .join("  ")
        })
        .collect()
}
