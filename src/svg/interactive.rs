//! Event-level rewrite of a loaded vector document.
//!
//! - `<title>` and `<desc>` elements are dropped with their content
//! - the root `<svg>` gains class `interactive-svg` and `cursor: pointer`
//!
//! Everything else, including the prolog and comments, is written back as read.

use super::SvgError;
use quick_xml::{
    Reader, Writer,
    events::{BytesStart, Event},
};
use std::io::Cursor;

/// Class added to the root element.
pub const INTERACTIVE_CLASS: &str = "interactive-svg";

/// Rewrite `markup` into its interactive form.
pub fn make_interactive(markup: &str) -> Result<String, SvgError> {
    let mut reader = Reader::from_str(markup);
    let mut writer = Writer::new(Cursor::new(Vec::with_capacity(markup.len())));
    let mut seen_root = false;
    let mut skip_depth = 0usize;

    loop {
        let event = reader.read_event().map_err(|source| SvgError::Parse {
            position: reader.error_position(),
            source,
        })?;

        if skip_depth > 0 {
            match event {
                Event::Start(_) => skip_depth += 1,
                Event::End(_) => skip_depth -= 1,
                Event::Eof => break,
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(elem) if is_metadata(&elem) => skip_depth = 1,
            Event::Empty(elem) if is_metadata(&elem) => {}
            Event::Start(elem) if !seen_root => {
                seen_root = true;
                writer.write_event(Event::Start(mark_root(&elem)?))?;
            }
            Event::Empty(elem) if !seen_root => {
                seen_root = true;
                writer.write_event(Event::Empty(mark_root(&elem)?))?;
            }
            Event::Eof => break,
            event => writer.write_event(event)?,
        }
    }

    if !seen_root {
        return Err(SvgError::Empty);
    }

    Ok(String::from_utf8(writer.into_inner().into_inner())?)
}

fn is_metadata(elem: &BytesStart<'_>) -> bool {
    matches!(elem.local_name().as_ref(), b"title" | b"desc")
}

/// Copy the root element, adding the interactive class and pointer cursor.
fn mark_root(elem: &BytesStart<'_>) -> Result<BytesStart<'static>, SvgError> {
    let name = String::from_utf8_lossy(elem.name().as_ref()).into_owned();
    if elem.local_name().as_ref() != b"svg" {
        return Err(SvgError::NotSvg(name));
    }

    let mut root = BytesStart::new(name);
    let mut class = None;
    let mut style = None;

    for attr in elem.attributes() {
        let attr = attr.map_err(|e| SvgError::Attribute(e.to_string()))?;
        match attr.key.as_ref() {
            b"class" => class = Some(String::from_utf8_lossy(&attr.value).into_owned()),
            b"style" => style = Some(String::from_utf8_lossy(&attr.value).into_owned()),
            _ => root.push_attribute(attr),
        }
    }

    let class = add_class(class.as_deref().unwrap_or(""), INTERACTIVE_CLASS);
    let style = set_cursor(style.as_deref().unwrap_or(""));
    root.push_attribute((b"class".as_slice(), class.as_bytes()));
    root.push_attribute((b"style".as_slice(), style.as_bytes()));

    Ok(root)
}

/// Append `class` to a class list unless already present.
fn add_class(list: &str, class: &str) -> String {
    if list.split_ascii_whitespace().any(|c| c == class) {
        return list.trim().to_string();
    }
    let list = list.trim();
    if list.is_empty() {
        class.to_string()
    } else {
        format!("{list} {class}")
    }
}

/// Replace any `cursor` declaration with `cursor: pointer`. Other
/// declarations are kept as written.
fn set_cursor(style: &str) -> String {
    let mut decls: Vec<&str> = declarations(style)
        .filter(|d| {
            d.split(':')
                .next()
                .is_none_or(|prop| !prop.trim().eq_ignore_ascii_case("cursor"))
        })
        .collect();
    decls.push("cursor: pointer");
    decls.join("; ")
}

/// Top-level `;`-separated declarations, trimmed and non-empty. Separators
/// inside parentheses or quotes do not split.
fn declarations(style: &str) -> impl Iterator<Item = &str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote = None;
    let mut start = 0;

    for (i, c) in style.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                parts.push(&style[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&style[start..]);

    parts.into_iter().map(str::trim).filter(|d| !d.is_empty())
}
