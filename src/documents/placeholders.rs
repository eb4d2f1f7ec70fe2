// src/documents/placeholders.rs
//
// Word stores text in runs (<w:r><w:t>..</w:t></w:r>) and freely splits a
// typed "{{case_number}}" over several of them. These passes turn the XML
// back into something Handlebars can read.

use crate::errors::AttestError;

enum Segment<'a> {
    Tag(&'a str),
    Text(&'a str),
}

fn segments(xml: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut rest = xml;

    while !rest.is_empty() {
        if rest.starts_with('<') {
            let end = rest.find('>').map(|i| i + 1).unwrap_or(rest.len());
            out.push(Segment::Tag(&rest[..end]));
            rest = &rest[end..];
        } else {
            let end = rest.find('<').unwrap_or(rest.len());
            out.push(Segment::Text(&rest[..end]));
            rest = &rest[end..];
        }
    }

    out
}

/// Removes the markup between the opening `{{` and closing `}}` of every
/// tag so the tag reads as one piece of text inside the first run.
pub fn join_split_tags(xml: &str) -> String {
    let segs = segments(xml);

    // Every text character with the index of the segment holding it.
    let chars: Vec<(usize, char)> = segs
        .iter()
        .enumerate()
        .filter_map(|(i, s)| match s {
            Segment::Text(t) => Some(t.chars().map(move |c| (i, c))),
            Segment::Tag(_) => None,
        })
        .flatten()
        .collect();

    let mut dropped = vec![false; segs.len()];
    let mut i = 0;
    while i + 1 < chars.len() {
        if chars[i].1 != '{' || chars[i + 1].1 != '{' {
            i += 1;
            continue;
        }

        let mut j = i + 2;
        while j + 1 < chars.len() && !(chars[j].1 == '}' && chars[j + 1].1 == '}') {
            j += 1;
        }
        if j + 1 >= chars.len() {
            break;
        }

        let (first, last) = (chars[i].0, chars[j + 1].0);
        for (k, seg) in segs.iter().enumerate().take(last).skip(first + 1) {
            if let Segment::Tag(_) = seg {
                dropped[k] = true;
            }
        }
        i = j + 2;
    }

    segs.iter()
        .zip(dropped)
        .filter(|(_, dropped)| !dropped)
        .map(|(seg, _)| match seg {
            Segment::Tag(s) | Segment::Text(s) => *s,
        })
        .collect()
}

/// Inside tags, Word's escaped and typographic quotes become plain ones.
pub fn unescape_tag_bodies(xml: &str) -> String {
    let mut out = String::with_capacity(xml.len());
    let mut rest = xml;

    while let Some(start) = rest.find("{{") {
        let Some(len) = rest[start..].find("}}") else {
            break;
        };
        let end = start + len + 2;
        out.push_str(&rest[..start]);
        out.push_str(
            &rest[start..end]
                .replace("&quot;", "\"")
                .replace("&apos;", "'")
                .replace("&amp;", "&")
                .replace("&lt;", "<")
                .replace("&gt;", ">")
                .replace(&['\u{201C}', '\u{201D}'][..], "\"")
                .replace(&['\u{2018}', '\u{2019}'][..], "'"),
        );
        rest = &rest[end..];
    }

    out.push_str(rest);
    out
}

/// Replaces the whole table row or paragraph around `{{tr ...}}` and
/// `{{p ...}}` with the bare block tag, so `{{tr #each address_history}}`
/// in one row and `{{tr /each}}` in another repeat the rows in between.
pub fn hoist_block_tags(xml: &str) -> Result<String, AttestError> {
    let mut xml = xml.to_string();

    for element in ["tr", "p"] {
        let marker = format!("{{{{{element} ");
        let open = format!("<w:{element}");
        let close = format!("</w:{element}>");

        while let Some(pos) = xml.find(&marker) {
            let start = find_element_start(&xml[..pos], &open).ok_or_else(|| {
                AttestError::RenderIncompatibility(format!(
                    "{marker}...}}}} is not inside a <w:{element}> element"
                ))
            })?;
            let end = xml[pos..]
                .find(&close)
                .map(|i| pos + i + close.len())
                .ok_or_else(|| {
                    AttestError::RenderIncompatibility(format!("unterminated <w:{element}>"))
                })?;
            let body_end = xml[pos..]
                .find("}}")
                .map(|i| pos + i)
                .filter(|&i| i < end)
                .ok_or_else(|| {
                    AttestError::RenderIncompatibility(format!("unterminated {marker}...}}}} tag"))
                })?;

            let inner = xml[pos + marker.len()..body_end].trim().to_string();
            xml.replace_range(start..end, &format!("{{{{{inner}}}}}"));
        }
    }

    Ok(xml)
}

/// Last `<w:tr>` / `<w:tr ...>` opening before the end of `head`; skips
/// look-alikes such as `<w:trPr>`.
fn find_element_start(head: &str, open: &str) -> Option<usize> {
    let mut search = head;
    while let Some(idx) = search.rfind(open) {
        match head[idx + open.len()..].chars().next() {
            Some('>') | Some(' ') => return Some(idx),
            _ => search = &head[..idx],
        }
    }
    None
}
