//! `{placeholder}` description templates.
//!
//! `{key}` is replaced by the looked-up value; `{{` and `}}` produce
//! literal braces.

use crate::error::TemplateError;

/// Render `template`, resolving each `{key}` through `lookup`.
pub fn render<F>(template: &str, lookup: F) -> Result<String, TemplateError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        match ch {
            '{' if chars.peek().is_some_and(|(_, next)| *next == '{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek().is_some_and(|(_, next)| *next == '}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut key = String::new();
                let mut closed = false;
                for (_, inner) in chars.by_ref() {
                    if inner == '}' {
                        closed = true;
                        break;
                    }
                    key.push(inner);
                }
                if !closed || key.contains('{') {
                    return Err(TemplateError::UnmatchedBrace { position: pos });
                }
                let value = lookup(key.trim())
                    .ok_or_else(|| TemplateError::UnknownKey { key: key.clone() })?;
                out.push_str(&value);
            }
            '}' => return Err(TemplateError::UnmatchedBrace { position: pos }),
            other => out.push(other),
        }
    }

    Ok(out)
}
