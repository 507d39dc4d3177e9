//! CPE 2.3 name parser.
//!
//! Only syntax is checked. Two bindings are accepted:
//! - formatted string: `cpe:2.3:` followed by eleven `:`-separated attributes
//!   (part, vendor, product, version, update, edition, language, sw_edition,
//!   target_sw, target_hw, other)
//! - URI: `cpe:/` followed by up to seven components (part, vendor, product,
//!   version, update, edition, language), trailing ones optional

use crate::shared::error::SbomError;
use crate::shared::Result;
use std::fmt;
use std::str::FromStr;

const PREFIX: &str = "cpe:2.3:";
const URI_PREFIX: &str = "cpe:/";
const ATTRIBUTE_COUNT: usize = 11;
const URI_COMPONENT_COUNT: usize = 7;
const LANGUAGE_INDEX: usize = 6;

/// Punctuation that may appear in an attribute only when backslash-escaped.
const ESCAPABLE: &str = "\\*?!\"#$%&'()+,/:;<=>@[]^`{|}~";

/// A syntactically valid CPE 2.3 name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cpe {
    raw: String,
}

impl Cpe {
    /// Parses a CPE 2.3 formatted string or URI binding
    ///
    /// # Errors
    /// Returns [`SbomError::InvalidCpe`] describing the first violation found.
    pub fn parse(value: &str) -> Result<Self> {
        let checked = if let Some(body) = value.strip_prefix(PREFIX) {
            check_formatted_string(body)
        } else if let Some(body) = value.strip_prefix(URI_PREFIX) {
            check_uri(body)
        } else {
            Err(format!(
                "'{}' starts with neither '{}' nor '{}'",
                value, PREFIX, URI_PREFIX
            ))
        };

        checked
            .map(|()| Self {
                raw: value.to_string(),
            })
            .map_err(|details| {
                SbomError::InvalidCpe {
                    cpe: value.to_string(),
                    details,
                }
                .into()
            })
    }
}

impl FromStr for Cpe {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Cpe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn check_formatted_string(body: &str) -> std::result::Result<(), String> {
    let attributes = split_unescaped(body)?;
    if attributes.len() != ATTRIBUTE_COUNT {
        return Err(format!(
            "expected {} attributes after '{}', found {}",
            ATTRIBUTE_COUNT,
            PREFIX,
            attributes.len()
        ));
    }

    if !matches!(attributes[0].as_str(), "a" | "o" | "h" | "*" | "-") {
        return Err(format!(
            "part '{}' must be one of 'a', 'o', 'h', '*' or '-'",
            attributes[0]
        ));
    }

    for (index, attribute) in attributes.iter().enumerate().skip(1) {
        let valid = if index == LANGUAGE_INDEX {
            is_valid_language(attribute, "\\-")
        } else {
            is_valid_attribute(attribute)
        };
        if !valid {
            return Err(format!(
                "attribute {} ('{}') is not a valid CPE 2.3 value",
                index + 1,
                attribute
            ));
        }
    }

    Ok(())
}

fn check_uri(body: &str) -> std::result::Result<(), String> {
    if body.is_empty() {
        return Err(format!("no components after '{}'", URI_PREFIX));
    }

    let components: Vec<&str> = body.split(':').collect();
    if components.len() > URI_COMPONENT_COUNT {
        return Err(format!(
            "expected at most {} components after '{}', found {}",
            URI_COMPONENT_COUNT,
            URI_PREFIX,
            components.len()
        ));
    }

    if !matches!(components[0], "" | "a" | "o" | "h") {
        return Err(format!(
            "part '{}' must be one of 'a', 'o' or 'h'",
            components[0]
        ));
    }

    for (index, component) in components.iter().enumerate().skip(1) {
        let valid = if index == LANGUAGE_INDEX && !component.is_empty() {
            is_valid_language(component, "-")
        } else {
            is_valid_uri_component(component)
        };
        if !valid {
            return Err(format!(
                "component {} ('{}') is not a valid CPE URI value",
                index + 1,
                component
            ));
        }
    }

    Ok(())
}

/// Unreserved URI characters plus `%XX` escapes; empty means "any"
fn is_valid_uri_component(component: &str) -> bool {
    let bytes = component.as_bytes();
    let mut position = 0;
    while position < bytes.len() {
        match bytes[position] {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => position += 1,
            b'%' => {
                let escape = bytes.get(position + 1..position + 3);
                if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
                    return false;
                }
                position += 3;
            }
            _ => return false,
        }
    }
    true
}

/// Splits on `:` that is not preceded by a backslash escape.
fn split_unescaped(body: &str) -> std::result::Result<Vec<String>, String> {
    let mut attributes = Vec::new();
    let mut current = String::new();
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let escaped = chars
                    .next()
                    .ok_or_else(|| "dangling escape at end of CPE".to_string())?;
                current.push(c);
                current.push(escaped);
            }
            ':' => attributes.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    attributes.push(current);

    Ok(attributes)
}

fn is_valid_attribute(attribute: &str) -> bool {
    if attribute == "*" || attribute == "-" {
        return true;
    }

    // Unquoted '?' may lead or trail, '*' at most once at either end.
    let leading = attribute
        .strip_prefix('*')
        .unwrap_or_else(|| attribute.trim_start_matches('?'));
    let body = leading
        .strip_suffix('*')
        .filter(|_| !leading.ends_with("\\*"))
        .unwrap_or_else(|| trim_unescaped_question_marks(leading));

    if body.is_empty() {
        return false;
    }

    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '.' | '_' => {}
            '\\' => match chars.next() {
                Some(escaped) if is_escapable(escaped) => {}
                _ => return false,
            },
            _ => return false,
        }
    }

    true
}

fn is_escapable(c: char) -> bool {
    ESCAPABLE.contains(c) || c == '-' || c == '.'
}

fn trim_unescaped_question_marks(value: &str) -> &str {
    let mut end = value.len();
    while value[..end].ends_with('?') && !value[..end].ends_with("\\?") {
        end -= 1;
    }
    &value[..end]
}

/// Language tags follow RFC 5646 in the restricted form `ll[-RR]` / `lll[-999]`.
///
/// `separator` is the hyphen as the binding spells it (`\-` when formatted).
fn is_valid_language(attribute: &str, separator: &str) -> bool {
    if attribute == "*" || attribute == "-" {
        return true;
    }

    let (language, region) = match attribute.split_once(separator) {
        Some((language, region)) => (language, Some(region)),
        None => (attribute, None),
    };

    let language_ok =
        (2..=3).contains(&language.len()) && language.chars().all(|c| c.is_ascii_alphabetic());
    let region_ok = region.map_or(true, |region| {
        (region.len() == 2 && region.chars().all(|c| c.is_ascii_alphabetic()))
            || (region.len() == 3 && region.chars().all(|c| c.is_ascii_digit()))
    });

    language_ok && region_ok
}
