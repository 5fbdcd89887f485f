//! Escaping of label names and values for CrateDB SQL
//!
//! Label names become quoted identifiers carrying [`LABEL_COLUMN_PREFIX`], so
//! no label can collide with a fixed column. Label values become quoted string
//! literals. Both escape backslashes and both quote characters.

/// Marker put in front of every label column name
pub const LABEL_COLUMN_PREFIX: char = 'l';

fn escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\'"),
            c => out.push(c),
        }
    }
}

/// Quoted column identifier for a label name
pub fn escape_label_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 3);
    out.push('"');
    out.push(LABEL_COLUMN_PREFIX);
    escape_into(&mut out, name);
    out.push('"');
    out
}

/// Quoted string literal for a label value or pattern
pub fn escape_label_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    escape_into(&mut out, value);
    out.push('\'');
    out
}
