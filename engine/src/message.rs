use indexmap::IndexMap;

use crate::actor::Actor;

/// Placeholder values for one message, keyed without the leading `%`.
pub type TemplateData = IndexMap<String, String>;

pub trait MessageFormatter {
    fn format(&self, template: &str, actor: &Actor, data: &TemplateData) -> String;
}

/// Expands `%name` placeholders.
///
/// `%player` and `%caster` become the actor's name and `%she`, `%hisher`,
/// `%himher` (and capitalized forms) its pronouns. Anything else is looked
/// up in the data bag; unknown placeholders are left as written.
#[derive(Debug, Default, Clone, Copy)]
pub struct PercentFormatter;

impl MessageFormatter for PercentFormatter {
    fn format(&self, template: &str, actor: &Actor, data: &TemplateData) -> String {
        let mut out = String::with_capacity(template.len());
        let mut chars = template.char_indices().peekable();

        while let Some((_, c)) = chars.next() {
            if c != '%' {
                out.push(c);
                continue;
            }

            let mut key = String::new();
            while let Some(&(_, next)) = chars.peek() {
                if next.is_ascii_alphanumeric() || next == '_' {
                    key.push(next);
                    chars.next();
                } else {
                    break;
                }
            }

            match resolve(&key, actor, data) {
                Some(value) => out.push_str(&value),
                None => {
                    out.push('%');
                    out.push_str(&key);
                }
            }
        }

        out
    }
}

fn resolve(key: &str, actor: &Actor, data: &TemplateData) -> Option<String> {
    if let Some(value) = data.get(key) {
        return Some(value.clone());
    }
    let pronoun = match key.to_lowercase().as_str() {
        "player" | "caster" => return Some(actor.name.clone()),
        "she" | "he" => actor.gender.she(),
        "hisher" | "his" => actor.gender.hisher(),
        "himher" | "him" => actor.gender.himher(),
        _ => return None,
    };
    if key.starts_with(|c: char| c.is_ascii_uppercase()) {
        Some(capitalize(pronoun))
    } else {
        Some(pronoun.to_string())
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Group digits in threes: `-12345` → `-12,345`.
pub fn format_number(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, d) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(d);
    }
    if n < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
