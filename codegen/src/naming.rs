//! Rust identifiers for SQL names.
//!
//! SQL text in the generated module always keeps the original names; only
//! the Rust items built around them go through these conversions.

use std::collections::HashMap;

use sqlgen_core::Table;

use crate::error::{CodegenError, Result};

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

// Cannot be raw identifiers.
const PATH_KEYWORDS: &[&str] = &["self", "Self", "super", "crate"];

/// Returns `true` if `text` is a plain (non-raw) identifier.
pub(crate) fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }
    text != "_" && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Splits a name into lowercase words at separators and case changes.
///
/// `periodicTask`, `periodic_task` and `PeriodicTask` all split into
/// `["periodic", "task"]`; an upper-case run keeps together (`HTTPServer`
/// splits into `["http", "server"]`).
fn words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (index, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let previous = chars[index - 1];
            let next_is_lower = chars.get(index + 1).is_some_and(|n| n.is_lowercase());
            if previous.is_lowercase()
                || previous.is_numeric()
                || (previous.is_uppercase() && next_is_lower)
            {
                words.push(std::mem::take(&mut current));
            }
        }
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn guard_leading_digit(ident: String) -> String {
    match ident.chars().next() {
        Some(first) if first.is_alphabetic() => ident,
        _ => format!("_{ident}"),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `periodicTask` → `periodic_task`.
pub fn snake_case(name: &str) -> String {
    guard_leading_digit(words(name).join("_"))
}

/// `periodicTask` → `PeriodicTask`.
pub fn upper_camel_case(name: &str) -> String {
    guard_leading_digit(words(name).iter().map(|w| capitalize(w)).collect())
}

/// `periodicTask` → `PERIODIC_TASK`.
pub fn screaming_snake_case(name: &str) -> String {
    snake_case(name).to_uppercase()
}

/// snake_case name usable as a field or module name.
///
/// # Examples
///
/// ```
/// use sqlgen_codegen::naming::field_ident;
///
/// assert_eq!(field_ident("startAt"), "start_at");
/// assert_eq!(field_ident("type"), "r#type");
/// assert_eq!(field_ident("self"), "self_");
/// ```
pub fn field_ident(name: &str) -> String {
    let ident = snake_case(name);
    if PATH_KEYWORDS.contains(&ident.as_str()) {
        format!("{ident}_")
    } else if KEYWORDS.contains(&ident.as_str()) {
        format!("r#{ident}")
    } else {
        ident
    }
}

/// Fails when two schema names would generate the same Rust item.
///
/// Checked per generated namespace: table functions and modules, parameter
/// struct names, struct fields within one table, [`AllColumns`] variants across the schema, and
/// the `tables::ALL` constant.
///
/// [`AllColumns`]: crate#generated-items
pub(crate) fn check_collisions(tables: &[Table]) -> Result<()> {
    let mut table_idents = Seen::default();
    let mut type_idents = Seen::default();
    let mut variants = Seen::default();

    for table in tables {
        if screaming_snake_case(&table.name) == "ALL" {
            return Err(CodegenError::NameCollision {
                identifier: "ALL".to_string(),
                first: table.name.clone(),
                second: "tables::ALL".to_string(),
            });
        }
        table_idents.insert(snake_case(&table.name), &table.name)?;
        type_idents.insert(upper_camel_case(&table.name), &table.name)?;

        let mut fields = Seen::default();
        for column in &table.columns {
            let qualified = format!("{}.{}", table.name, column.name);
            fields.insert(field_ident(&column.name), &qualified)?;
            let variant = format!(
                "{}{}",
                upper_camel_case(&table.name),
                upper_camel_case(&column.name)
            );
            variants.insert(variant, &qualified)?;
        }
    }
    Ok(())
}

#[derive(Default)]
struct Seen(HashMap<String, String>);

impl Seen {
    fn insert(&mut self, identifier: String, source: &str) -> Result<()> {
        match self.0.get(&identifier) {
            Some(first) => Err(CodegenError::NameCollision {
                identifier,
                first: first.clone(),
                second: source.to_string(),
            }),
            None => {
                self.0.insert(identifier, source.to_string());
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use sqlgen_core::{Affinity, Column};

    use super::*;

    #[test]
    fn test_words_split_camel_and_snake() {
        assert_eq!(words("periodicTask"), ["periodic", "task"]);
        assert_eq!(words("periodic_task"), ["periodic", "task"]);
        assert_eq!(words("PeriodicTaskStatusChange").len(), 4);
        assert_eq!(words("HTTPServer"), ["http", "server"]);
        assert_eq!(words("task2Id"), ["task2", "id"]);
    }

    #[test]
    fn test_case_conversions() {
        assert_eq!(snake_case("periodicTaskId"), "periodic_task_id");
        assert_eq!(upper_camel_case("doneTask"), "DoneTask");
        assert_eq!(upper_camel_case("done_task"), "DoneTask");
        assert_eq!(screaming_snake_case("doneTask"), "DONE_TASK");
    }

    #[test]
    fn test_upper_camel_matches_capitalized_camel_case() {
        for name in ["periodicTask", "periodicTaskStatusChange", "doneTask"] {
            assert_eq!(upper_camel_case(name), capitalize(name));
        }
    }

    #[test]
    fn test_leading_digit_is_guarded() {
        assert_eq!(snake_case("1st"), "_1st");
        assert_eq!(upper_camel_case("2nd"), "_2nd");
    }

    #[test]
    fn test_field_ident_escapes_keywords() {
        assert_eq!(field_ident("match"), "r#match");
        assert_eq!(field_ident("Self"), "self_");
        assert_eq!(field_ident("crate"), "crate_");
        assert_eq!(field_ident("status"), "status");
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("sqlgen_runtime"));
        assert!(is_identifier("_private"));
        assert!(!is_identifier("_"));
        assert!(!is_identifier("9lives"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn test_collision_between_spellings_of_one_table() {
        let tables = vec![
            Table::new("doneTask").with_column(Column::new("id", Affinity::Integer, true, true, false)),
            Table::new("done_task").with_column(Column::new("id", Affinity::Integer, true, true, false)),
        ];
        match check_collisions(&tables) {
            Err(CodegenError::NameCollision {
                identifier,
                first,
                second,
            }) => {
                assert_eq!(identifier, "done_task");
                assert_eq!(first, "doneTask");
                assert_eq!(second, "done_task");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_collision_between_columns() {
        let tables = vec![
            Table::new("t")
                .with_column(Column::new("startAt", Affinity::Text, false, false, false))
                .with_column(Column::new("start_at", Affinity::Text, false, false, false)),
        ];
        assert!(check_collisions(&tables).is_err());
    }

    #[test]
    fn test_table_named_all_collides_with_table_list() {
        let tables =
            vec![Table::new("all").with_column(Column::new("id", Affinity::Integer, true, true, false))];
        assert!(check_collisions(&tables).is_err());
    }

    #[test]
    fn test_distinct_names_pass() {
        let tables = vec![
            Table::new("a").with_column(Column::new("id", Affinity::Integer, true, true, false)),
            Table::new("b").with_column(Column::new("id", Affinity::Integer, true, true, false)),
        ];
        assert!(check_collisions(&tables).is_ok());
    }
}
