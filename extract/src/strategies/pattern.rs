//! Static line-by-line pattern matching.
//!
//! The script is scanned as a two-state machine folded over its lines:
//!
//! - `NoTable`: outside any table definition. A
//!   `CREATE TABLE IF NOT EXISTS <name> (` header opens a table; index,
//!   trigger and drop statements are skipped along with everything else.
//! - `InTable(table)`: inside a definition. Each `<name> <TYPE> [...]` line
//!   appends a column, table-level constraint lines are skipped, and a line
//!   starting with `)` closes the table.
//!
//! Only one column definition per line is understood, and table-level
//! `PRIMARY KEY (...)` clauses are not attributed to their columns. Use the
//! live strategy for schemas written differently.

use std::sync::LazyLock;

use regex::Regex;
use sqlgen_core::{Affinity, Column, Table, validate_tables};
use tracing::debug;

use super::SchemaExtractor;
use crate::error::{ExtractError, Result};

/// Regex patterns recognized by the scanner.
static PATTERNS: LazyLock<DdlPatterns> = LazyLock::new(DdlPatterns::new);

struct DdlPatterns {
    table_header: Regex,
    any_create_table: Regex,
    skipped_statement: Regex,
    table_end: Regex,
    table_constraint: Regex,
    column: Regex,

    // Column constraints
    not_null: Regex,
    primary_key: Regex,
    auto_increment: Regex,
}

impl DdlPatterns {
    fn new() -> Self {
        // Literal patterns; a compile failure is a bug.
        Self {
            // CREATE TABLE IF NOT EXISTS periodicTask (
            table_header: Regex::new(
                r"(?i)^\s*CREATE\s+TABLE\s+IF\s+NOT\s+EXISTS\s+([A-Za-z0-9_]+)\s*\(\s*$",
            )
            .expect("static regex must compile"),
            any_create_table: Regex::new(r"(?i)^\s*CREATE\s+(?:TEMP\s+|TEMPORARY\s+)?TABLE\b")
                .expect("static regex must compile"),
            // CREATE INDEX, CREATE UNIQUE INDEX, CREATE TRIGGER, DROP ...
            skipped_statement: Regex::new(
                r"(?i)^\s*(?:CREATE\s+(?:UNIQUE\s+)?INDEX|CREATE\s+(?:TEMP\s+|TEMPORARY\s+)?TRIGGER|CREATE\s+VIEW|DROP)\b",
            )
            .expect("static regex must compile"),
            table_end: Regex::new(r"^\s*\)").expect("static regex must compile"),
            table_constraint: Regex::new(
                r"(?i)^\s*(?:CONSTRAINT|PRIMARY\s+KEY|FOREIGN\s+KEY|UNIQUE|CHECK)\b",
            )
            .expect("static regex must compile"),
            // name TEXT NOT NULL CHECK(name != ''),
            // A size suffix stays part of the type: amount NUMERIC(10,2)
            column: Regex::new(
                r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s+([A-Za-z]+\b(?:\s*\([^)]*\))?)(.*)$",
            )
                .expect("static regex must compile"),

            not_null: Regex::new(r"(?i)\bNOT\s+NULL\b").expect("static regex must compile"),
            primary_key: Regex::new(r"(?i)\bPRIMARY\s+KEY\b").expect("static regex must compile"),
            auto_increment: Regex::new(r"(?i)\bAUTOINCREMENT\b")
                .expect("static regex must compile"),
        }
    }
}

/// What a single line of the script is, independent of scanner state.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    TableHeader(&'a str),
    UnsupportedTable,
    SkippedStatement,
    TableEnd,
    TableConstraint,
    Column(ColumnLine<'a>),
    Other,
}

#[derive(Debug, PartialEq, Eq)]
struct ColumnLine<'a> {
    name: &'a str,
    declared_type: &'a str,
    constraints: &'a str,
}

fn classify(line: &str) -> Line<'_> {
    let patterns = &*PATTERNS;
    if let Some(caps) = patterns.table_header.captures(line) {
        let name = caps.get(1).map_or("", |m| m.as_str());
        return Line::TableHeader(name);
    }
    if patterns.any_create_table.is_match(line) {
        return Line::UnsupportedTable;
    }
    if patterns.skipped_statement.is_match(line) {
        return Line::SkippedStatement;
    }
    if patterns.table_end.is_match(line) {
        return Line::TableEnd;
    }
    if patterns.table_constraint.is_match(line) {
        return Line::TableConstraint;
    }
    if let Some(caps) = patterns.column.captures(line) {
        return Line::Column(ColumnLine {
            name: caps.get(1).map_or("", |m| m.as_str()),
            declared_type: caps.get(2).map_or("", |m| m.as_str()),
            constraints: caps.get(3).map_or("", |m| m.as_str()),
        });
    }
    Line::Other
}

enum ScanState {
    NoTable,
    InTable(Table),
}

/// Accumulator threaded through the fold.
struct Scan {
    tables: Vec<Table>,
    state: ScanState,
}

impl Scan {
    fn start() -> Self {
        Self {
            tables: Vec::new(),
            state: ScanState::NoTable,
        }
    }

    fn step(self, (index, line): (usize, &str)) -> Result<Self> {
        let Scan { mut tables, state } = self;
        let line_no = index + 1;

        let state = match (state, classify(line)) {
            (ScanState::InTable(table), Line::TableHeader(name)) => {
                tables.push(table);
                ScanState::InTable(Table::new(name))
            }
            (ScanState::NoTable, Line::TableHeader(name)) => ScanState::InTable(Table::new(name)),
            (_, Line::UnsupportedTable) => {
                return Err(ExtractError::SchemaParse(format!(
                    "line {line_no}: unsupported table definition '{}'",
                    line.trim()
                )));
            }
            (ScanState::InTable(table), Line::TableEnd) => {
                tables.push(table);
                ScanState::NoTable
            }
            (ScanState::InTable(mut table), Line::Column(column)) => {
                let parsed = parse_column(&table.name, &column)?;
                table.columns.push(parsed);
                ScanState::InTable(table)
            }
            (state, Line::SkippedStatement) => {
                debug!(line = line_no, "skipping non-table statement");
                state
            }
            (state, _) => state,
        };

        Ok(Self { tables, state })
    }

    fn finish(self) -> Vec<Table> {
        let mut tables = self.tables;
        if let ScanState::InTable(table) = self.state {
            tables.push(table);
        }
        tables
    }
}

fn parse_column(table: &str, line: &ColumnLine<'_>) -> Result<Column> {
    let affinity: Affinity =
        line.declared_type
            .parse()
            .map_err(|_| ExtractError::UnknownTypeAffinity {
                table: table.to_string(),
                column: line.name.to_string(),
                declared: line.declared_type.to_string(),
            })?;
    let patterns = &*PATTERNS;
    Ok(Column::new(
        line.name,
        affinity,
        patterns.not_null.is_match(line.constraints),
        patterns.primary_key.is_match(line.constraints),
        patterns.auto_increment.is_match(line.constraints),
    ))
}

/// Extracts tables by scanning the script line by line.
///
/// # Examples
///
/// ```
/// use sqlgen_extract::{PatternExtractor, SchemaExtractor};
///
/// let sql = "CREATE TABLE IF NOT EXISTS doneTask (
///   id INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
///   doneAt TEXT NOT NULL
/// );
/// CREATE INDEX IF NOT EXISTS doneTask_doneAt ON doneTask(doneAt);";
/// let tables = PatternExtractor.extract(sql).unwrap();
/// assert_eq!(tables.len(), 1);
/// assert_eq!(tables[0].columns.len(), 2);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternExtractor;

impl SchemaExtractor for PatternExtractor {
    fn extract(&self, sql: &str) -> Result<Vec<Table>> {
        let tables = sql
            .lines()
            .enumerate()
            .try_fold(Scan::start(), Scan::step)?
            .finish();
        if let Some(error) = validate_tables(&tables).into_iter().next() {
            return Err(error.into());
        }
        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_table_header() {
        assert_eq!(
            classify("CREATE TABLE IF NOT EXISTS periodicTask ("),
            Line::TableHeader("periodicTask")
        );
        assert_eq!(
            classify("create table if not exists t("),
            Line::TableHeader("t")
        );
    }

    #[test]
    fn test_classify_other_table_forms_are_unsupported() {
        assert_eq!(classify("CREATE TABLE t ("), Line::UnsupportedTable);
        assert_eq!(
            classify("CREATE TABLE IF NOT EXISTS t (a INTEGER);"),
            Line::UnsupportedTable
        );
    }

    #[test]
    fn test_classify_skipped_statements() {
        assert_eq!(
            classify("CREATE INDEX IF NOT EXISTS i ON t(a);"),
            Line::SkippedStatement
        );
        assert_eq!(
            classify("CREATE TRIGGER IF NOT EXISTS trg"),
            Line::SkippedStatement
        );
        assert_eq!(
            classify("DROP TRIGGER IF EXISTS trg;"),
            Line::SkippedStatement
        );
    }

    #[test]
    fn test_classify_constraint_lines() {
        assert_eq!(
            classify("  FOREIGN KEY (periodicTaskId) REFERENCES periodicTask(id) ON DELETE CASCADE"),
            Line::TableConstraint
        );
        assert_eq!(classify("  PRIMARY KEY (a, b)"), Line::TableConstraint);
        assert_eq!(classify(");"), Line::TableEnd);
    }

    #[test]
    fn test_classify_column() {
        assert_eq!(
            classify("  startAt TEXT NOT NULL,"),
            Line::Column(ColumnLine {
                name: "startAt",
                declared_type: "TEXT",
                constraints: " NOT NULL,",
            })
        );
    }

    #[test]
    fn test_step_is_pure_over_explicit_state() {
        let scan = Scan::start();
        let scan = scan
            .step((0, "CREATE TABLE IF NOT EXISTS t ("))
            .unwrap()
            .step((1, "  a INTEGER PRIMARY KEY,"))
            .unwrap();
        assert!(scan.tables.is_empty());
        let scan = scan.step((2, ");")).unwrap();
        assert!(matches!(scan.state, ScanState::NoTable));
        assert_eq!(scan.tables.len(), 1);
        assert_eq!(scan.tables[0].columns[0].name, "a");
    }

    #[test]
    fn test_columns_outside_tables_are_ignored() {
        let sql = "CREATE TRIGGER IF NOT EXISTS trg\nBEFORE INSERT ON t\nBEGIN\n  SELECT 1;\nEND;";
        assert!(PatternExtractor.extract(sql).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let sql = "CREATE TABLE IF NOT EXISTS t (\n  name VARCHAR(10)\n);";
        let err = PatternExtractor.extract(sql).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::UnknownTypeAffinity { ref declared, .. } if declared == "VARCHAR(10)"
        ));
    }

    #[test]
    fn test_unsupported_table_is_a_parse_error() {
        let err = PatternExtractor
            .extract("CREATE TABLE t (\n  a INTEGER\n);")
            .unwrap_err();
        match err {
            ExtractError::SchemaParse(message) => assert!(message.starts_with("line 1:")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
