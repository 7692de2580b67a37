//! Rust source for the global section and the per-table sections.

use sqlgen_core::{Column, RustType, Table};

use crate::block::Block;
use crate::naming::{field_ident, screaming_snake_case, snake_case, upper_camel_case};
use crate::options::GeneratorOptions;

/// Rust string literal with exactly the bytes of `text`.
///
/// Raw literals keep the embedded schema readable; the hash count is one
/// more than the longest `"#…` run in the text. Text containing `\r` falls
/// back to an escaped literal since source files normalize line endings.
pub(crate) fn string_literal(text: &str) -> String {
    if text.contains('\r') {
        return format!("{text:?}");
    }
    let hashes = text
        .match_indices('"')
        .map(|(index, _)| text[index + 1..].chars().take_while(|&c| c == '#').count() + 1)
        .max()
        .unwrap_or(0);
    let hashes = "#".repeat(hashes);
    format!("r{hashes}\"{text}\"{hashes}")
}

fn quoted(name: &str) -> String {
    format!("{name:?}")
}

fn rust_type(column: &Column) -> RustType {
    RustType::for_affinity(column.affinity)
}

fn variant(table: &Table, column: &Column) -> String {
    format!(
        "{}{}",
        upper_camel_case(&table.name),
        upper_camel_case(&column.name)
    )
}

/// Schema constant, table and column name constants, and [`AllColumns`].
///
/// [`AllColumns`]: crate#generated-items
pub(crate) fn global_section(tables: &[Table], sql: &str, options: &GeneratorOptions) -> Block {
    let mut block = Block::new();
    block.line(format!("use {} as rt;", options.runtime_crate));
    block.blank();
    block.line("/// Schema script this module was generated from.");
    block.line(format!("pub const CREATE_TABLE: &str = {};", string_literal(sql)));
    block.blank();
    block.push_block(tables_module(tables));
    block.blank();
    block.push_block(columns_module(tables));
    block.blank();
    block.push_block(all_columns(tables));
    block
}

fn tables_module(tables: &[Table]) -> Block {
    let mut body = Block::new();
    for table in tables {
        body.line(format!(
            "pub const {}: &str = {};",
            screaming_snake_case(&table.name),
            quoted(&table.name)
        ));
    }
    if !tables.is_empty() {
        body.blank();
    }
    body.line("/// Every table, in schema order.");
    let names: Vec<String> = tables
        .iter()
        .map(|table| screaming_snake_case(&table.name))
        .collect();
    body.line(format!("pub const ALL: &[&str] = &[{}];", names.join(", ")));

    let mut block = Block::new();
    block.line("/// SQL table names.");
    block.wrap("pub mod tables {", body, "}");
    block
}

fn columns_module(tables: &[Table]) -> Block {
    let mut body = Block::new();
    for (index, table) in tables.iter().enumerate() {
        if index > 0 {
            body.blank();
        }
        let mut consts = Block::new();
        for column in &table.columns {
            consts.line(format!(
                "pub const {}: &str = {};",
                screaming_snake_case(&column.name),
                quoted(&format!("{}.{}", table.name, column.name))
            ));
        }
        body.wrap(
            format!("pub mod {} {{", field_ident(&table.name)),
            consts,
            "}",
        );
    }

    let mut block = Block::new();
    block.line("/// Qualified `table.column` names, one module per table.");
    block.wrap("pub mod columns {", body, "}");
    block
}

fn all_columns(tables: &[Table]) -> Block {
    let pairs: Vec<(&Table, &Column)> = tables
        .iter()
        .flat_map(|table| table.columns.iter().map(move |column| (table, column)))
        .collect();

    let mut variants = Block::new();
    let mut listed = Block::new();
    let mut qualified = Block::new();
    let mut unqualified = Block::new();
    for &(table, column) in &pairs {
        let name = variant(table, column);
        variants.line(format!("{name},"));
        listed.line(format!("AllColumns::{name},"));
        qualified.line(format!(
            "AllColumns::{name} => columns::{}::{},",
            field_ident(&table.name),
            screaming_snake_case(&column.name)
        ));
        unqualified.line(format!("AllColumns::{name} => {},", quoted(&column.name)));
    }

    let mut as_str = Block::new();
    as_str.wrap("match self {", qualified, "}");
    let mut column_name = Block::new();
    column_name.wrap("match self {", unqualified, "}");
    let mut alias = Block::new();
    alias.line("rt::alias(table_alias, self.as_str())");

    let mut methods = Block::new();
    methods.line("/// Every column, in schema order.");
    methods.wrap("pub const ALL: &'static [AllColumns] = &[", listed, "];");
    methods.blank();
    methods.line("/// Qualified `table.column` name.");
    methods.wrap("pub fn as_str(self) -> &'static str {", as_str, "}");
    methods.blank();
    methods.line("/// Column name without its table.");
    methods.wrap("pub fn column_name(self) -> &'static str {", column_name, "}");
    methods.blank();
    methods.line("/// Column name qualified by `table_alias` instead of its table.");
    methods.wrap("pub fn alias(self, table_alias: &str) -> String {", alias, "}");

    let mut write = Block::new();
    write.line("f.write_str(self.as_str())");
    let mut display = Block::new();
    display.wrap(
        "fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {",
        write,
        "}",
    );

    let mut block = Block::new();
    block.line("/// Every qualified column of the schema.");
    block.line("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]");
    block.wrap("pub enum AllColumns {", variants, "}");
    block.blank();
    block.wrap("impl AllColumns {", methods, "}");
    block.blank();
    block.wrap("impl std::fmt::Display for AllColumns {", display, "}");
    block
}

/// How a parameter struct exposes one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    /// Always bound; `nullable` makes it `Option<T>` binding NULL on `None`.
    Required { nullable: bool },
    /// `Option<T>`; `None` leaves the column out of the statement.
    Omittable,
}

struct ParamsStruct<'a> {
    name: String,
    doc: String,
    fields: Vec<(&'a Column, Field)>,
}

impl ParamsStruct<'_> {
    fn render(&self, options: &GeneratorOptions) -> Block {
        let mut members = Block::new();
        for &(column, field) in &self.fields {
            let optional = !matches!(field, Field::Required { nullable: false });
            members.line(format!(
                "pub {}: {},",
                field_ident(&column.name),
                rust_type(column).render(optional)
            ));
        }

        let mut block = Block::new();
        block.line(format!("/// {}", self.doc));
        block.line(options.derive_attribute());
        block.wrap(format!("pub struct {} {{", self.name), members, "}");
        block.blank();

        let mut method = Block::new();
        method.line("/// Column/value pairs for every bound column, in column order.");
        method.wrap("pub fn fields(&self) -> rt::Fields {", self.fields_body(), "}");
        block.wrap(format!("impl {} {{", self.name), method, "}");
        block
    }

    fn fields_body(&self) -> Block {
        let mut body = Block::new();
        if self.fields.iter().all(|(_, field)| *field != Field::Omittable) {
            let mut entries = Block::new();
            for &(column, _) in &self.fields {
                let value = owned(&format!("self.{}", field_ident(&column.name)), column);
                entries.line(format!("({}, rt::Value::from({value})),", quoted(&column.name)));
            }
            body.wrap("vec![", entries, "]");
            return body;
        }

        body.line("let mut fields = rt::Fields::new();");
        for &(column, field) in &self.fields {
            let member = format!("self.{}", field_ident(&column.name));
            let name = quoted(&column.name);
            match field {
                Field::Required { .. } => {
                    body.line(format!(
                        "fields.push(({name}, rt::Value::from({})));",
                        owned(&member, column)
                    ));
                }
                Field::Omittable => {
                    let (pattern, value) = if rust_type(column).is_copy() {
                        (member, "value".to_string())
                    } else {
                        (format!("&{member}"), "value.clone()".to_string())
                    };
                    let mut push = Block::new();
                    push.line(format!("fields.push(({name}, rt::Value::from({value})));"));
                    body.wrap(format!("if let Some(value) = {pattern} {{"), push, "}");
                }
            }
        }
        body.line("fields");
        body
    }
}

fn owned(member: &str, column: &Column) -> String {
    if rust_type(column).is_copy() {
        member.to_string()
    } else {
        format!("{member}.clone()")
    }
}

/// Insert, Replace and Delete parameter structs and functions for `table`.
pub(crate) fn table_section(table: &Table, options: &GeneratorOptions) -> Block {
    let camel = upper_camel_case(&table.name);
    let snake = snake_case(&table.name);
    let table_const = format!("tables::{}", screaming_snake_case(&table.name));

    let insert = ParamsStruct {
        name: format!("Insert{camel}Params"),
        doc: format!(
            "Row for [`insert_{snake}`]. Autoincrement columns are assigned by the database."
        ),
        fields: table
            .insertable_columns()
            .map(|column| {
                let field = Field::Required {
                    nullable: column.is_nullable,
                };
                (column, field)
            })
            .collect(),
    };
    let replace = ParamsStruct {
        name: format!("Replace{camel}Params"),
        doc: format!(
            "Row for [`replace_{snake}`]. Omitted columns are reset to their schema default."
        ),
        fields: table
            .columns
            .iter()
            .map(|column| {
                let field = if column.is_primary_key {
                    Field::Required { nullable: false }
                } else {
                    Field::Omittable
                };
                (column, field)
            })
            .collect(),
    };
    let delete = ParamsStruct {
        name: format!("Delete{camel}Params"),
        doc: format!("Equality filters for [`delete_{snake}`]; `None` fields are ignored."),
        fields: table
            .columns
            .iter()
            .map(|column| (column, Field::Omittable))
            .collect(),
    };

    let mut block = Block::new();
    block.line(format!("// table: {}", table.name));
    block.blank();
    block.push_block(insert.render(options));
    block.blank();
    block.push_block(batch_fn(
        "Insert",
        &format!("insert_{snake}"),
        &format!("Inserts `rows` into `{}` with one statement, in order.", table.name),
        &insert,
        &table_const,
    ));
    block.blank();
    block.push_block(replace.render(options));
    block.blank();
    block.push_block(batch_fn(
        "Replace",
        &format!("replace_{snake}"),
        &format!(
            "Overwrites the `{}` rows identified by the primary key of each of `rows`.",
            table.name
        ),
        &replace,
        &table_const,
    ));
    block.blank();
    block.push_block(delete.render(options));
    block.blank();
    block.push_block(delete_fn(&snake, &table.name, &delete, &table_const));
    block
}

fn batch_fn(
    verb: &str,
    fn_name: &str,
    doc: &str,
    params: &ParamsStruct<'_>,
    table_const: &str,
) -> Block {
    let columns: Vec<String> = params
        .fields
        .iter()
        .map(|(column, _)| quoted(&column.name))
        .collect();

    let mut call = Block::new();
    call.line(format!("rt::BatchVerb::{verb},"));
    call.line(format!("{table_const},"));
    call.line(format!("&[{}],", columns.join(", ")));
    call.line("&rows,");

    let mut body = Block::new();
    body.line(format!(
        "let rows: Vec<rt::Fields> = rows.iter().map({}::fields).collect();",
        params.name
    ));
    body.wrap("let (sql, params) = rt::batch_statement(", call, ")?;");
    body.line("db.query(&sql, &params)?;");
    body.line("Ok(())");

    let mut block = Block::new();
    block.line(format!("/// {doc}"));
    block.line(format!(
        "pub fn {fn_name}<D: rt::Datastore>(db: &D, rows: &[{}]) -> rt::Result<()> {{",
        params.name
    ));
    block.push_block(body.indent());
    block.line("}");
    block
}

fn delete_fn(snake: &str, table_name: &str, params: &ParamsStruct<'_>, table_const: &str) -> Block {
    let mut body = Block::new();
    body.line("let fields = filter.fields();");
    body.line(format!("let sql = rt::delete_statement({table_const}, &fields);"));
    body.line("db.query(&sql, &rt::named(fields))?;");
    body.line("Ok(())");

    let mut block = Block::new();
    block.line(format!(
        "/// Deletes the `{table_name}` rows matching every set field of `filter`."
    ));
    block.line("///");
    block.line("/// A filter with no field set is rejected by the database.");
    block.line(format!(
        "pub fn delete_{snake}<D: rt::Datastore>(db: &D, filter: &{}) -> rt::Result<()> {{",
        params.name
    ));
    block.push_block(body.indent());
    block.line("}");
    block
}
