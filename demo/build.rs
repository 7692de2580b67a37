use std::env;
use std::fs;
use std::path::Path;

use sqlgen_codegen::{GeneratorOptions, generate};
use sqlgen_extract::{Strategy, extract};

fn main() {
    let schema = Path::new("schema.sql");
    println!("cargo:rerun-if-changed={}", schema.display());

    let sql = fs::read_to_string(schema).expect("failed to read schema.sql");
    let tables = extract(&sql, Strategy::Live).expect("failed to extract schema");
    let module =
        generate(&tables, &sql, &GeneratorOptions::default()).expect("failed to generate module");

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    module
        .write_to(Path::new(&out_dir).join("sql.rs"))
        .expect("failed to write generated module");
}
