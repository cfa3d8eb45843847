//! Golden snapshot tests for codegen
//!
//! These tests extract metadata from symbol models and compare the generated companion source against inline
//! snapshots. This ensures codegen changes are reviewed and intentional.
//!
//! Run with: `cargo test --test codegen_snapshot_tests`
//! Review changes: `cargo insta review`

use std::path::PathBuf;

use aptgen::backend::artifact::GeneratedArtifact;
use aptgen::frontend::metadata::{self, ElementMetadata};
use aptgen::frontend::symbols::{Elements, SymbolTable};
use aptgen::{FieldNamePolicy, generate};

const MARKER: &str = "sample.annotation.MySampleAnnotation";

fn load_fixture(name: &str) -> SymbolTable {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name);
    SymbolTable::from_path(&path).unwrap_or_else(|e| panic!("Failed to load fixture {}: {e}", path.display()))
}

fn describe(table: &SymbolTable, type_name: &str) -> ElementMetadata {
    let element = table.lookup_type(type_name).expect("type not in fixture");
    let marker = table.lookup_type(MARKER).expect("marker not in fixture");
    metadata::extract(table, marker, element).expect("extraction failed")
}

fn render(table: &SymbolTable, type_name: &str) -> String {
    GeneratedArtifact::render(&describe(table, type_name), FieldNamePolicy::Strict)
        .expect("generation failed")
        .body
}

#[test]
fn test_hello_codegen() {
    let table = load_fixture("hello.json");
    insta::assert_snapshot!(render(&table, "sample.Hello"), @r"
    package sample;
    public final class HelloGenerated {
      public static int Greeting;
    }
    ");
}

#[test]
fn test_no_getters_codegen() {
    let table = load_fixture("no_getters.json");
    insta::assert_snapshot!(render(&table, "sample.Hello"), @r"
    package sample;
    public final class HelloGenerated {
    }
    ");
}

#[test]
fn test_inherited_getters_codegen() {
    let table = load_fixture("inherited.json");
    insta::assert_snapshot!(render(&table, "shop.Order"), @r"
    package shop;
    public final class OrderGenerated {
      public static int Name;
      public static int Total;
      public static int Id;
    }
    ");
}

#[test]
fn test_unnamed_package_codegen() {
    let table = load_fixture("inherited.json");
    insta::assert_snapshot!(render(&table, "Top"), @r"
    public final class TopGenerated {
      public static int Level;
    }
    ");
}

#[test]
fn test_metadata_description() {
    let table = load_fixture("inherited.json");
    let element = table.lookup_type("shop.Order").expect("type not in fixture");
    assert_eq!(table.simple_name(element), "Order");
    assert_eq!(
        describe(&table, "shop.Order").to_string(),
        "\t- annotated element: annotatedClassName='Order', annotatedPackageName='shop', annotatedElementKind='CLASS'\n\
         \t- getter methods: [getName, getTotal, getId]"
    );
}

#[test]
fn test_generate_uses_given_target_name() {
    let table = load_fixture("hello.json");
    let metadata = describe(&table, "sample.Hello");
    insta::assert_snapshot!(generate(&metadata, "HelloFields"), @r"
    package sample;
    public final class HelloFields {
      public static int Greeting;
    }
    ");
}
