#![no_main]

use aptgen::backend::artifact::GeneratedArtifact;
use aptgen::frontend::metadata;
use aptgen::frontend::symbols::{Elements, SymbolTable};
use aptgen::FieldNamePolicy;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(source) = std::str::from_utf8(data) {
        // Loading may fail, but it should never panic
        let Ok(table) = SymbolTable::from_json(source) else {
            return;
        };
        for element in table.root_elements() {
            for &annotation in table.annotations_of(element) {
                if let Ok(described) = metadata::extract(&table, annotation, element) {
                    let _ = GeneratedArtifact::render(&described, FieldNamePolicy::Strict);
                    let _ = GeneratedArtifact::render(&described, FieldNamePolicy::Verbatim);
                }
            }
        }
    }
});
