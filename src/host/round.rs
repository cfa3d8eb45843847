//! Round model and a minimal round driver
//!
//! A [`RoundEnvironment`] indexes the annotated elements visible in one round. The [`RoundDriver`] plays the host: it
//! offers each registered processor the annotation types it supports, honours claims, and runs the model round
//! followed by a final round in which processing is over.

use std::collections::BTreeMap;

use aptgen_core::lang::conventions::WILDCARD_ANNOTATION;

use super::ProcessingEnvironment;
use super::filer::Filer;
use super::messager::Messager;
use crate::frontend::symbols::{ElementId, Elements, SymbolTable};
use crate::processor::{Claim, ProcessError, Processor};

/// Elements carrying one annotation type in a round.
#[derive(Debug, Clone, PartialEq, Eq)]
struct AnnotationGroup {
    name: String,
    annotation: ElementId,
    elements: Vec<ElementId>,
}

/// What one round presents to processors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundEnvironment {
    round_number: usize,
    processing_over: bool,
    groups: Vec<AnnotationGroup>,
}

impl RoundEnvironment {
    /// Index every annotated element reachable from `roots`.
    ///
    /// Annotation types are ordered by first use; elements keep declaration order, enclosing element first.
    pub fn collect(elements: &dyn Elements, roots: &[ElementId], round_number: usize) -> Self {
        let mut round = Self {
            round_number,
            processing_over: false,
            groups: Vec::new(),
        };
        for &root in roots {
            round.visit(elements, root);
        }
        round
    }

    /// The last round: no elements, processing is over.
    pub fn final_round(round_number: usize) -> Self {
        Self {
            round_number,
            processing_over: true,
            groups: Vec::new(),
        }
    }

    fn visit(&mut self, elements: &dyn Elements, element: ElementId) {
        for &annotation in elements.annotations_of(element) {
            let name = elements.qualified_name(annotation);
            match self.groups.iter_mut().find(|g| g.name == name) {
                Some(group) if group.elements.contains(&element) => {}
                Some(group) => group.elements.push(element),
                None => self.groups.push(AnnotationGroup {
                    name,
                    annotation,
                    elements: vec![element],
                }),
            }
        }
        for &member in elements.enclosed_elements(element) {
            self.visit(elements, member);
        }
    }

    /// Qualified names of the annotation types present in this round.
    pub fn annotations(&self) -> Vec<String> {
        self.groups.iter().map(|g| g.name.clone()).collect()
    }

    /// The annotation type element for `name`, if present in this round.
    pub fn annotation_element(&self, name: &str) -> Option<ElementId> {
        self.groups.iter().find(|g| g.name == name).map(|g| g.annotation)
    }

    /// Elements annotated with `name`, in declaration order.
    pub fn elements_annotated_with(&self, name: &str) -> &[ElementId] {
        self.groups
            .iter()
            .find(|g| g.name == name)
            .map(|g| g.elements.as_slice())
            .unwrap_or(&[])
    }

    pub fn processing_over(&self) -> bool {
        self.processing_over
    }

    pub fn round_number(&self) -> usize {
        self.round_number
    }
}

/// One processor invocation, as recorded by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub round: usize,
    pub processor: String,
    pub annotations: Vec<String>,
    pub claim: Claim,
}

/// Result of a driver run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub rounds: usize,
    pub invocations: Vec<Invocation>,
}

impl RunSummary {
    /// Invocations of the processor called `name`.
    pub fn invocations_of<'s>(&'s self, name: &'s str) -> impl Iterator<Item = &'s Invocation> + 's {
        self.invocations.iter().filter(move |i| i.processor == name)
    }
}

struct Registered {
    processor: Box<dyn Processor>,
    invoked: bool,
}

/// Dispatches rounds to registered processors in registration order.
#[derive(Default)]
pub struct RoundDriver {
    processors: Vec<Registered>,
    options: BTreeMap<String, String>,
}

impl RoundDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: BTreeMap<String, String>) -> Self {
        self.options = options;
        self
    }

    pub fn register(&mut self, processor: Box<dyn Processor>) {
        self.processors.push(Registered {
            processor,
            invoked: false,
        });
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Run the model round and the final round over `table`.
    pub fn run(
        &mut self,
        table: &SymbolTable,
        filer: &mut dyn Filer,
        messager: &mut dyn Messager,
    ) -> Result<RunSummary, ProcessError> {
        let mut summary = RunSummary::default();

        let first = RoundEnvironment::collect(table, &table.root_elements(), 1);
        self.run_round(&first, table, filer, messager, &mut summary)?;

        let last = RoundEnvironment::final_round(2);
        self.run_round(&last, table, filer, messager, &mut summary)?;

        Ok(summary)
    }

    /// Offer `round` to every processor. Claimed annotation types are withheld from later processors.
    #[tracing::instrument(
        skip_all,
        fields(round = round.round_number(), processing_over = round.processing_over())
    )]
    pub fn run_round(
        &mut self,
        round: &RoundEnvironment,
        elements: &dyn Elements,
        filer: &mut dyn Filer,
        messager: &mut dyn Messager,
        summary: &mut RunSummary,
    ) -> Result<(), ProcessError> {
        let mut unclaimed = round.annotations();

        for registered in &mut self.processors {
            let supported = registered.processor.supported_annotation_types();
            let offered: Vec<String> = if supported.iter().any(|s| s == WILDCARD_ANNOTATION) {
                unclaimed.clone()
            } else {
                unclaimed.iter().filter(|a| supported.contains(*a)).cloned().collect()
            };

            // Processors are re-invoked in later rounds once they have run.
            if offered.is_empty() && !registered.invoked {
                continue;
            }
            registered.invoked = true;

            let mut env = ProcessingEnvironment {
                elements,
                filer: &mut *filer,
                messager: &mut *messager,
                options: &self.options,
            };
            let claim = registered.processor.process(&offered, round, &mut env)?;
            tracing::debug!(processor = registered.processor.name(), offered = offered.len(), ?claim, "processor ran");

            if claim.is_claimed() {
                unclaimed.retain(|a| !offered.contains(a));
            }
            summary.invocations.push(Invocation {
                round: round.round_number(),
                processor: registered.processor.name().to_string(),
                annotations: offered,
                claim,
            });
        }

        summary.rounds += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::filer::MemoryFiler;
    use crate::host::messager::CollectingMessager;
    use aptgen_core::lang::element_kind::ElementKindId;

    fn table() -> SymbolTable {
        SymbolTable::from_json(
            r#"{ "packages": [{ "name": "p", "types": [
                { "name": "A", "annotations": ["m.One", "m.Two"],
                  "members": [{ "name": "Inner", "kind": "class", "annotations": ["m.One"] }] },
                { "name": "B", "annotations": ["m.Two"] }
            ]}]}"#,
        )
        .unwrap()
    }

    /// Records what it is offered and claims according to `claim`.
    struct Probe {
        name: &'static str,
        supported: Vec<String>,
        claim: Claim,
    }

    impl Processor for Probe {
        fn name(&self) -> &str {
            self.name
        }

        fn supported_annotation_types(&self) -> Vec<String> {
            self.supported.clone()
        }

        fn process(
            &mut self,
            annotations: &[String],
            _round: &RoundEnvironment,
            _env: &mut ProcessingEnvironment<'_>,
        ) -> Result<Claim, ProcessError> {
            if annotations.is_empty() {
                return Ok(Claim::NotClaimed);
            }
            Ok(self.claim)
        }
    }

    fn probe(name: &'static str, supported: &[&str], claim: Claim) -> Box<dyn Processor> {
        Box::new(Probe {
            name,
            supported: supported.iter().map(|s| s.to_string()).collect(),
            claim,
        })
    }

    #[test]
    fn test_round_environment_groups_by_annotation() {
        let table = table();
        let round = RoundEnvironment::collect(&table, &table.root_elements(), 1);
        assert_eq!(round.annotations(), vec!["m.One", "m.Two"]);

        let one: Vec<String> = round
            .elements_annotated_with("m.One")
            .iter()
            .map(|&e| table.qualified_name(e))
            .collect();
        assert_eq!(one, vec!["p.A", "p.A.Inner"]);
        assert_eq!(round.elements_annotated_with("m.Two").len(), 2);
        assert!(round.elements_annotated_with("m.Three").is_empty());

        let marker = round.annotation_element("m.One").unwrap();
        assert_eq!(table.kind(marker), ElementKindId::Annotation);
        assert!(!round.processing_over());
    }

    /// Host view of an element that repeats an annotation, bypassing table-level deduplication.
    struct RepeatedAnnotations<'t> {
        table: &'t SymbolTable,
        element: ElementId,
        repeated: Vec<ElementId>,
    }

    impl Elements for RepeatedAnnotations<'_> {
        fn kind(&self, id: ElementId) -> ElementKindId {
            self.table.kind(id)
        }
        fn simple_name(&self, id: ElementId) -> &str {
            self.table.simple_name(id)
        }
        fn enclosing_element(&self, id: ElementId) -> Option<ElementId> {
            self.table.enclosing_element(id)
        }
        fn qualified_name(&self, id: ElementId) -> String {
            self.table.qualified_name(id)
        }
        fn enclosed_elements(&self, id: ElementId) -> &[ElementId] {
            self.table.enclosed_elements(id)
        }
        fn parameters(&self, id: ElementId) -> &[String] {
            self.table.parameters(id)
        }
        fn annotations_of(&self, id: ElementId) -> &[ElementId] {
            if id == self.element {
                &self.repeated
            } else {
                self.table.annotations_of(id)
            }
        }
        fn all_members(&self, id: ElementId) -> Result<Vec<ElementId>, crate::frontend::symbols::SymbolError> {
            self.table.all_members(id)
        }
    }

    #[test]
    fn test_repeated_annotation_lists_element_once() {
        let table = table();
        let b = table.lookup_type("p.B").unwrap();
        let two = table.lookup_type("m.Two").unwrap();
        let host = RepeatedAnnotations {
            table: &table,
            element: b,
            repeated: vec![two, two],
        };

        let round = RoundEnvironment::collect(&host, &[b], 1);
        assert_eq!(round.annotations(), vec!["m.Two"]);
        assert_eq!(round.elements_annotated_with("m.Two"), [b]);
    }

    #[test]
    fn test_final_round_is_empty() {
        let round = RoundEnvironment::final_round(2);
        assert!(round.processing_over());
        assert!(round.annotations().is_empty());
        assert_eq!(round.round_number(), 2);
    }

    #[test]
    fn test_claim_hides_annotation_from_later_processors() {
        let table = table();
        let mut driver = RoundDriver::new();
        driver.register(probe("first", &["m.One"], Claim::Claimed));
        driver.register(probe("watcher", &["*"], Claim::NotClaimed));

        let summary = driver
            .run(&table, &mut MemoryFiler::new(), &mut CollectingMessager::new())
            .unwrap();
        let watcher: Vec<_> = summary.invocations_of("watcher").collect();
        assert_eq!(watcher[0].annotations, vec!["m.Two"]);
    }

    #[test]
    fn test_unclaimed_annotations_stay_visible() {
        let table = table();
        let mut driver = RoundDriver::new();
        driver.register(probe("first", &["*"], Claim::NotClaimed));
        driver.register(probe("second", &["m.One"], Claim::Claimed));

        let summary = driver
            .run(&table, &mut MemoryFiler::new(), &mut CollectingMessager::new())
            .unwrap();
        let second: Vec<_> = summary.invocations_of("second").collect();
        assert_eq!(second[0].annotations, vec!["m.One"]);
        assert_eq!(second[0].claim, Claim::Claimed);
    }

    #[test]
    fn test_invoked_processors_rerun_in_final_round() {
        let table = table();
        let mut driver = RoundDriver::new();
        driver.register(probe("used", &["m.One"], Claim::Claimed));
        driver.register(probe("unused", &["m.Missing"], Claim::Claimed));

        let summary = driver
            .run(&table, &mut MemoryFiler::new(), &mut CollectingMessager::new())
            .unwrap();
        assert_eq!(summary.rounds, 2);

        let used: Vec<_> = summary.invocations_of("used").collect();
        assert_eq!(used.len(), 2);
        assert_eq!(used[1].round, 2);
        assert!(used[1].annotations.is_empty());
        assert_eq!(used[1].claim, Claim::NotClaimed);
        assert_eq!(summary.invocations_of("unused").count(), 0);
    }
}
