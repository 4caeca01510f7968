//! Built-in curriculum
//!
//! A systems-programming track used by the demo binary and the tests. Base
//! hours are averages for a learner at full capacity.

use crate::graph::{Concept, GraphError, KnowledgeGraph};
use crate::types::Tier;

impl KnowledgeGraph {
    pub fn standard_curriculum() -> Result<Self, GraphError> {
        use Tier::{Advanced, Intermediate, Introductory};

        KnowledgeGraph::from_concepts(vec![
            // introductory
            Concept::new("variables", Introductory)
                .titled("Variables and Types")
                .hours(3.0),
            Concept::new("control_flow", Introductory)
                .titled("Control Flow")
                .requires(&["variables"])
                .hours(4.0),
            Concept::new("functions", Introductory)
                .titled("Functions")
                .requires(&["control_flow"])
                .hours(4.0),
            Concept::new("collections", Introductory)
                .titled("Collections")
                .requires(&["variables"])
                .hours(5.0),
            Concept::new("error_basics", Introductory)
                .titled("Error Basics")
                .requires(&["control_flow"])
                .hours(3.0),
            Concept::new("testing_basics", Introductory)
                .titled("Testing Basics")
                .requires(&["functions"])
                .hours(3.0),
            Concept::new("version_control", Introductory)
                .titled("Version Control")
                .hours(2.0),
            // intermediate
            Concept::new("ownership", Intermediate)
                .titled("Ownership and Borrowing")
                .requires(&["variables", "functions"])
                .hours(6.0),
            Concept::new("traits", Intermediate)
                .titled("Traits")
                .requires(&["functions", "ownership"])
                .hours(6.0),
            Concept::new("iterators", Intermediate)
                .titled("Iterators and Closures")
                .requires(&["collections", "traits"])
                .hours(5.0),
            Concept::new("error_handling", Intermediate)
                .titled("Error Handling")
                .requires(&["error_basics", "traits"])
                .hours(4.0),
            Concept::new("modules", Intermediate)
                .titled("Modules and Crates")
                .requires(&["functions", "version_control"])
                .hours(3.0),
            Concept::new("unit_testing", Intermediate)
                .titled("Unit and Integration Testing")
                .requires(&["testing_basics", "modules"])
                .hours(4.0),
            Concept::new("data_structures", Intermediate)
                .titled("Data Structures")
                .requires(&["collections", "ownership"])
                .hours(6.0),
            // advanced
            Concept::new("generics", Advanced)
                .titled("Generics")
                .requires(&["traits"])
                .hours(6.0),
            Concept::new("lifetimes", Advanced)
                .titled("Lifetimes")
                .requires(&["ownership", "generics"])
                .hours(8.0),
            Concept::new("concurrency", Advanced)
                .titled("Concurrency")
                .requires(&["ownership", "traits", "error_handling"])
                .hours(10.0),
            Concept::new("async_programming", Advanced)
                .titled("Async Programming")
                .requires(&["concurrency", "lifetimes", "iterators"])
                .hours(12.0),
            Concept::new("macros", Advanced)
                .titled("Macros")
                .requires(&["generics", "modules"])
                .hours(8.0),
            Concept::new("unsafe_code", Advanced)
                .titled("Unsafe Code")
                .requires(&["lifetimes", "data_structures"])
                .hours(10.0),
            Concept::new("performance_tuning", Advanced)
                .titled("Performance Tuning")
                .requires(&["data_structures", "iterators", "unit_testing"])
                .hours(9.0),
        ])
    }
}
