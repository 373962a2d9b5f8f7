//! Collaborator ports and their reference implementations

pub mod catalogs;
pub mod collaborators;
pub mod in_memory;

pub use catalogs::{
    default_filtered_prefixes, default_sensitive_signatures, PrefixLibraryFilter, SignatureCatalog,
};
pub use collaborators::{
    BranchCatalog, ContextualValue, ContextualValues, FilteredLibraryCatalog, InterproceduralCfg,
    PathPredicateIndex, ProvenanceQuery, SensitiveApiCatalog,
};
pub use in_memory::{InMemoryProgram, ProgramBuilder, ProgramSnapshot};
