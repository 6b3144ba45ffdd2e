//! nanopub-core: Nanopub record model, BEL statement parsing, and the translator framework

pub mod model;
pub mod statement;
pub mod translator;

pub use model::{Citation, Nanopub, RawNanopub, SummaryText};
pub use statement::{
    Argument, BelStatementParser, Object, Parameter, Relationship, Statement, StatementError,
    StatementParser, Term,
};
pub use translator::{
    Translator, TranslatorDescriptor, TranslatorFactory, TranslatorOptions, TranslatorPlugin,
    TranslatorRegistry,
};
