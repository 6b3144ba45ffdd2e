//! Registration surface: static descriptor, factory, and the translator itself.

use anyhow::{Context, Result};
use nanopub_core::{
    BelStatementParser, Nanopub, StatementParser, Translator, TranslatorDescriptor,
    TranslatorOptions, TranslatorPlugin,
};
use std::io::Write;

use crate::options::TsvOptions;
use crate::reader::read_nanopubs;
use crate::writer::write_nanopubs;

pub static DESCRIPTOR: TranslatorDescriptor = TranslatorDescriptor {
    id: "tsv",
    name: "Tab-separated Translator",
    description: "This translator provides read/write functionality for BEL Nanopubs stored \
                  in TAB-separated files. This translator is intended to integrate with \
                  nanopub-core hosts.",
    media_types: &["text/tab-separated-values"],
    extensions: &["tsv", "tab"],
};

/// Factory registered with the host's translator registry.
pub fn create_translator(options: &TranslatorOptions) -> Result<Box<dyn Translator>> {
    let options: TsvOptions = options.decode().context("invalid tsv translator options")?;
    Ok(Box::new(TsvTranslator::new(options)))
}

pub fn plugin() -> TranslatorPlugin {
    TranslatorPlugin {
        descriptor: &DESCRIPTOR,
        factory: create_translator,
    }
}

/// TSV translator with a pluggable statement parser.
pub struct TsvTranslator {
    parser: Box<dyn StatementParser + Send + Sync>,
    options: TsvOptions,
}

impl TsvTranslator {
    /// Uses [`BelStatementParser`] for statements.
    pub fn new(options: TsvOptions) -> Self {
        Self::with_parser(BelStatementParser, options)
    }

    pub fn with_parser(
        parser: impl StatementParser + Send + Sync + 'static,
        options: TsvOptions,
    ) -> Self {
        Self {
            parser: Box::new(parser),
            options,
        }
    }

    pub fn options(&self) -> &TsvOptions {
        &self.options
    }
}

impl Default for TsvTranslator {
    fn default() -> Self {
        Self::new(TsvOptions::default())
    }
}

impl Translator for TsvTranslator {
    fn read(&self, data: &str) -> Result<Vec<Nanopub>> {
        Ok(read_nanopubs(data, self.parser.as_ref(), &self.options)?)
    }

    fn write(&self, nanopubs: &[Nanopub], out: &mut dyn Write) -> Result<()> {
        write_nanopubs(nanopubs, out)?;
        Ok(())
    }
}
