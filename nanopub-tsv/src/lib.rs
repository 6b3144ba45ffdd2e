//! nanopub-tsv: tab-separated translator for BEL nanopubs.
//!
//! One nanopub per line, four positional fields:
//!
//! ```text
//! <citation-type>\t<citation-id>\t<summary-text>\t<statement>\n
//! ```

pub mod error;
pub mod options;
pub mod plugin;
pub mod reader;
pub mod writer;

pub use error::TsvError;
pub use options::{MalformedLinePolicy, TsvOptions};
pub use plugin::{create_translator, plugin, TsvTranslator, DESCRIPTOR};
pub use reader::read_nanopubs;
pub use writer::{write_nanopubs, write_to_string};
