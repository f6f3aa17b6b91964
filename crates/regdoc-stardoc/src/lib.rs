//! Stardoc documentation model for regdoc.
//!
//! Turns a module version's docs archive into an ordered collection of
//! documents, assigns every documented entity a stable anchor, and derives
//! the navigation tree from the same anchors the renderer uses.
//!
//! # Example
//!
//! ```no_run
//! use regdoc_stardoc::{AnchorIndex, build_navigation, load_collection};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("docs.tar.gz")?;
//! let collection = load_collection(&bytes)?;
//! let anchors = AnchorIndex::build(&collection);
//! for node in build_navigation(&collection, &anchors) {
//!     println!("{} ({} entries)", node.label, node.children.len());
//! }
//! # Ok(())
//! # }
//! ```

mod anchor;
mod collection;
mod decode;
mod ingest;
mod model;
mod nav;
pub mod proto;

pub use anchor::{AnchorIndex, DocumentAnchors, EntityKind, anchor};
pub use collection::DocumentCollection;
pub use decode::{DESCRIPTOR_SUFFIX, decode_descriptor, is_descriptor};
pub use ingest::{build_doc_page, load_collection};
pub use model::{
    AspectInfo, AttributeInfo, AttributeType, DocumentInfo, FieldInfo, FunctionInfo,
    ParameterInfo, ProviderInfo, RuleInfo,
};
pub use nav::{NavNode, build_navigation, flatten};
