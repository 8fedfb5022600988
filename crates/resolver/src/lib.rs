//! # Bundle Resolver
//!
//! Groups the loose JSON files of a Transformers model directory into one
//! composite model description.
//!
//! ## Features
//!
//! - **Shape classification** - decide from content alone whether a file is a
//!   model config, a tokenizer, a tokenizer config or a vocabulary
//! - **Sibling discovery** - probe the conventional neighbours of an anchor and
//!   re-classify each one before trusting it
//! - **De-duplication** - a filter the host consults so a config-anchored bundle
//!   is reported once, whichever file the host happens to visit first
//! - **Assembly** - build the [`CompositeModel`] from whatever was found
//!
//! ## Architecture
//!
//! ```text
//! ModelContext (host: file system, archive, memory)
//!     │
//!     ├──> Classifier ── ordered shape rules ──> Role
//!     │
//!     ├──> BundleFilter ── config.json next door? ──> suppress
//!     │
//!     └──> BundleResolver
//!            ├─ fetch + re-classify siblings (concurrently)
//!            └─ assemble ──> CompositeModel { format, modules }
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use bundle_resolver::{BundleFilter, BundleResolver, Classifier, FsContext};
//!
//! #[tokio::main]
//! async fn main() -> bundle_resolver::Result<()> {
//!     let context = FsContext::new("models/gpt2/tokenizer.json");
//!     let Some(anchor) = Classifier::default().classify_context(&context).await else {
//!         return Ok(());
//!     };
//!
//!     if BundleFilter::default()
//!         .is_independent_bundle(&context, anchor.role)
//!         .await
//!     {
//!         let model = BundleResolver::default()
//!             .resolve_anchor(anchor, &context)
//!             .await?;
//!         println!("{}: {} modules", model.format, model.modules.len());
//!     }
//!     Ok(())
//! }
//! ```

mod assembler;
mod classifier;
mod config;
mod context;
mod error;
mod filter;
mod resolver;
mod role;

pub use assembler::assemble;
pub use classifier::{classify, BundleFile, Classifier, DEFAULT_VOCABULARY_KEY_THRESHOLD};
pub use config::ResolverConfig;
pub use context::{ContentFormat, FsContext, MemoryContext, MemoryDirectory, ModelContext};
pub use error::{BundleError, Result};
pub use filter::BundleFilter;
pub use resolver::{AbsentReason, BundleResolver, SiblingLookup};
pub use role::Role;

// Re-export output types for convenience
pub use bundle_protocol::{
    Argument, CompositeModel, GraphModule, Module, ModuleKind, TokenizerModule, VocabularyModule,
};
