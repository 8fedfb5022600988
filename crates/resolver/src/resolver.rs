use crate::assembler::assemble;
use crate::classifier::{BundleFile, Classifier};
use crate::config::ResolverConfig;
use crate::context::{ContentFormat, ModelContext};
use crate::error::{BundleError, Result};
use crate::role::Role;
use bundle_protocol::CompositeModel;

/// Why a conventionally named sibling did not join the bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbsentReason {
    /// The sibling name is the anchor itself
    IsAnchor,
    /// The host could not open the file
    FetchFailed(String),
    /// The file opened but has no recognized shape (or is not JSON)
    Unrecognized,
    /// Strict mode only: the content disagrees with the file name
    RoleMismatch { expected: Role, actual: Role },
}

/// Outcome of speculatively fetching and re-classifying one sibling
#[derive(Debug, Clone, PartialEq)]
pub enum SiblingLookup {
    Found(BundleFile),
    Absent(AbsentReason),
}

impl SiblingLookup {
    pub fn is_found(&self) -> bool {
        matches!(self, SiblingLookup::Found(_))
    }

    pub fn into_file(self) -> Option<BundleFile> {
        match self {
            SiblingLookup::Found(file) => Some(file),
            SiblingLookup::Absent(_) => None,
        }
    }
}

/// Fetch `name` next to `context` and classify what comes back.
pub(crate) async fn fetch_classified(
    classifier: &Classifier,
    context: &dyn ModelContext,
    name: &str,
) -> std::result::Result<BundleFile, AbsentReason> {
    if name == context.identifier() {
        return Err(AbsentReason::IsAnchor);
    }
    let sibling = context
        .fetch(name)
        .await
        .map_err(|err| AbsentReason::FetchFailed(err.to_string()))?;
    classifier
        .classify_context(sibling.as_ref())
        .await
        .ok_or(AbsentReason::Unrecognized)
}

#[derive(Default)]
struct BundleSlots {
    config: Option<BundleFile>,
    tokenizer: Option<BundleFile>,
    tokenizer_config: Option<BundleFile>,
    vocabulary: Option<BundleFile>,
}

impl BundleSlots {
    fn place(&mut self, role: Role, file: BundleFile) {
        let slot = match role {
            Role::Config => &mut self.config,
            Role::Tokenizer => &mut self.tokenizer,
            Role::TokenizerConfig => &mut self.tokenizer_config,
            Role::Vocabulary => &mut self.vocabulary,
        };
        *slot = Some(file);
    }

    fn assemble(&self) -> Result<CompositeModel> {
        assemble(
            self.config.as_ref(),
            self.tokenizer.as_ref(),
            self.tokenizer_config.as_ref(),
            self.vocabulary.as_ref(),
        )
    }
}

/// Completes a bundle around an anchor file by probing its conventional siblings
#[derive(Debug, Clone)]
pub struct BundleResolver {
    config: ResolverConfig,
    classifier: Classifier,
}

impl Default for BundleResolver {
    fn default() -> Self {
        let config = ResolverConfig::default();
        Self {
            classifier: Classifier::new(&config),
            config,
        }
    }
}

impl BundleResolver {
    pub fn new(config: ResolverConfig) -> Result<Self> {
        config.validate().map_err(BundleError::invalid_config)?;
        Ok(Self {
            classifier: Classifier::new(&config),
            config,
        })
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Fetch the conventional file for `expected` next to `context`.
    ///
    /// Failures never escape; they come back as [`SiblingLookup::Absent`].
    pub async fn lookup_sibling(&self, context: &dyn ModelContext, expected: Role) -> SiblingLookup {
        let file = match fetch_classified(&self.classifier, context, expected.file_name()).await {
            Ok(file) => file,
            Err(reason) => return SiblingLookup::Absent(reason),
        };
        if file.role != expected {
            if self.config.strict_roles {
                return SiblingLookup::Absent(AbsentReason::RoleMismatch {
                    expected,
                    actual: file.role,
                });
            }
            log::warn!(
                "Sibling '{}' has the shape of a {} file, not {}; keeping it",
                file.identifier,
                file.role,
                expected
            );
        }
        SiblingLookup::Found(file)
    }

    /// Host entry point: resolve a context the host tagged with `format_tag`.
    pub async fn open(
        &self,
        context: &dyn ModelContext,
        format_tag: &str,
    ) -> Result<CompositeModel> {
        let role = Role::from_format_tag(format_tag)?;
        self.resolve(role, context).await
    }

    /// Resolve the bundle anchored at `context`, which plays `role`.
    pub async fn resolve(&self, role: Role, context: &dyn ModelContext) -> Result<CompositeModel> {
        let value = context
            .peek(ContentFormat::Json)
            .await
            .ok_or_else(|| BundleError::AnchorUndecodable(context.identifier().to_string()))?;
        let anchor = BundleFile::new(context.identifier(), role, value);
        self.resolve_anchor(anchor, context).await
    }

    /// Resolve around an anchor that has already been classified.
    pub async fn resolve_anchor(
        &self,
        anchor: BundleFile,
        context: &dyn ModelContext,
    ) -> Result<CompositeModel> {
        let siblings = anchor.role.siblings();
        let lookups = if self.config.concurrent_fetch {
            let (first, second, third) = tokio::join!(
                self.lookup_sibling(context, siblings[0]),
                self.lookup_sibling(context, siblings[1]),
                self.lookup_sibling(context, siblings[2]),
            );
            [first, second, third]
        } else {
            [
                self.lookup_sibling(context, siblings[0]).await,
                self.lookup_sibling(context, siblings[1]).await,
                self.lookup_sibling(context, siblings[2]).await,
            ]
        };

        let mut slots = BundleSlots::default();
        for (role, lookup) in siblings.into_iter().zip(lookups) {
            match lookup {
                SiblingLookup::Found(file) => slots.place(role, file),
                SiblingLookup::Absent(reason) => {
                    log::debug!(
                        "No {} next to '{}': {:?}",
                        role.file_name(),
                        anchor.identifier,
                        reason
                    );
                }
            }
        }
        slots.place(anchor.role, anchor);
        slots.assemble()
    }
}
