//! Display-name resolution for report output.
//!
//! Names never influence the alphabet. Every failure here is recoverable and
//! only costs the report a label.

use std::{fmt, path::PathBuf, time::Duration};

use crate::{emoji_dict::EmojiDict, error::NameLookupError, reconcile::Reconciliation, Codepoint};

/// Looks up a human-readable name for a codepoint.
pub trait NameResolver {
    /// Returns the display name of `cp`.
    fn resolve(&self, cp: Codepoint) -> Result<String, NameLookupError>;
}

impl<R: NameResolver + ?Sized> NameResolver for &R {
    fn resolve(&self, cp: Codepoint) -> Result<String, NameLookupError> {
        (**self).resolve(cp)
    }
}

impl<R: NameResolver + ?Sized> NameResolver for Box<R> {
    fn resolve(&self, cp: Codepoint) -> Result<String, NameLookupError> {
        (**self).resolve(cp)
    }
}

/// Names taken from the dictionary's own comments. Works offline.
#[derive(Debug, Clone, Copy)]
pub struct DictNames<'d> {
    dict: &'d EmojiDict,
}

impl<'d> DictNames<'d> {
    /// Resolver backed by `dict`.
    pub fn new(dict: &'d EmojiDict) -> Self {
        DictNames { dict }
    }
}

impl NameResolver for DictNames<'_> {
    fn resolve(&self, cp: Codepoint) -> Result<String, NameLookupError> {
        self.dict
            .name_of(cp)
            .map(str::to_owned)
            .ok_or(NameLookupError::NotFound(cp))
    }
}

/// Fetches names over HTTP from a URL template containing `{hex}`.
///
/// The body of the response, trimmed, is the name.
pub struct RemoteNames {
    template: String,
    agent: ureq::Agent,
}

impl fmt::Debug for RemoteNames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteNames")
            .field("template", &self.template)
            .finish_non_exhaustive()
    }
}

impl RemoteNames {
    /// `template` is expanded with the lowercase hex codepoint in place of `{hex}`.
    pub fn new(template: impl Into<String>, timeout: Duration) -> Self {
        RemoteNames {
            template: template.into(),
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }

    fn url_for(&self, cp: Codepoint) -> String {
        self.template.replace("{hex}", &cp.to_hex())
    }
}

impl NameResolver for RemoteNames {
    fn resolve(&self, cp: Codepoint) -> Result<String, NameLookupError> {
        let url = self.url_for(cp);
        match self.agent.get(&url).call() {
            Ok(response) => {
                let body = response
                    .into_string()
                    .map_err(|e| NameLookupError::Unavailable {
                        codepoint: cp,
                        message: format!("read body: {e}"),
                    })?;
                let name = body.trim();
                if name.is_empty() {
                    Err(NameLookupError::NotFound(cp))
                } else {
                    Ok(name.to_owned())
                }
            }
            Err(ureq::Error::Status(404, _)) => Err(NameLookupError::NotFound(cp)),
            Err(e) => Err(NameLookupError::Unavailable {
                codepoint: cp,
                message: e.to_string(),
            }),
        }
    }
}

/// Caches another resolver's answers on disk, one file per codepoint named by
/// its lowercase hex value.
#[derive(Debug)]
pub struct CachedNames<R> {
    dir: PathBuf,
    inner: R,
}

impl<R: NameResolver> CachedNames<R> {
    /// Caches `inner` under `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>, inner: R) -> Self {
        CachedNames {
            dir: dir.into(),
            inner,
        }
    }

    fn entry_path(&self, cp: Codepoint) -> PathBuf {
        self.dir.join(cp.to_hex())
    }
}

impl<R: NameResolver> NameResolver for CachedNames<R> {
    fn resolve(&self, cp: Codepoint) -> Result<String, NameLookupError> {
        let path = self.entry_path(cp);
        match std::fs::read_to_string(&path) {
            Ok(name) if !name.trim().is_empty() => return Ok(name.trim().to_owned()),
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(NameLookupError::Cache {
                    codepoint: cp,
                    source: e,
                })
            }
        }
        let name = self.inner.resolve(cp)?;
        let stored = std::fs::create_dir_all(&self.dir).and_then(|_| std::fs::write(&path, &name));
        if let Err(e) = stored {
            tracing::warn!(path = %path.display(), error = %e, "failed to cache name");
        }
        Ok(name)
    }
}

/// Tries each resolver in turn, returning the first name found.
#[derive(Debug)]
pub struct FirstOf<A, B> {
    first: A,
    second: B,
}

impl<A: NameResolver, B: NameResolver> FirstOf<A, B> {
    /// Consults `first`, then `second`.
    pub fn new(first: A, second: B) -> Self {
        FirstOf { first, second }
    }
}

impl<A: NameResolver, B: NameResolver> NameResolver for FirstOf<A, B> {
    fn resolve(&self, cp: Codepoint) -> Result<String, NameLookupError> {
        match self.first.resolve(cp) {
            Ok(name) => Ok(name),
            Err(first_err) => self.second.resolve(cp).map_err(|e| match e {
                NameLookupError::NotFound(_) => first_err,
                other => other,
            }),
        }
    }
}

/// Fills in `name` for every substituted position, in position order.
///
/// Lookup failures are logged and leave the name empty. Returns how many
/// lookups failed.
pub fn annotate<R: NameResolver>(reconciliation: &mut Reconciliation, resolver: &R) -> usize {
    let mut failures = 0;
    for outcome in reconciliation.outcomes_mut() {
        let kind = outcome.kind();
        for record in outcome.records_mut() {
            if record.is_kept() {
                continue;
            }
            match resolver.resolve(record.final_codepoint) {
                Ok(name) => record.name = Some(name),
                Err(e) => {
                    failures += 1;
                    tracing::warn!(
                        %kind,
                        position = record.position,
                        error = %e,
                        "name lookup failed"
                    );
                }
            }
        }
    }
    failures
}
