//! Apply and delete orchestration.

use std::fmt;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::fieldpath::Path;
use crate::manifest::{Manifest, ResourceId};
use crate::merge::merge_into_with_changes;

use super::client::{client_error, Client};

/// ApplyOptions controls how a manifest is applied or deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOptions {
    /// Decide what would happen without writing anything.
    pub dry_run: bool,
}

impl ApplyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Outcome is what happened (or would happen) to one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created,
    /// Updated, with the live fields that changed.
    Updated(Vec<Path>),
    Unchanged,
    Deleted,
    /// Delete requested but the object did not exist.
    Absent,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Created => write!(f, "created"),
            Outcome::Updated(paths) => write!(f, "updated ({} fields)", paths.len()),
            Outcome::Unchanged => write!(f, "unchanged"),
            Outcome::Deleted => write!(f, "deleted"),
            Outcome::Absent => write!(f, "absent"),
        }
    }
}

/// ApplyReport lists the outcome for every resource, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub dry_run: bool,
    pub entries: Vec<(ResourceId, Outcome)>,
}

impl ApplyReport {
    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.entries.iter().filter(|(_, o)| pred(o)).count()
    }

    pub fn created(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Created))
    }

    pub fn updated(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Updated(_)))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Unchanged))
    }

    pub fn deleted(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Deleted))
    }

    pub fn absent(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Absent))
    }

    /// Returns true if any resource was (or would be) written.
    pub fn has_changes(&self) -> bool {
        self.created() + self.updated() + self.deleted() > 0
    }

    /// Returns a one-line summary such as `1 created, 2 updated, 0 unchanged`.
    pub fn summary(&self) -> String {
        let mut summary = if self.deleted() + self.absent() > 0 {
            format!("{} deleted, {} absent", self.deleted(), self.absent())
        } else {
            format!(
                "{} created, {} updated, {} unchanged",
                self.created(),
                self.updated(),
                self.unchanged()
            )
        };
        if self.dry_run {
            summary.push_str(" (dry run)");
        }
        summary
    }
}

/// Applies every resource of `manifest`, in source order.
///
/// A resource missing from the target system is created from a copy of the
/// desired document. An existing one is fetched, the desired document is
/// merged onto it, and it is written back only if the merge changed it.
pub fn apply<C>(manifest: &Manifest, client: &mut C, options: &ApplyOptions) -> Result<ApplyReport>
where
    C: Client + ?Sized,
{
    let mut report = ApplyReport {
        dry_run: options.dry_run,
        entries: Vec::with_capacity(manifest.len()),
    };

    for (index, resource) in manifest.iter().enumerate() {
        let desired = resource
            .as_map()
            .map_err(|e| Error::identity(index + 1, e))?;
        let id = resource
            .identity()
            .map_err(|e| Error::identity(index + 1, e))?;

        let outcome = match client.get(&id).map_err(client_error(&id))? {
            None => {
                if !options.dry_run {
                    client
                        .create(&id, resource.value())
                        .map_err(client_error(&id))?;
                }
                Outcome::Created
            }
            Some(mut live) => {
                let found = live.type_name();
                let live_map = live
                    .as_map_mut()
                    .ok_or_else(|| Error::LiveNotMap {
                        id: id.clone(),
                        found,
                    })?;
                let changes = merge_into_with_changes(desired, live_map);
                if changes.is_empty() {
                    Outcome::Unchanged
                } else {
                    if !options.dry_run {
                        client.update(&id, &live).map_err(client_error(&id))?;
                    }
                    Outcome::Updated(changes)
                }
            }
        };

        debug!(%id, %outcome, dry_run = options.dry_run, "applied resource");
        report.entries.push((id, outcome));
    }

    info!(summary = %report.summary(), "apply finished");
    Ok(report)
}

/// Deletes every resource of `manifest`, in reverse source order.
///
/// Resources that do not exist are reported as [`Outcome::Absent`].
pub fn delete<C>(manifest: &Manifest, client: &mut C, options: &ApplyOptions) -> Result<ApplyReport>
where
    C: Client + ?Sized,
{
    let ids = manifest.identities()?;
    let mut report = ApplyReport {
        dry_run: options.dry_run,
        entries: Vec::with_capacity(ids.len()),
    };

    for id in ids.into_iter().rev() {
        let existed = if options.dry_run {
            client.get(&id).map_err(client_error(&id))?.is_some()
        } else {
            client.delete(&id).map_err(client_error(&id))?
        };
        let outcome = if existed {
            Outcome::Deleted
        } else {
            Outcome::Absent
        };
        debug!(%id, %outcome, dry_run = options.dry_run, "deleted resource");
        report.entries.push((id, outcome));
    }

    info!(summary = %report.summary(), "delete finished");
    Ok(report)
}
