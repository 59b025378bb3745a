//! Desired/actual delta computation
//!
//! Pure functions, no I/O. Registrations are matched to repositories by the
//! name recovered from their ID under the configured prefix, cross-checked
//! against the name recorded on the material.

use seeder_core::domain::config_repo::ConfigRepo;
use seeder_core::domain::naming::RegistrationPrefix;
use seeder_core::domain::repository::RepositoryDescriptor;
use std::collections::HashSet;

/// Registrations to remove, and those left alone as foreign
#[derive(Debug, Default)]
pub struct Removals<'a> {
    pub stale: Vec<&'a ConfigRepo>,
    pub foreign: Vec<&'a ConfigRepo>,
}

/// Splits `actual` into stale registrations and foreign ones
///
/// A registration is stale when its ID parses under `prefix` and the decoded
/// repository name is not in `desired`. IDs that do not parse belong to
/// another prefix or another tool and are never candidates for removal.
///
/// Prefixes can overlap: under `acme`, the ID `acme-corp-svc` written for the
/// `acme-corp` prefix decodes to `corp-svc`. When the material records a name
/// that differs from the decoded one, the registration is foreign. Without a
/// material name the decoded ID alone decides.
///
/// A repository that lost its marker topic and one that was deleted outright
/// look identical here; both drop out of `desired` and are removed.
pub fn plan_removals<'a>(
    desired: &[RepositoryDescriptor],
    actual: &'a [ConfigRepo],
    prefix: &RegistrationPrefix,
) -> Removals<'a> {
    let wanted: HashSet<&str> = desired.iter().map(|r| r.name.as_str()).collect();
    let mut removals = Removals::default();

    for config_repo in actual {
        match prefix.repository_name(&config_repo.id) {
            Some(name) if config_repo.material_name().is_some_and(|m| m != name) => {
                removals.foreign.push(config_repo)
            }
            Some(name) if wanted.contains(name) => {}
            Some(_) => removals.stale.push(config_repo),
            None => removals.foreign.push(config_repo),
        }
    }

    removals
}
