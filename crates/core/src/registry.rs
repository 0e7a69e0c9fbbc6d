// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job registry: name -> job, frozen after configuration

use crate::config::ConfigError;
use crate::job::Job;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

/// Mutable registry used while configuration is being applied. Duplicate
/// names are rejected at insert time.
#[derive(Default)]
pub struct RegistryBuilder {
    jobs: HashMap<String, Job>,
}

impl RegistryBuilder {
    pub fn insert(&mut self, job: Job) -> Result<(), ConfigError> {
        match self.jobs.entry(job.name.clone()) {
            Entry::Occupied(entry) => Err(ConfigError::DuplicateJob(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(job);
                Ok(())
            }
        }
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Job> {
        self.jobs.get_mut(name)
    }

    /// Freeze into the shared read-only registry.
    pub fn freeze(self) -> JobRegistry {
        JobRegistry {
            jobs: Arc::new(
                self.jobs
                    .into_iter()
                    .map(|(name, job)| (name, Arc::new(job)))
                    .collect(),
            ),
        }
    }
}

/// Read-only registry shared between hooks and the master loop. Cloning is
/// cheap; the underlying map never changes after [`RegistryBuilder::freeze`].
#[derive(Clone, Default)]
pub struct JobRegistry {
    jobs: Arc<HashMap<String, Arc<Job>>>,
}

impl JobRegistry {
    pub fn get(&self, name: &str) -> Option<Arc<Job>> {
        self.jobs.get(name).map(Arc::clone)
    }

    pub fn jobs(&self) -> impl Iterator<Item = &Arc<Job>> {
        self.jobs.values()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
