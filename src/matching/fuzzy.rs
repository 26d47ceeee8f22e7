//! Approximate name matching against a registry index.
//!
//! Every candidate name of a sanctioned entity (names and aliases) is compared
//! in two query forms, `normalize(name)` and `normalize(transliterate(name))`,
//! against every normalized registry name. Cost is O(S * C * R); the per-entity
//! searches are independent, so [`FuzzyMatcher::match_all_parallel`] spreads
//! them over a small worker pool sharing one read-only index.

use std::collections::HashMap;
use std::thread;

use crossbeam_channel::{bounded, unbounded};
use tracing::{debug, info};

use crate::entity::Entity;
use crate::error::{ExecutionError, SanctionsError, SanctionsResult, ValidationError};
use crate::matching::similarity::{token_set_score, TokenSet};
use crate::matching::{MatchRecord, MatchType};
use crate::normalize::{normalize, query_forms};

/// Candidates kept per query form.
pub const MAX_CANDIDATES_PER_QUERY: usize = 5;

/// Chunks handed to each worker, on average.
const CHUNKS_PER_WORKER: usize = 4;

#[derive(Debug)]
struct IndexedName<'r> {
    name: String,
    tokens: TokenSet,
    entity: &'r Entity,
}

fn registry_name(entity: &Entity) -> &str {
    if entity.display_name.trim().is_empty() {
        entity.names.first().map_or("", String::as_str)
    } else {
        &entity.display_name
    }
}

/// Lookup from normalized registry name to registry entity.
///
/// When several registry entities normalize to the same name the last one
/// wins; the name keeps the position where it was first seen.
#[derive(Debug, Default)]
pub struct RegistryIndex<'r> {
    entries: Vec<IndexedName<'r>>,
    positions: HashMap<String, usize>,
}

impl<'r> RegistryIndex<'r> {
    /// Indexes the display names of `registry`.
    ///
    /// Entities without a display name are indexed under their first name;
    /// entities whose name normalizes to nothing are skipped.
    #[must_use]
    pub fn build(registry: &'r [Entity]) -> Self {
        let mut positions: HashMap<String, usize> = HashMap::with_capacity(registry.len());
        let mut entries: Vec<IndexedName<'r>> = Vec::with_capacity(registry.len());
        let mut collisions = 0usize;

        for entity in registry {
            let name = normalize(registry_name(entity));
            if name.is_empty() {
                continue;
            }
            if let Some(&pos) = positions.get(&name) {
                entries[pos].entity = entity;
                collisions += 1;
                continue;
            }
            positions.insert(name.clone(), entries.len());
            entries.push(IndexedName {
                tokens: TokenSet::new(&name),
                name,
                entity,
            });
        }

        debug!(
            registry = registry.len(),
            names = entries.len(),
            collisions,
            "built registry name index"
        );
        Self { entries, positions }
    }

    /// Number of distinct normalized names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entity currently stored under a normalized name.
    #[must_use]
    pub fn get(&self, normalized_name: &str) -> Option<&'r Entity> {
        self.positions
            .get(normalized_name)
            .map(|&pos| self.entries[pos].entity)
    }
}

/// Fuzzy matcher over a fixed registry.
#[derive(Debug)]
pub struct FuzzyMatcher<'r> {
    index: RegistryIndex<'r>,
    threshold: u32,
}

impl<'r> FuzzyMatcher<'r> {
    /// Indexes `registry` and validates `name_threshold` (0-100).
    pub fn new(registry: &'r [Entity], name_threshold: u32) -> Result<Self, ValidationError> {
        Self::from_index(RegistryIndex::build(registry), name_threshold)
    }

    /// Wraps an existing index.
    pub fn from_index(index: RegistryIndex<'r>, name_threshold: u32) -> Result<Self, ValidationError> {
        ValidationError::check_threshold("name_match_threshold", i64::from(name_threshold))?;
        Ok(Self {
            index,
            threshold: name_threshold,
        })
    }

    /// The registry index.
    #[must_use]
    pub fn index(&self) -> &RegistryIndex<'r> {
        &self.index
    }

    /// Matches every candidate name of one sanctioned entity.
    #[must_use]
    pub fn match_entity(&self, sanctioned: &Entity) -> Vec<MatchRecord> {
        let mut matches = Vec::new();
        if self.index.is_empty() {
            return matches;
        }

        let threshold = f64::from(self.threshold);
        for name in sanctioned.candidate_names() {
            for form in query_forms(name) {
                let query = TokenSet::new(&form);
                let mut scored: Vec<(f64, &IndexedName<'r>)> = self
                    .index
                    .entries
                    .iter()
                    .map(|entry| (token_set_score(&query, &entry.tokens), entry))
                    .filter(|(score, _)| *score >= threshold)
                    .collect();

                scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.name.cmp(&b.1.name)));
                scored.truncate(MAX_CANDIDATES_PER_QUERY);

                for (score, entry) in scored {
                    matches.push(MatchRecord::new(
                        sanctioned,
                        entry.entity,
                        MatchType::FuzzyName,
                        score,
                        format!("{form} -> {}", entry.name),
                    ));
                }
            }
        }

        if !matches.is_empty() {
            debug!(
                entity = %sanctioned.entity_id,
                matches = matches.len(),
                "fuzzy candidates found"
            );
        }
        matches
    }

    /// Matches all sanctioned entities on the calling thread.
    #[must_use]
    pub fn match_all(&self, sanctioned: &[Entity]) -> Vec<MatchRecord> {
        let matches: Vec<MatchRecord> = sanctioned
            .iter()
            .flat_map(|entity| self.match_entity(entity))
            .collect();
        info!(
            sanctioned = sanctioned.len(),
            registry_names = self.index.len(),
            threshold = self.threshold,
            matches = matches.len(),
            "fuzzy matching complete"
        );
        matches
    }

    /// Matches all sanctioned entities on `workers` scoped threads.
    ///
    /// Work is dispatched in chunks over a bounded channel. Output order is
    /// identical to [`FuzzyMatcher::match_all`].
    pub fn match_all_parallel(
        &self,
        sanctioned: &[Entity],
        workers: usize,
    ) -> SanctionsResult<Vec<MatchRecord>> {
        if workers <= 1 || sanctioned.len() < 2 {
            return Ok(self.match_all(sanctioned));
        }

        let workers = workers.min(sanctioned.len());
        let matches = run_chunked(sanctioned, workers, |entity| self.match_entity(entity))?;
        info!(
            sanctioned = sanctioned.len(),
            registry_names = self.index.len(),
            threshold = self.threshold,
            workers,
            matches = matches.len(),
            "parallel fuzzy matching complete"
        );
        Ok(matches)
    }
}

/// Applies `work` to every item on `workers` scoped threads, keeping input
/// order in the output.
///
/// Items are dispatched in chunks over a bounded channel. Every worker is
/// joined before returning; a panicked worker is reported as
/// [`ExecutionError::WorkerPanicked`] even when it also broke dispatch.
fn run_chunked<T, R, F>(items: &[T], workers: usize, work: F) -> SanctionsResult<Vec<R>>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> Vec<R> + Sync,
{
    let chunk_size = items.len().div_ceil(workers * CHUNKS_PER_WORKER).max(1);
    let chunks: Vec<&[T]> = items.chunks(chunk_size).collect();
    let work = &work;

    let results = thread::scope(|scope| -> SanctionsResult<Vec<Vec<R>>> {
        let (job_tx, job_rx) = bounded::<(usize, &[T])>(workers * 2);
        let (out_tx, out_rx) = unbounded::<(usize, Vec<R>)>();

        let mut handles = Vec::with_capacity(workers);
        for idx in 0..workers {
            let rx = job_rx.clone();
            let tx = out_tx.clone();
            let handle = thread::Builder::new()
                .name(format!("snm-fuzzy-{idx}"))
                .spawn_scoped(scope, move || {
                    for (chunk_idx, chunk) in rx {
                        let found: Vec<R> = chunk.iter().flat_map(work).collect();
                        if tx.send((chunk_idx, found)).is_err() {
                            break;
                        }
                    }
                })
                .map_err(|e| SanctionsError::internal(format!("failed to spawn fuzzy worker: {e}")))?;
            handles.push(handle);
        }
        drop(job_rx);
        drop(out_tx);

        let mut dispatch_failed = false;
        for job in chunks.iter().copied().enumerate() {
            if job_tx.send(job).is_err() {
                dispatch_failed = true;
                break;
            }
        }
        // Close the queue: workers drain it then exit.
        drop(job_tx);

        let mut slots: Vec<Option<Vec<R>>> = (0..chunks.len()).map(|_| None).collect();
        for (chunk_idx, found) in out_rx {
            slots[chunk_idx] = Some(found);
        }

        let mut panicked = None;
        for (worker, handle) in handles.into_iter().enumerate() {
            if handle.join().is_err() && panicked.is_none() {
                panicked = Some(worker);
            }
        }
        if let Some(worker) = panicked {
            return Err(ExecutionError::WorkerPanicked { worker }.into());
        }
        if dispatch_failed {
            return Err(ExecutionError::Disconnected {
                stage: "fuzzy job dispatch".to_string(),
            }
            .into());
        }

        slots
            .into_iter()
            .map(|slot| {
                slot.ok_or_else(|| {
                    SanctionsError::from(ExecutionError::Disconnected {
                        stage: "fuzzy result collection".to_string(),
                    })
                })
            })
            .collect()
    })?;

    Ok(results.into_iter().flatten().collect())
}

/// Fuzzy-matches `sanctioned` against `registry` on the calling thread.
pub fn fuzzy_match(
    sanctioned: &[Entity],
    registry: &[Entity],
    name_threshold: u32,
) -> Result<Vec<MatchRecord>, ValidationError> {
    let matcher = FuzzyMatcher::new(registry, name_threshold)?;
    Ok(matcher.match_all(sanctioned))
}
