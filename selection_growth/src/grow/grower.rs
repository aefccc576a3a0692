/// SelectionGrower — breadth-first selection growth over an implicit neighbor graph.
///
/// The graph is never built: neighbors of an instance are whatever the host's
/// NeighborFinder reports inside the instance's inflated hierarchy OBB.
/// Growth runs in passes. Every pass expands the whole current frontier and
/// the instances it accepts form the next frontier, so the nth pass reaches
/// instances n hops away from the seeds.
///
/// Everything mutable lives in a per-run state; the grower itself only
/// borrows the host. Results are handed back, never installed.

use std::fmt;
use rustc_hash::FxHashSet;
use crate::error::Result;
use crate::geometry::{Frustum, OBB};
use crate::host::{Grouping, GrowthHost, OverlapFilter};
use crate::scene::{AssetId, InstanceKey};
use super::config::GrowConstraintConfig;
use super::constraint::{Candidate, ConstraintEvaluator, Neighborhood, OriginalPositions};
use super::selection::SelectionSet;

const SOURCE: &str = "growth::SelectionGrower";

// ===== OUTCOME =====

/// Why a growth run did not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefusalReason {
    /// An exclusive transform edit is in progress
    TransformSessionActive,
}

impl fmt::Display for RefusalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefusalReason::TransformSessionActive => write!(f, "a transform session is active"),
        }
    }
}

/// Summary of a completed growth run.
#[derive(Debug, Clone, PartialEq)]
pub struct GrowReport {
    /// Grouping-rooted seeds followed by accepted instances in discovery order
    pub selection: SelectionSet,
    /// Number of instances added beyond the seeds
    pub grown_by: usize,
    /// Expansion passes executed (the last one finds nothing unless capped)
    pub passes: usize,
    /// Overlap queries issued
    pub queries: usize,
    /// The max-count cap stopped the run
    pub capped: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GrowOutcome {
    Grown(GrowReport),
    Refused(RefusalReason),
}

impl GrowOutcome {
    pub fn is_grown(&self) -> bool {
        matches!(self, GrowOutcome::Grown(_))
    }

    pub fn is_refused(&self) -> bool {
        matches!(self, GrowOutcome::Refused(_))
    }

    pub fn report(&self) -> Option<&GrowReport> {
        match self {
            GrowOutcome::Grown(report) => Some(report),
            GrowOutcome::Refused(_) => None,
        }
    }

    pub fn into_report(self) -> Option<GrowReport> {
        match self {
            GrowOutcome::Grown(report) => Some(report),
            GrowOutcome::Refused(_) => None,
        }
    }

    /// Instances added by the run (0 when refused).
    pub fn grown_by(&self) -> usize {
        self.report().map_or(0, |report| report.grown_by)
    }
}

// ===== GROWER =====

pub struct SelectionGrower<'h, H: GrowthHost + ?Sized> {
    host: &'h H,
}

impl<'h, H: GrowthHost + ?Sized> SelectionGrower<'h, H> {
    pub fn new(host: &'h H) -> Self {
        Self { host }
    }

    /// Grow `seeds` under `config`.
    ///
    /// `view` is only consulted when `config.ignore_out_of_view` is set.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if the configuration fails validation.
    pub fn grow(
        &self,
        seeds: &SelectionSet,
        config: &GrowConstraintConfig,
        view: Option<&Frustum>,
    ) -> Result<GrowOutcome> {
        config.validate()?;

        if self.host.transform_session_active() {
            crate::grow_warn!(SOURCE, "Growth refused: {}", RefusalReason::TransformSessionActive);
            return Ok(GrowOutcome::Refused(RefusalReason::TransformSessionActive));
        }

        let roots = seeds.grouping_roots(self.host);
        crate::grow_debug!(SOURCE,
            "Growing {} seed(s) ({} grouping root(s)): threshold {}, {} axis constraint(s), identity {}, rotation {:?}, cap {:?}",
            seeds.len(), roots.len(), config.distance_threshold, config.active_axis_count(),
            config.match_asset_identity, config.rotation, config.count_cap());

        let origins = if config.has_positional_constraint() {
            OriginalPositions::snapshot(self.host, &roots, config.bounds_kinds)
        } else {
            OriginalPositions::default()
        };

        let seed_identities: FxHashSet<AssetId> = if config.match_asset_identity {
            roots.iter().filter_map(|key| self.host.asset_id(key)).collect()
        } else {
            FxHashSet::default()
        };

        if config.ignore_out_of_view && view.is_none() {
            crate::grow_warn!(SOURCE, "Out-of-view filtering requested without a view frustum; treating everything as visible");
        }
        let view = if config.ignore_out_of_view { view } else { None };

        let evaluator = ConstraintEvaluator::new(config, &origins, seed_identities, view);
        let report = GrowRun::new(self.host, config, roots).run(&evaluator);

        crate::grow_info!(SOURCE, "Grew by {} in {} pass(es), {} overlap queries{}",
            report.grown_by, report.passes, report.queries,
            if report.capped { " (max count reached)" } else { "" });

        Ok(GrowOutcome::Grown(report))
    }
}

// ===== RUN STATE =====

/// Transient state of one growth run.
struct GrowRun<'h, 'c, H: GrowthHost + ?Sized> {
    host: &'h H,
    config: &'c GrowConstraintConfig,
    /// Seeds followed by accepted roots; doubles as the visited set
    result: SelectionSet,
    /// Visited roots and all of their descendants, excluded from queries
    ignore: FxHashSet<InstanceKey>,
    frontier: Vec<InstanceKey>,
    next: Vec<InstanceKey>,
    seed_count: usize,
    passes: usize,
    queries: usize,
    capped: bool,
}

impl<'h, 'c, H: GrowthHost + ?Sized> GrowRun<'h, 'c, H> {
    fn new(host: &'h H, config: &'c GrowConstraintConfig, roots: SelectionSet) -> Self {
        let mut ignore = FxHashSet::default();
        let mut members = Vec::new();
        for root in roots.iter() {
            host.collect_hierarchy(root, &mut members);
        }
        ignore.extend(members);

        let capped = config.count_cap().is_some_and(|cap| roots.len() >= cap);
        if capped {
            crate::grow_debug!(SOURCE, "Seeds already meet the max count; nothing to grow");
        }

        Self {
            host,
            config,
            frontier: roots.iter().collect(),
            next: Vec::new(),
            seed_count: roots.len(),
            result: roots,
            ignore,
            passes: 0,
            queries: 0,
            capped,
        }
    }

    fn run(mut self, evaluator: &ConstraintEvaluator<'_>) -> GrowReport {
        let inflation = self.config.query_inflation();
        let mut found = Vec::new();
        let mut members = Vec::new();

        'expand: while !self.frontier.is_empty() && !self.capped {
            self.passes += 1;
            let frontier = std::mem::take(&mut self.frontier);

            for &source in &frontier {
                members.clear();
                self.host.collect_hierarchy(source, &mut members);
                if !self.any_growable(&members) {
                    crate::grow_trace!(SOURCE, "Skipping non-growable source {:?}", source);
                    continue;
                }
                let Some(source_obb) = self.valid_obb(source) else {
                    crate::grow_trace!(SOURCE, "Skipping source {:?} with degenerate bounds", source);
                    continue;
                };
                let Some(source_rotation) = self.host.world_rotation(source) else { continue };

                let query_box = source_obb.inflated(inflation);
                let filter = OverlapFilter::new(self.config.growable_kinds, &self.ignore)
                    .with_grouping(Grouping::GroupingRoots);
                found.clear();
                self.host.query_overlap(&query_box, &filter, &mut found);
                self.queries += 1;

                let neighborhood = Neighborhood { source_rotation, query_box };

                for &hit in &found {
                    let root = self.host.grouping_root(hit);
                    if self.result.contains(root) {
                        continue;
                    }
                    // An ancestor of a visited instance would select that instance twice
                    members.clear();
                    self.host.collect_hierarchy(root, &mut members);
                    if members.iter().any(|member| self.ignore.contains(member)) {
                        crate::grow_trace!(SOURCE, "Skipping candidate {:?} enclosing a visited instance", root);
                        continue;
                    }
                    let Some(candidate) = self.candidate(root) else {
                        crate::grow_trace!(SOURCE, "Skipping candidate {:?} with degenerate bounds", root);
                        continue;
                    };
                    if !evaluator.accepts(&candidate, &neighborhood) {
                        continue;
                    }

                    self.result.insert(root);
                    self.next.push(root);
                    self.ignore.extend(members.iter().copied());

                    if self.config.count_cap().is_some_and(|cap| self.result.len() >= cap) {
                        crate::grow_debug!(SOURCE, "Max count {} reached during pass {}", self.result.len(), self.passes);
                        self.capped = true;
                        break 'expand;
                    }
                }
            }

            crate::grow_trace!(SOURCE, "Pass {}: frontier {}, accepted {}",
                self.passes, frontier.len(), self.next.len());
            std::mem::swap(&mut self.frontier, &mut self.next);
        }

        GrowReport {
            grown_by: self.result.len() - self.seed_count,
            selection: self.result,
            passes: self.passes,
            queries: self.queries,
            capped: self.capped,
        }
    }

    /// A unit is growable when any of its members has a growable kind.
    fn any_growable(&self, members: &[InstanceKey]) -> bool {
        members.iter().any(|&member| {
            self.host.kind(member).is_some_and(|kind| self.config.growable_kinds.includes(kind))
        })
    }

    fn valid_obb(&self, key: InstanceKey) -> Option<OBB> {
        self.host
            .hierarchy_obb(key, self.config.bounds_kinds)
            .filter(OBB::is_valid)
    }

    fn candidate(&self, key: InstanceKey) -> Option<Candidate> {
        let obb = self.valid_obb(key)?;
        let view_bounds = if self.config.ignore_out_of_view {
            self.host.hierarchy_aabb(key)
        } else {
            None
        };
        Some(Candidate {
            key,
            asset_id: self.host.asset_id(key),
            center: obb.center,
            rotation: self.host.world_rotation(key)?,
            view_bounds,
        })
    }
}

#[cfg(test)]
#[path = "grower_tests.rs"]
mod tests;
