//! Best-first (A*) search over relocation states.
//!
//! Nodes live in an arena for the duration of one search and refer to their
//! parent by index. Once a goal is found only the path back to the root is
//! copied out; everything else is dropped with the arena.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info, trace};

use crate::config::SearchConfig;
use crate::grid::Grid;
use crate::moves::successors;
use crate::node::{NodeId, StateKey, StateNode};
use crate::solution::{reconstruct, Exhaustion, SolveOutcome, SolveReport};

const PROGRESS_INTERVAL: u64 = 10_000;

/// Counters collected over one search.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct SearchStats {
    pub expanded: u64,
    pub generated: u64,
    pub pushed: u64,
    /// Successors dropped because a cheaper path to the same key was known.
    pub pruned: u64,
    /// Queue entries popped after their key had already been closed.
    pub stale: u64,
    pub reopened: u64,
    pub peak_open: usize,
}

/// Queue entry, ordered so that `BinaryHeap` pops the lowest `(f, seq)` first.
#[derive(PartialEq, Eq, Debug)]
struct OpenEntry {
    f_cost: u32,
    seq: u64,
    node: NodeId,
}

impl Ord for OpenEntry {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

enum Termination {
    Goal(NodeId),
    Exhausted(Exhaustion),
}

/// What happened to one generated successor.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Admission {
    /// A strictly cheaper path to the same key was already recorded.
    Pruned,
    /// Queued; `reopened` is set when its key had already been closed.
    Pushed { reopened: bool },
}

/// One balancing search. Owns every structure it touches; nothing is shared
/// between two searches.
pub struct BalanceSearch {
    config: SearchConfig,
    arena: Vec<StateNode>,
    open: BinaryHeap<OpenEntry>,
    best_g: FxHashMap<StateKey, u32>,
    closed: FxHashSet<StateKey>,
    next_seq: u64,
    stats: SearchStats,
}

impl BalanceSearch {
    pub fn new(grid: Grid, config: SearchConfig) -> Self {
        let root = StateNode::root(grid, config.heuristic);
        let mut arena = Vec::with_capacity(1024);
        arena.push(root);

        BalanceSearch {
            config,
            arena,
            open: BinaryHeap::with_capacity(1024),
            best_g: FxHashMap::default(),
            closed: FxHashSet::default(),
            next_seq: 0,
            stats: SearchStats::default(),
        }
    }

    #[inline]
    pub fn root(&self) -> &StateNode {
        &self.arena[0]
    }

    pub fn solve(mut self) -> SolveReport {
        if self.root().is_balanced() {
            debug!("initial state already balanced");
            return SolveReport {
                outcome: SolveOutcome::AlreadyBalanced,
                stats: self.stats,
            };
        }

        debug!(
            containers = self.root().containers().len(),
            h = self.root().h_cost(),
            heuristic = ?self.config.heuristic,
            "starting balance search"
        );

        let outcome = match self.run() {
            Termination::Goal(goal) => SolveOutcome::Solved(reconstruct(&self.arena, goal)),
            Termination::Exhausted(reason) => SolveOutcome::NoSolution(reason),
        };

        info!(
            expanded = self.stats.expanded,
            generated = self.stats.generated,
            pushed = self.stats.pushed,
            pruned = self.stats.pruned,
            stale = self.stats.stale,
            reopened = self.stats.reopened,
            peak_open = self.stats.peak_open,
            "balance search finished"
        );

        SolveReport {
            outcome,
            stats: self.stats,
        }
    }

    fn run(&mut self) -> Termination {
        let include_crane = self.config.key_includes_crane;
        let heuristic = self.config.heuristic;

        let root_key = self.arena[0].key(include_crane);
        self.best_g.insert(root_key, 0);
        self.push(NodeId(0));

        while let Some(entry) = self.open.pop() {
            let current = entry.node;
            let key = self.arena[current.index()].key(include_crane);

            if self.closed.contains(&key) {
                self.stats.stale += 1;
                continue;
            }

            if self.arena[current.index()].is_balanced() {
                return Termination::Goal(current);
            }

            if let Some(limit) = self.config.max_expansions {
                if self.stats.expanded >= limit {
                    debug!(limit, "expansion limit reached");
                    return Termination::Exhausted(Exhaustion::ExpansionLimit);
                }
            }

            self.stats.expanded += 1;
            if self.stats.expanded % PROGRESS_INTERVAL == 0 {
                trace!(
                    expanded = self.stats.expanded,
                    open = self.open.len(),
                    f = entry.f_cost,
                    "search progress"
                );
            }

            let children: Vec<StateNode> =
                successors(&self.arena[current.index()], current, heuristic)
                    .map(|(child, _)| child)
                    .collect();

            for child in children {
                self.stats.generated += 1;
                if let Admission::Pushed { reopened: true } = self.admit(child, include_crane) {
                    trace!(reopened = self.stats.reopened, "reopened closed state");
                }
            }

            self.closed.insert(key);
        }

        Termination::Exhausted(Exhaustion::SearchSpace)
    }

    /// Records `child` as the best known path to its key and queues it,
    /// unless a strictly cheaper path is already known. Equal cost still
    /// admits, and a closed key is reopened.
    fn admit(&mut self, child: StateNode, include_crane: bool) -> Admission {
        let key = child.key(include_crane);

        if let Some(&known) = self.best_g.get(&key) {
            if known < child.g_cost() {
                self.stats.pruned += 1;
                return Admission::Pruned;
            }
        }

        let reopened = self.closed.remove(&key);
        if reopened {
            self.stats.reopened += 1;
        }
        self.best_g.insert(key, child.g_cost());

        let id = NodeId(self.arena.len() as u32);
        self.arena.push(child);
        self.push(id);
        Admission::Pushed { reopened }
    }

    #[inline]
    fn push(&mut self, node: NodeId) {
        let f_cost = self.arena[node.index()].f_cost();
        self.open.push(OpenEntry {
            f_cost,
            seq: self.next_seq,
            node,
        });
        self.next_seq += 1;
        self.stats.pushed += 1;
        self.stats.peak_open = self.stats.peak_open.max(self.open.len());
    }
}
