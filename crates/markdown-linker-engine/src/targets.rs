//! The fixed set of link targets and their search identities.

use crate::resolve::{self, ResolveContext};
use std::fmt;

/// Kind of entity a link points at; the part of the action after `jump-`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    All,
    Class,
    File,
    Symbol,
    Action,
}

impl TargetKind {
    /// Every kind, in declaration order
    pub const ALL: [TargetKind; 5] = [
        TargetKind::All,
        TargetKind::Class,
        TargetKind::File,
        TargetKind::Symbol,
        TargetKind::Action,
    ];

    pub fn key(self) -> &'static str {
        match self {
            TargetKind::All => "all",
            TargetKind::Class => "class",
            TargetKind::File => "file",
            TargetKind::Symbol => "symbol",
            TargetKind::Action => "action",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    /// Search contributor that lists entities of this kind
    pub fn search_contributor_id(self) -> &'static str {
        match self {
            TargetKind::All => "SearchEverywhereContributor.All",
            TargetKind::Class => "ClassSearchEverywhereContributor",
            TargetKind::File => "FileSearchEverywhereContributor",
            TargetKind::Symbol => "SymbolSearchEverywhereContributor",
            TargetKind::Action => "ActionSearchEverywhereContributor",
        }
    }

    pub fn from_search_contributor_id(id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.search_contributor_id() == id)
    }

    /// Action that opens the same search interactively
    pub fn action_id(self) -> &'static str {
        match self {
            TargetKind::All => "SearchEverywhere",
            TargetKind::Class => "GotoClass",
            TargetKind::File => "GotoFile",
            TargetKind::Symbol => "GotoSymbol",
            TargetKind::Action => "GotoAction",
        }
    }

    /// Display text of the search action
    pub fn action_text(self) -> &'static str {
        match self {
            TargetKind::All => "Search Everywhere",
            TargetKind::Class => "Go to Class...",
            TargetKind::File => "Go to File...",
            TargetKind::Symbol => "Go to Symbol...",
            TargetKind::Action => "Find Action...",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Resolves `(path, line_number)` directly and navigates, returning a label on success
pub type LuckyResolver = fn(&ResolveContext<'_>, &str, Option<u32>) -> Option<String>;

#[derive(Clone, Copy)]
pub struct TargetDescriptor {
    pub kind: TargetKind,
    pub search_contributor_id: &'static str,
    pub action_id: &'static str,
    pub lucky: LuckyResolver,
}

impl TargetDescriptor {
    pub fn for_kind(kind: TargetKind) -> Self {
        let lucky: LuckyResolver = match kind {
            TargetKind::All => resolve::resolve_all,
            TargetKind::Class => resolve::resolve_class,
            TargetKind::File => resolve::resolve_file,
            TargetKind::Symbol => resolve::resolve_symbol,
            TargetKind::Action => resolve::resolve_action,
        };
        Self {
            kind,
            search_contributor_id: kind.search_contributor_id(),
            action_id: kind.action_id(),
            lucky,
        }
    }
}

impl fmt::Debug for TargetDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetDescriptor")
            .field("kind", &self.kind)
            .field("search_contributor_id", &self.search_contributor_id)
            .field("action_id", &self.action_id)
            .finish_non_exhaustive()
    }
}

/// One descriptor per kind, in declaration order
#[derive(Debug, Clone)]
pub struct TargetTable {
    descriptors: Vec<TargetDescriptor>,
}

impl TargetTable {
    pub fn new() -> Self {
        Self {
            descriptors: TargetKind::ALL
                .into_iter()
                .map(TargetDescriptor::for_kind)
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&TargetDescriptor> {
        self.descriptors.iter().find(|d| d.kind.key() == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.descriptors.iter().map(|d| d.kind.key())
    }
}

impl Default for TargetTable {
    fn default() -> Self {
        Self::new()
    }
}
