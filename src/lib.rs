#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod group;
pub mod ir;
pub mod layout;
pub mod layout_dump;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{LayoutConfig, load_config};
pub use group::{DerivedEdge, DerivedKind, FamilyUnit, GroupedGraph, Member, group};
pub use ir::{DocumentError, Gender, Person, RelationEdge, TreeDocument, parse_tree_document};
pub use layout::{GenerationBand, Layout, Position, compute_layout, reconcile_members};
pub use layout_dump::LayoutDump;
