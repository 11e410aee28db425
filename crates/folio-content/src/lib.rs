//! Document tree, navigation, and frontmatter extraction.
//!
//! # Modules
//!
//! - [`frontmatter`]: Frontmatter parsing into [`PostMetadata`]
//! - [`tree`]: Content root walking into [`ContentNode`] trees
//! - [`nav`]: Sidebar projection into [`NavItem`]s
//! - [`store`]: [`DocumentStore`] for path resolution and reads

#![doc = include_str!("../README.md")]

pub mod frontmatter;
pub mod nav;
pub mod store;
pub mod tree;

pub use frontmatter::PostMetadata;
pub use nav::{NavIcon, NavItem, NavModel, NavSubItem};
pub use store::DocumentStore;
pub use tree::{ContentNode, NodeType, TreeOptions};
