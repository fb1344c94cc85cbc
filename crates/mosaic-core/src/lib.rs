//! # Layout intent, render items and renderables
//!
//! `mosaic-core` holds the vocabulary shared by nodes, the reconciler and
//! platform adapters:
//!
//! - [`Sizing`] / [`LayoutSize`]: what a node wants along each axis.
//! - [`stack_layout`]: water-filling distribution of space among siblings.
//! - [`RenderItem`]: per-pass description of one visible element, with
//!   lifecycle hooks that compose in attachment order.
//! - [`Renderable`]: the live native handle (view- or layer-backed).
//! - [`Animator`] / [`Completion`] / [`CancelHandle`]: the asynchronous
//!   transition contract.
//!
//! ## Sizing
//!
//! ```rust
//! use mosaic_core::*;
//!
//! let sizes = stack_layout(
//!     110.0,
//!     &[
//!         Sizing::Fixed(20.0),
//!         Sizing::Flexible,
//!         Sizing::range(10.0, 25.0),
//!         Sizing::range(20.0, 40.0),
//!     ],
//! );
//! assert_eq!(sizes, vec![20.0, 25.0, 25.0, 40.0]);
//! ```
//!
//! ## Render items
//!
//! Items are values: adding a hook returns a new item. Hooks fire in the
//! order they were added.
//!
//! ```rust,ignore
//! let item = RenderItem::new(|| Renderable::view(MyView::default()))
//!     .id(NodeId::fixed("title"))
//!     .frame(Rect::new(0.0, 0.0, 120.0, 24.0))
//!     .with_update(|r| log::debug!("update {r:?}"))
//!     .with_remove_transition(Transition::collapse());
//! ```
//!
//! Everything here is single-threaded: handles are `Rc`-based and never
//! cross threads.

pub mod animation;
pub mod completion;
pub mod error;
pub mod geometry;
pub mod id;
pub mod item;
pub mod pass;
pub mod registry;
pub mod renderable;
pub mod sizing;
pub mod stack;

pub use animation::*;
pub use completion::*;
pub use error::*;
pub use geometry::*;
pub use id::*;
pub use item::*;
pub use pass::*;
pub use registry::*;
pub use renderable::*;
pub use sizing::*;
pub use stack::*;
