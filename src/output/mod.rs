// Output generation module

pub mod context;
pub mod html;
pub mod integrity;
pub mod links;
pub mod naming;
pub mod paths;
pub mod templates;

pub use context::*;
pub use html::*;
pub use integrity::{DanglingReference, IntegrityReport, LinkKind};
pub use links::{LinkResolver, Reference};
pub use naming::{Naming, Role};
pub use paths::{OutputTarget, PathResolver};
pub use templates::*;
