//! Shared model and capability traits for layered unit resolution.

pub mod cleanup;
pub mod customizer;
pub mod error;
pub mod lifecycle;
pub mod location;
pub mod model;
pub mod scope;
pub mod storage;
pub mod unit;

pub use cleanup::CleanupHook;
pub use customizer::{ChainCustomizer, ClassTransformer};
pub use error::{BoxError, CleanupError, ExtractIssue, ReleaseError, ResolveError, ResolveResult};
pub use lifecycle::{Lifecycle, LifecycleListener, LifecycleState};
pub use location::{ARCHIVE_SCHEME, ARCHIVE_SEPARATOR, ContentLocation};
pub use model::{ClassHandle, LoadedClass, OwnerId, UnitId, class_entry_name};
pub use scope::{Resolver, ResolverScope, ResourceIter, ResourceStream};
pub use storage::{ContentRoot, RootOpener};
pub use unit::UnitSource;
