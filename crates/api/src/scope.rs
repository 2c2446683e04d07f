//! Resolution capabilities.
//!
//! A [`ResolverScope`] is one source of classes and resources at a fixed
//! position in a unit's delegation order. A [`Resolver`] is the full lookup
//! surface a unit exposes to the hosting runtime.

use crate::error::ResolveResult;
use crate::model::ClassHandle;
use std::io::Read;
use url::Url;

/// Lazily evaluated sequence of resource locations.
pub type ResourceIter<'a> = Box<dyn Iterator<Item = Url> + Send + 'a>;

/// Readable resource contents.
pub type ResourceStream = Box<dyn Read + Send>;

pub trait ResolverScope: Send + Sync {
    /// Scope name (for logging and chain inspection)
    fn name(&self) -> &str;

    fn resolve_class(&self, name: &str) -> Option<ClassHandle>;

    fn resolve_resource(&self, name: &str) -> Option<Url>;

    /// Every location this scope has for `name`, in the scope's own order.
    fn resolve_all_resources(&self, name: &str) -> Vec<Url>;

    /// Contents of the resource [`ResolverScope::resolve_resource`] returns
    /// for `name`. Must agree with it: both present or both absent.
    fn open_resource(&self, name: &str) -> Option<ResourceStream>;
}

pub trait Resolver: Send + Sync {
    fn load_class(&self, name: &str) -> ResolveResult<ClassHandle>;

    fn get_resource(&self, name: &str) -> Option<Url>;

    fn get_resource_as_stream(&self, name: &str) -> Option<ResourceStream>;

    /// Recomputed on every call.
    fn get_all_resources<'a>(&'a self, name: &'a str) -> ResourceIter<'a>;
}
