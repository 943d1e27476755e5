//! Typesafe bean resolution.
//!
//! A [`Container`] holds deployed [`Bean`]s and answers lookups for a required [`Type`] plus a set
//! of qualifiers:
//!
//! 1. a bean is a candidate when one of its bean types is assignable to the required type and it
//!    carries every required qualifier (binding members compared, non-binding ignored);
//! 2. disabled alternatives and beans replaced through specialization are dropped;
//! 3. of what remains, a single bean resolves. Otherwise enabled alternatives win over regular
//!    beans and the highest priority wins among alternatives. Anything left is ambiguous.
//!
//! Results are memoized per structural query until the next deployment change.
//!
//! [`Type`]: trellis_types::Type

mod bean;
mod cache;
mod container;
mod enablement;
mod error;
mod qualifier;
mod registry;
mod resolver;

pub use bean::{Bean, BeanBuilder, RegisteredBean};
pub use cache::{CacheStats, ResolutionCache};
pub use container::Container;
pub use enablement::{Enablement, GlobalEnablement, Stereotype, StereotypeModel};
pub use error::{DefinitionError, ResolveError};
pub use qualifier::{
    AnnotationValue, Qualifier, QualifierDef, QualifierInstance, QualifierModel, ANY_QUALIFIER,
    DEFAULT_QUALIFIER, NAMED_QUALIFIER,
};
pub use registry::BeanRegistry;
pub use resolver::{Resolution, ResolutionQuery, ResolutionResult};
