use std::sync::Arc;

use trellis_config::ResolutionConfig;
use trellis_types::{check_well_formed, format_type, AssignabilityRules, Type, TypeError, TypeStore};

use crate::bean::{Bean, RegisteredBean};
use crate::cache::{CacheStats, ResolutionCache};
use crate::enablement::{Enablement, GlobalEnablement, Stereotype, StereotypeModel};
use crate::qualifier::{Qualifier, QualifierDef, QualifierModel};
use crate::registry::{BeanRegistry, Deployment};
use crate::resolver::{Resolution, ResolutionQuery, ResolutionResult, Resolver};
use crate::{DefinitionError, ResolveError};

/// Owns the class metadata, the deployed beans and the caches built over them.
///
/// Deployment goes through `&mut self` and drops every cached resolution. Once deployed, the
/// container is `Sync` and [`Container::resolve`] can be called from any number of threads.
#[derive(Debug)]
pub struct Container<E: Enablement = GlobalEnablement> {
    types: TypeStore,
    qualifiers: QualifierModel,
    stereotypes: StereotypeModel,
    registry: BeanRegistry,
    enablement: E,
    cache: ResolutionCache,
    max_type_depth: usize,
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    pub fn new() -> Self {
        Self::with_config(&ResolutionConfig::default())
    }

    pub fn with_config(config: &ResolutionConfig) -> Self {
        Self::with_enablement(config, GlobalEnablement::default())
    }
}

impl<E: Enablement> Container<E> {
    pub fn with_enablement(config: &ResolutionConfig, enablement: E) -> Self {
        Self {
            types: TypeStore::with_core_types(),
            qualifiers: QualifierModel::with_builtins(),
            stereotypes: StereotypeModel::default(),
            registry: BeanRegistry::new(),
            enablement,
            cache: ResolutionCache::new(config.cache_enabled),
            max_type_depth: config.max_type_depth.max(1),
        }
    }

    pub fn types(&self) -> &TypeStore {
        &self.types
    }

    /// Mutable access to the class metadata. Cached resolutions are dropped.
    pub fn types_mut(&mut self) -> &mut TypeStore {
        self.invalidate();
        &mut self.types
    }

    pub fn qualifiers(&self) -> &QualifierModel {
        &self.qualifiers
    }

    pub fn register_qualifier(&mut self, def: QualifierDef) {
        tracing::debug!(target: "trellis.resolve", qualifier = def.name(), "registered qualifier");
        self.qualifiers.register(def);
        self.invalidate();
    }

    pub fn stereotypes(&self) -> &StereotypeModel {
        &self.stereotypes
    }

    pub fn register_stereotype(&mut self, stereotype: Stereotype) {
        tracing::debug!(
            target: "trellis.resolve",
            stereotype = stereotype.name(),
            "registered stereotype"
        );
        self.stereotypes.register(stereotype);
        self.invalidate();
    }

    pub fn enablement(&self) -> &E {
        &self.enablement
    }

    /// Mutable access to the enablement policy. Cached resolutions are dropped.
    pub fn enablement_mut(&mut self) -> &mut E {
        self.invalidate();
        &mut self.enablement
    }

    pub fn registry(&self) -> &BeanRegistry {
        &self.registry
    }

    /// Validate and deploy a bean.
    pub fn register_bean(&mut self, bean: Bean) -> Result<Arc<RegisteredBean>, DefinitionError> {
        let deployment = Deployment {
            rules: AssignabilityRules::new(&self.types).with_max_depth(self.max_type_depth),
            qualifiers: &self.qualifiers,
            stereotypes: &self.stereotypes,
        };
        let registered = self.registry.register(bean, &deployment)?;
        tracing::debug!(
            target: "trellis.resolve",
            bean = registered.name(),
            types = registered.bean().types().len(),
            qualifiers = registered.qualifiers().len(),
            alternative = registered.is_alternative(),
            priority = ?registered.priority(),
            "registered bean"
        );
        self.invalidate();
        Ok(registered)
    }

    /// Build the normalized query for `required` and `qualifiers`.
    pub fn query(
        &self,
        required: &Type,
        qualifiers: &[Qualifier],
    ) -> Result<ResolutionQuery, ResolveError> {
        let mut instances = Vec::with_capacity(qualifiers.len());
        for qualifier in qualifiers {
            instances.push(self.qualifiers.normalize(qualifier)?);
        }
        Ok(ResolutionQuery::new(required.clone(), instances))
    }

    /// Beans satisfying an injection point of type `required` with `qualifiers`.
    pub fn resolve(
        &self,
        required: &Type,
        qualifiers: &[Qualifier],
    ) -> Result<Arc<ResolutionResult>, ResolveError> {
        let query = self.query(required, qualifiers)?;
        self.resolve_query(&query)
    }

    pub fn resolve_query(
        &self,
        query: &ResolutionQuery,
    ) -> Result<Arc<ResolutionResult>, ResolveError> {
        let result = self
            .cache
            .get_or_compute(query, || self.compute(query))
            .map_err(|err| {
                tracing::warn!(
                    target: "trellis.resolve",
                    required = %format_type(&self.types, query.required()),
                    error = %err,
                    "resolution aborted by malformed type"
                );
                err
            })?;
        Ok(result)
    }

    fn compute(&self, query: &ResolutionQuery) -> Result<ResolutionResult, TypeError> {
        let required = query.required();
        if required.is_wildcard() {
            return Err(TypeError::NotAType(format_type(&self.types, required)));
        }
        check_well_formed(&self.types, required)?;

        let resolver = Resolver {
            rules: AssignabilityRules::new(&self.types).with_max_depth(self.max_type_depth),
            registry: &self.registry,
            enablement: &self.enablement,
        };
        let result = resolver.resolve(query)?;

        let outcome = match result.resolution() {
            Resolution::Resolved(_) => None,
            Resolution::Unsatisfied => Some("unsatisfied"),
            Resolution::Ambiguous(_) => Some("ambiguous"),
        };
        if let Some(outcome) = outcome {
            tracing::debug!(
                target: "trellis.resolve",
                required = %required.display(&self.types),
                qualifiers = query.qualifiers().len(),
                candidates = ?result.bean_names(),
                outcome,
                "unresolved injection point"
            );
        }
        Ok(result)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn reset_cache_stats(&self) {
        self.cache.reset_stats();
    }

    /// Drop every cached resolution and type closure.
    pub fn invalidate(&self) {
        self.cache.invalidate();
        self.types.clear_caches();
    }

    /// Undeploy every bean and drop all caches. Class, qualifier and stereotype metadata stay.
    pub fn shutdown(&mut self) {
        tracing::debug!(
            target: "trellis.resolve",
            beans = self.registry.len(),
            "shutting down container"
        );
        self.registry.clear();
        self.invalidate();
    }
}
