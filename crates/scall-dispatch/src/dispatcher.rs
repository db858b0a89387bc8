//! The Dispatcher: one resolution entry point over the Registry State.
//!
//! ```text
//! call(name, args)
//!   1. registry.get(name)            → hit: go to 5
//!   2. ErrnoScope { ...              covers loading and its log records
//!        UnitName::derive(name)      → Err(Resolve::InvalidName), loader untouched
//!   3.   registry.pending(name)      one load per identifier at a time
//!          re-check; hit: go to 5
//!   4.   loader.load(unit)
//!          NotFound      → Err(Resolve::Unknown)
//!          Failed(r)     → Err(Resolve::LoadFailed)
//!          name mismatch → Err(Resolve::NameMismatch)
//!          ok            → registry.publish(name, op)
//!      }                             failures publish nothing
//!   5. policy::invoke(op, args)      exactly what the operation returns
//! ```

use std::sync::Arc;

use scall_core::{
    invoke, kdebug, kinfo, kwarn, CallArgs, CallResult, Error, ErrnoScope, FailureFactory,
    LoadError, Operation, Policy, RecordFactory, ResolveError, UnitLoader, UnitName,
};

use crate::config::DispatchConfig;
use crate::registry::{OpStats, Registry, Slot};

/// Lazy-loading operation registry.
///
/// Generic over where implementations come from ([`UnitLoader`]) and how
/// failures are represented ([`FailureFactory`]). Share it by reference or
/// `Arc`; every method takes `&self`.
pub struct Dispatcher {
    loader: Arc<dyn UnitLoader>,
    factory: Arc<dyn FailureFactory>,
    config: DispatchConfig,
    registry: Registry,
}

impl Dispatcher {
    /// Dispatcher over `loader` with the default failure record and
    /// library-default config (no environment).
    pub fn new(loader: Arc<dyn UnitLoader>) -> Self {
        Self {
            loader,
            factory: Arc::new(RecordFactory),
            config: DispatchConfig::new(),
            registry: Registry::new(),
        }
    }

    pub fn with_factory(mut self, factory: Arc<dyn FailureFactory>) -> Self {
        self.factory = factory;
        self
    }

    /// Replace the config. `config.preload` is not applied here; see
    /// [`Dispatcher::preload`].
    pub fn with_config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Resolve each identifier in order. Already-resolved identifiers are
    /// not loaded again. Stops at the first identifier that fails.
    pub fn preload<S: AsRef<str>>(&self, names: &[S]) -> Result<(), Error> {
        let _scope = ErrnoScope::enter();
        for name in names {
            let name = name.as_ref();
            self.resolve(name)?;
            kinfo!("preload: {} ready", name);
        }
        Ok(())
    }

    /// Resolve `name` and invoke it with `args`.
    pub fn call(&self, name: &str, args: CallArgs) -> CallResult {
        let slot = self.resolve_slot(name)?;
        let policy = Policy::new(self.factory.as_ref()).restart_eintr(self.config.restart_eintr);
        let result = invoke(slot.op().as_ref(), &args, &policy);
        slot.record(&result);
        result
    }

    /// The implementation bound to `name`, loading it on first use.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Operation>, Error> {
        let slot = self.resolve_slot(name)?;
        Ok(Arc::clone(slot.op()))
    }

    pub fn is_resolved(&self, name: &str) -> bool {
        self.registry.get(name).is_some()
    }

    /// Resolved identifiers in name order.
    pub fn resolved(&self) -> Vec<String> {
        self.registry.resolved()
    }

    /// Counters for a resolved identifier.
    pub fn stats(&self, name: &str) -> Option<OpStats> {
        self.registry.get(name).map(|slot| slot.stats())
    }

    /// Identifiers the loader can provide, resolved or not.
    pub fn available(&self) -> Vec<&'static str> {
        self.loader.available()
    }

    fn resolve_slot(&self, name: &str) -> Result<Arc<Slot>, ResolveError> {
        if let Some(slot) = self.registry.get(name) {
            return Ok(slot);
        }

        let _scope = ErrnoScope::enter();
        let unit = UnitName::derive(name).map_err(|e| {
            kwarn!("{}", e);
            e
        })?;

        let pending = self.registry.pending(name);
        let _guard = pending.lock();
        if let Some(slot) = self.registry.get(name) {
            return Ok(slot);
        }

        let op = self.load(&unit).map_err(|e| {
            kwarn!("{}", e);
            e
        })?;
        Ok(self.registry.publish(name, op))
    }

    /// Callers hold an [`ErrnoScope`].
    fn load(&self, unit: &UnitName) -> Result<Arc<dyn Operation>, ResolveError> {
        let name = unit.identifier();
        kdebug!("loading {} from {}", name, unit);

        let op = self.loader.load(unit).map_err(|e| match e {
            LoadError::NotFound => ResolveError::Unknown {
                name: name.to_string(),
                unit: unit.to_string(),
            },
            LoadError::Failed(reason) => ResolveError::LoadFailed {
                name: name.to_string(),
                unit: unit.to_string(),
                reason,
            },
        })?;

        if op.name() != name {
            return Err(ResolveError::NameMismatch {
                name: name.to_string(),
                loaded: op.name(),
            });
        }
        kdebug!("loaded {}", op.describe());
        Ok(op)
    }
}
