//! `CatalogLoader`: resolves `scall/op/<identifier>` against the static
//! operation tables.

use std::sync::Arc;

use scall_core::loader::UNIT_PREFIX;
use scall_core::{LoadError, Operation, UnitLoader, UnitName};

use crate::sysop::SysOp;
use crate::{dir, fs, io, net};

const TABLES: &[&[SysOp]] = &[io::OPS, fs::OPS, dir::OPS, net::OPS];

/// Loader for the built-in catalog.
#[derive(Debug, Default, Clone, Copy)]
pub struct CatalogLoader;

impl CatalogLoader {
    pub fn new() -> Self {
        CatalogLoader
    }

    /// Descriptor for `identifier`, if the catalog has one.
    pub fn lookup(identifier: &str) -> Option<&'static SysOp> {
        TABLES
            .iter()
            .flat_map(|table| table.iter())
            .find(|op| op.name == identifier)
    }

    /// Every catalog identifier, in table order.
    pub fn names() -> impl Iterator<Item = &'static str> {
        TABLES.iter().flat_map(|table| table.iter()).map(|op| op.name)
    }
}

impl UnitLoader for CatalogLoader {
    fn load(&self, unit: &UnitName) -> Result<Arc<dyn Operation>, LoadError> {
        let identifier = unit
            .as_str()
            .strip_prefix(UNIT_PREFIX)
            .ok_or(LoadError::NotFound)?;
        match Self::lookup(identifier) {
            Some(op) => Ok(Arc::new(*op)),
            None => Err(LoadError::NotFound),
        }
    }

    fn available(&self) -> Vec<&'static str> {
        Self::names().collect()
    }
}
