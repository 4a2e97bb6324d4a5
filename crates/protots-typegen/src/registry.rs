//! Registry of declared schema types.
//!
//! Every identifier the compiler emits for a declaration (enum, message,
//! message interfaces, service) is declared here under its fully-qualified
//! schema name, so that field and method references can be resolved to an
//! output name and the output file that defines it.

use crate::error::Error;
use crate::naming;
use std::collections::BTreeMap;

/// The schema file a declaration belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    /// Position in the input [`SchemaSet`](crate::descriptor::SchemaSet).
    pub index: usize,
    /// Schema file name (`shop/v1/item.proto`).
    pub name: String,
    pub package: String,
    /// Output file path (`shop/v1/item.ts`).
    pub output_path: String,
}

/// What a registry entry declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Enum,
    Message,
    Interface,
    JsonInterface,
    Service,
}

#[derive(Debug, Clone)]
pub struct RegistryEntry {
    pub file: FileRef,
    pub kind: DeclKind,
    /// Identifier in the output file (`Order_Status`, `IItemJSON`).
    pub output_name: String,
}

/// Flat mapping from fully-qualified schema name to its declaration.
#[derive(Debug, Default)]
pub struct Registry {
    entries: BTreeMap<String, RegistryEntry>,
    /// `(package, output_name)` to the fully-qualified name that claimed it.
    identifiers: BTreeMap<(String, String), String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `local` (possibly dotted, e.g. `Order.Status`) as owned by `file`.
    ///
    /// Declaring the same fully-qualified name twice is an error, and so is a
    /// second declaration whose output identifier is already taken in the
    /// package (`Order.Status` and `Order_Status` both emit `Order_Status`).
    pub fn declare(
        &mut self,
        file: &FileRef,
        local: &str,
        kind: DeclKind,
    ) -> Result<&RegistryEntry, Error> {
        use std::collections::btree_map::Entry;

        let fq_name = naming::qualify(&file.package, local);
        if let Some(existing) = self.entries.get(&fq_name) {
            return Err(Error::DuplicateDeclaration {
                name: fq_name,
                first: existing.file.name.clone(),
                second: file.name.clone(),
            });
        }

        let output_name = naming::flatten_local(local);
        match self
            .identifiers
            .entry((file.package.clone(), output_name.clone()))
        {
            Entry::Occupied(taken) => {
                return Err(Error::DuplicateIdentifier {
                    identifier: output_name,
                    package: file.package.clone(),
                    first: taken.get().clone(),
                    second: fq_name,
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(fq_name.clone());
            }
        }

        Ok(self.entries.entry(fq_name).or_insert(RegistryEntry {
            file: file.clone(),
            kind,
            output_name,
        }))
    }

    /// Look up the declaration of a fully-qualified name (`.pkg.Name`).
    pub fn resolve(&self, fq_name: &str) -> Option<&RegistryEntry> {
        self.entries.get(fq_name)
    }

    /// Output identifier for a fully-qualified name.
    ///
    /// Unknown names still get a best-effort identifier; they just have no
    /// known home to import from.
    pub fn output_type_name(&self, fq_name: &str) -> String {
        match self.resolve(fq_name) {
            Some(entry) => entry.output_name.clone(),
            None => naming::guess_local_name(fq_name),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
