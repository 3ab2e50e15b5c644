//! Shape → master → device name resolution.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use tracing::{debug, info};

use crate::descriptor::{self, Master, MasterFilter, Shape};
use crate::error::DiagramResult;
use crate::namespace::{ExpandedName, NamespaceTable};

/// Deduplicated device names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceSet {
    names: BTreeSet<String>,
}

impl DeviceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a name; returns `false` if it was already present.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in ascending byte order.
    pub fn sorted(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl<S: Into<String>> FromIterator<S> for DeviceSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for name in iter {
            set.insert(name);
        }
        set
    }
}

/// Resolves page shapes against stencil masters.
#[derive(Debug, Clone)]
pub struct ReferenceResolver {
    shape_element: ExpandedName,
    master_element: ExpandedName,
    filter: MasterFilter,
}

impl ReferenceResolver {
    /// Resolver for Visio descriptors with the default master filter.
    pub fn visio() -> DiagramResult<Self> {
        Self::new(&NamespaceTable::visio(), "visio:Shape", "visio:Master")
    }

    pub fn new(namespaces: &NamespaceTable, shape_tag: &str, master_tag: &str) -> DiagramResult<Self> {
        Ok(Self {
            shape_element: namespaces.expand(shape_tag)?,
            master_element: namespaces.expand(master_tag)?,
            filter: MasterFilter::default(),
        })
    }

    pub fn with_filter(mut self, filter: MasterFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn parse_shapes(&self, xml: &str, source: &Path) -> DiagramResult<Vec<Shape>> {
        descriptor::parse_shapes(xml, source, &self.shape_element)
    }

    pub fn parse_masters(&self, xml: &str, source: &Path) -> DiagramResult<Vec<Master>> {
        descriptor::parse_masters(xml, source, &self.master_element, &self.filter)
    }

    /// Parse both descriptors and join them.
    pub fn resolve_documents(
        &self,
        page_xml: &str,
        page_source: &Path,
        master_xml: &str,
        master_source: &Path,
    ) -> DiagramResult<DeviceSet> {
        let shapes = self.parse_shapes(page_xml, page_source)?;
        let masters = self.parse_masters(master_xml, master_source)?;
        Ok(resolve(&shapes, &masters))
    }
}

/// Join shapes to surviving masters, emitting `<name><shape id>` per hit.
///
/// A repeated shape or master id keeps its last occurrence. Shapes whose
/// master is missing, filtered or nameless contribute nothing.
pub fn resolve(shapes: &[Shape], masters: &[Master]) -> DeviceSet {
    let masters: HashMap<&str, &str> = masters
        .iter()
        .map(|m| (m.id.as_str(), m.display_name.as_str()))
        .collect();
    let shapes: BTreeMap<&str, &str> = shapes
        .iter()
        .map(|s| (s.id.as_str(), s.master_ref.as_str()))
        .collect();

    let mut devices = DeviceSet::new();
    let mut unresolved = 0usize;
    for (shape_id, master_ref) in shapes {
        match masters.get(master_ref) {
            Some(name) if !name.is_empty() => {
                devices.insert(format!("{}{}", name, shape_id));
            }
            _ => unresolved += 1,
        }
    }

    if unresolved > 0 {
        debug!("{} shapes reference no surviving master", unresolved);
    }
    info!("Resolved {} device names", devices.len());
    devices
}
