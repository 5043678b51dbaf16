use crate::record::Record;
use crate::schema::TypeInfo;

/// Transfer strategy for a single field link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Declared types match: value is cloned across, no converter consulted.
    Passthrough,
    /// Declared types differ: value goes through the converter chain.
    Convert,
}

/// One linked field: same name on both sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLink {
    /// Position in the source shape.
    pub source: usize,
    /// Position in the destination shape.
    pub target: usize,
    pub name: &'static str,
    pub strategy: Strategy,
}

/// Source → destination field link table for one pair of record types.
///
/// Built once per pair and reused for every copy between them.
///
/// - Destination fields without a same-named source field get no link and
///   are never touched.
/// - Source fields without a same-named destination field are ignored.
#[derive(Debug, Clone)]
pub struct CopyPlan {
    source: TypeInfo,
    target: TypeInfo,
    links: Vec<FieldLink>,
}

impl CopyPlan {
    /// Link fields by exact name, in destination field order.
    pub fn build<S: Record, D: Record>() -> Self {
        let source = S::shape();
        let target = D::shape();

        let links = target
            .fields()
            .iter()
            .enumerate()
            .filter_map(|(target_idx, to)| {
                let source_idx = source.position(to.name)?;
                let from = &source.fields()[source_idx];
                let strategy = if from.ty == to.ty {
                    Strategy::Passthrough
                } else {
                    Strategy::Convert
                };
                Some(FieldLink {
                    source: source_idx,
                    target: target_idx,
                    name: to.name,
                    strategy,
                })
            })
            .collect();

        Self {
            source: source.ty(),
            target: target.ty(),
            links,
        }
    }

    pub fn source(&self) -> TypeInfo {
        self.source
    }

    pub fn target(&self) -> TypeInfo {
        self.target
    }

    pub fn links(&self) -> &[FieldLink] {
        &self.links
    }

    /// Number of links that need the converter chain.
    pub fn conversions(&self) -> usize {
        self.links
            .iter()
            .filter(|l| l.strategy == Strategy::Convert)
            .count()
    }
}
