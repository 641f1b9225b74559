//! Types shared by the structural and reading-order engines.

use crate::structure::NodeId;
use indexmap::IndexMap;
use uuid::Uuid;

/// String-to-string details attached to an issue for programmatic inspection
/// (e.g. `childType`, `missingChild`, `depth`).
pub type IssueContext = IndexMap<String, String>;

/// Build an [`IssueContext`] from key/value pairs.
pub fn context<I, K, V>(pairs: I) -> IssueContext
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Deterministic issue identifier.
///
/// Derived from the engine, the issue code, the involved nodes and the
/// issue's position in the result, so analyzing the same tree twice yields
/// identical issue lists while ids stay unique within one result.
pub fn issue_id(engine: &str, code: &str, nodes: &[NodeId], ordinal: usize) -> Uuid {
    let mut name = format!("{}/{}/{}", engine, code, ordinal);
    for node in nodes {
        name.push('/');
        name.push_str(&node.to_string());
    }
    Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes())
}
