//! Vocabulary and graph URIs used by the identity queries.
//!
//! Everything here is compiled in. Query builders take these by reference; the
//! only vocabulary term that varies per deployment is the group class, which
//! comes from configuration (see [`DEFAULT_GROUP_TYPE`]).

pub const MU_CORE: &str = "http://mu.semte.ch/vocabularies/core/";
pub const MU_EXT: &str = "http://mu.semte.ch/vocabularies/ext/";
pub const MU_SESSION: &str = "http://mu.semte.ch/vocabularies/session/";
pub const MU_ACCOUNT: &str = "http://mu.semte.ch/vocabularies/account/";
pub const FOAF: &str = "http://xmlns.com/foaf/0.1/";
pub const DCT: &str = "http://purl.org/dc/terms/";
pub const SKOS: &str = "http://www.w3.org/2004/02/skos/core#";
pub const BESLUIT: &str = "http://data.vlaanderen.be/ns/besluit#";
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

/// Graph holding session records.
pub const SESSIONS_GRAPH: &str = "http://mu.semte.ch/graphs/sessions";
/// Graph holding publicly readable groups.
pub const PUBLIC_GRAPH: &str = "http://mu.semte.ch/graphs/public";

/// Class of groups when `GROUP_TYPE` is not configured (administrative unit).
pub const DEFAULT_GROUP_TYPE: &str = "http://data.vlaanderen.be/ns/besluit#Bestuurseenheid";

/// Standard prefix block prepended to every query.
pub fn prefixes() -> String {
    [
        ("mu", MU_CORE),
        ("ext", MU_EXT),
        ("session", MU_SESSION),
        ("account", MU_ACCOUNT),
        ("foaf", FOAF),
        ("dct", DCT),
        ("skos", SKOS),
        ("besluit", BESLUIT),
        ("xsd", XSD),
    ]
    .iter()
    .map(|(prefix, ns)| format!("PREFIX {}: <{}>\n", prefix, ns))
    .collect()
}
