//! IRI namespaces used by the compiler.

use super::term::Iri;

/// An IRI prefix that mints IRIs by appending a local name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Namespace(&'static str);

impl Namespace {
    /// Creates a namespace from its base IRI.
    pub const fn new(base: &'static str) -> Self {
        Self(base)
    }

    /// Returns `<base><local>`.
    pub fn iri(&self, local: &str) -> Iri {
        Iri::new(format!("{}{}", self.0, local))
    }

    /// Returns the part of `iri` after this namespace, if it lives in it.
    pub fn local_name<'a>(&self, iri: &'a Iri) -> Option<&'a str> {
        iri.as_str().strip_prefix(self.0)
    }
}

/// Vocabularies referenced by generated queries.
pub mod vocab {
    use super::Namespace;

    /// Wikidata direct ("truthy") properties.
    pub const WDT: Namespace = Namespace::new("http://www.wikidata.org/prop/direct/");
    /// Wikidata property-to-statement links.
    pub const P: Namespace = Namespace::new("http://www.wikidata.org/prop/");
    /// Wikidata statement values.
    pub const PS: Namespace = Namespace::new("http://www.wikidata.org/prop/statement/");
    /// Wikidata qualifier values.
    pub const PQ: Namespace = Namespace::new("http://www.wikidata.org/prop/qualifier/");

    /// `rdf:type`
    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    /// `rdfs:label`
    pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
    /// `rdfs:subClassOf`
    pub const RDFS_SUBCLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
    /// `wikibase:directClaim`
    pub const WIKIBASE_DIRECT_CLAIM: &str = "http://wikiba.se/ontology#directClaim";
    /// Wikidata "instance of".
    pub const WDT_INSTANCE_OF: &str = "http://www.wikidata.org/prop/direct/P31";
    /// Wikidata "subclass of".
    pub const WDT_SUBCLASS_OF: &str = "http://www.wikidata.org/prop/direct/P279";

    /// `xsd:string`
    pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    /// `xsd:integer`
    pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    /// `xsd:boolean`
    pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    /// `xsd:decimal`
    pub const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    /// `xsd:float`
    pub const XSD_FLOAT: &str = "http://www.w3.org/2001/XMLSchema#float";
    /// `xsd:double`
    pub const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
    /// `xsd:date`
    pub const XSD_DATE: &str = "http://www.w3.org/2001/XMLSchema#date";
    /// `xsd:dateTime`
    pub const XSD_DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
    /// `xsd:anyURI`
    pub const XSD_ANY_URI: &str = "http://www.w3.org/2001/XMLSchema#anyURI";
}
