use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Gender of a person. Input documents are loosely shaped, so parsing
/// accepts several locale spellings and degrades to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Gender {
    pub fn from_token(token: &str) -> Self {
        match token {
            "男" | "male" | "M" => Self::Male,
            "女" | "female" | "F" => Self::Female,
            _ => Self::Unknown,
        }
    }

    /// Sort weight used when ordering members inside a family unit:
    /// male before female before unknown.
    pub fn weight(self) -> u8 {
        match self {
            Self::Male => 0,
            Self::Female => 1,
            Self::Unknown => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Unknown => "unknown",
        }
    }
}

impl Serialize for Gender {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Gender {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .as_deref()
            .map(Gender::from_token)
            .unwrap_or(Gender::Unknown))
    }
}

/// A single person record as supplied by the external store. Every field
/// except `id` is optional in the source data; missing values take safe
/// defaults so the grouper never has to deal with absent fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    pub name: String,
    pub gender: Gender,
    pub birth_date: String,
    pub death_date: String,
    pub birth_address: String,
    pub living_address: String,
    pub is_living: bool,
    pub portrait_url: String,
    pub spouse: Option<String>,
    pub couple_id: Option<String>,
    /// Explicit generation rank; smaller values are earlier ancestors.
    pub generation: Option<i32>,
}

impl Default for Person {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            gender: Gender::Unknown,
            birth_date: String::new(),
            death_date: String::new(),
            birth_address: String::new(),
            living_address: String::new(),
            is_living: true,
            portrait_url: String::new(),
            spouse: None,
            couple_id: None,
            generation: None,
        }
    }
}

/// A person-level relationship edge. The producer only emits parent-child
/// relations (source = parent, target = child); `relation` is carried as an
/// opaque tag and is not consulted during grouping.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RelationEdge {
    pub source: String,
    pub target: String,
    pub id: Option<String>,
    pub relation: Option<String>,
}

/// The raw tree document handed over by the store: flat persons plus
/// person-level edges.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TreeDocument {
    pub nodes: Vec<Person>,
    pub edges: Vec<RelationEdge>,
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid tree document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parses a JSON tree document into the typed model. This is the single
/// boundary where tolerance of loosely-shaped input lives: unknown fields
/// are ignored and missing fields take their defaults.
pub fn parse_tree_document(input: &str) -> Result<TreeDocument, DocumentError> {
    Ok(serde_json::from_str(input)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_accepts_locale_spellings() {
        assert_eq!(Gender::from_token("男"), Gender::Male);
        assert_eq!(Gender::from_token("male"), Gender::Male);
        assert_eq!(Gender::from_token("M"), Gender::Male);
        assert_eq!(Gender::from_token("女"), Gender::Female);
        assert_eq!(Gender::from_token("female"), Gender::Female);
        assert_eq!(Gender::from_token("F"), Gender::Female);
        assert_eq!(Gender::from_token("diverse"), Gender::Unknown);
        assert_eq!(Gender::from_token(""), Gender::Unknown);
    }

    #[test]
    fn gender_weight_orders_male_female_unknown() {
        assert!(Gender::Male.weight() < Gender::Female.weight());
        assert!(Gender::Female.weight() < Gender::Unknown.weight());
    }

    #[test]
    fn parses_minimal_document() {
        let doc = parse_tree_document(r#"{"nodes":[{"id":"p1"}],"edges":[]}"#).unwrap();
        assert_eq!(doc.nodes.len(), 1);
        assert_eq!(doc.nodes[0].id, "p1");
        assert_eq!(doc.nodes[0].gender, Gender::Unknown);
        assert!(doc.nodes[0].is_living);
        assert!(doc.nodes[0].name.is_empty());
        assert!(doc.nodes[0].generation.is_none());
    }

    #[test]
    fn parses_full_person_record() {
        let doc = parse_tree_document(
            r#"{
                "nodes": [{
                    "id": "p1_gen0",
                    "name": "张三",
                    "gender": "男",
                    "birthDate": "1930-01-02",
                    "deathDate": "2001-03-04",
                    "isLiving": false,
                    "birthAddress": "北京",
                    "livingAddress": "上海",
                    "spouse": "p2_gen0",
                    "coupleId": "c_1",
                    "generation": 0
                }],
                "edges": [{"source": "p1_gen0", "target": "p3_gen1", "relation": "parent-child"}]
            }"#,
        )
        .unwrap();
        let person = &doc.nodes[0];
        assert_eq!(person.gender, Gender::Male);
        assert!(!person.is_living);
        assert_eq!(person.spouse.as_deref(), Some("p2_gen0"));
        assert_eq!(person.couple_id.as_deref(), Some("c_1"));
        assert_eq!(person.generation, Some(0));
        assert_eq!(doc.edges[0].relation.as_deref(), Some("parent-child"));
    }

    #[test]
    fn empty_object_is_an_empty_document() {
        let doc = parse_tree_document("{}").unwrap();
        assert!(doc.nodes.is_empty());
        assert!(doc.edges.is_empty());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let doc = parse_tree_document(
            r#"{"nodes":[{"id":"p1","classes":"person","selected":true}],"edges":[]}"#,
        )
        .unwrap();
        assert_eq!(doc.nodes[0].id, "p1");
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(parse_tree_document("{nodes:").is_err());
    }
}
