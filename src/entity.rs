//! Entity records and identity attributes.
//!
//! An [`Entity`] is one raw record from a sanctions list or a corporate
//! registry, produced by the ingestion layer. The core reads identity
//! attributes but never mutates them.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Classification of entity records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A natural person
    Person,
    /// A registered company
    Company,
    /// A legal entity of unspecified form
    LegalEntity,
    /// A non-commercial organization
    Organization,
    /// A ship
    Vessel,
    /// An aircraft
    Aircraft,
    /// Anything else, including placeholder nodes
    Unknown,
}

impl EntityKind {
    /// Maps a Follow-the-Money schema name onto a kind.
    ///
    /// Unrecognized schemas map to [`EntityKind::Unknown`].
    #[must_use]
    pub fn from_schema(schema: &str) -> Self {
        match schema.trim() {
            "Person" => Self::Person,
            "Company" => Self::Company,
            "LegalEntity" => Self::LegalEntity,
            "Organization" => Self::Organization,
            "Vessel" => Self::Vessel,
            "Airplane" | "Aircraft" => Self::Aircraft,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Person => write!(f, "person"),
            Self::Company => write!(f, "company"),
            Self::LegalEntity => write!(f, "legal_entity"),
            Self::Organization => write!(f, "organization"),
            Self::Vessel => write!(f, "vessel"),
            Self::Aircraft => write!(f, "aircraft"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Structured identifier kinds usable for exact matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKind {
    /// National tax identifier (Russian INN).
    TaxId,
    /// Russian primary state registration number.
    Ogrn,
    /// Global Legal Entity Identifier.
    Lei,
    /// SWIFT/BIC bank code.
    SwiftBic,
    /// IMO ship number.
    ImoNumber,
    /// Registry-local company number.
    RegistrationNumber,
}

impl IdentifierKind {
    /// All known identifier kinds.
    pub const ALL: [Self; 6] = [
        Self::TaxId,
        Self::Ogrn,
        Self::Lei,
        Self::SwiftBic,
        Self::ImoNumber,
        Self::RegistrationNumber,
    ];

    /// Canonical name of this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TaxId => "tax_id",
            Self::Ogrn => "ogrn",
            Self::Lei => "lei",
            Self::SwiftBic => "swift_bic",
            Self::ImoNumber => "imo_number",
            Self::RegistrationNumber => "registration_number",
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdentifierKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tax_id" | "inn" | "inn_code" => Ok(Self::TaxId),
            "ogrn" | "ogrn_code" => Ok(Self::Ogrn),
            "lei" | "lei_code" => Ok(Self::Lei),
            "swift_bic" | "swift" | "bic" => Ok(Self::SwiftBic),
            "imo_number" | "imo" => Ok(Self::ImoNumber),
            "registration_number" | "company_number" => Ok(Self::RegistrationNumber),
            _ => Err(ValidationError::UnknownIdentifierKind {
                kind: s.to_string(),
            }),
        }
    }
}

/// A sanctioned party or corporate-registry party.
///
/// # Examples
///
/// ```
/// use sanctions_network::{Entity, EntityKind, IdentifierKind};
///
/// let entity = Entity::new("ofac-67890", EntityKind::Company)
///     .with_display_name("Test Company LLC")
///     .with_name("Test Company LLC")
///     .with_jurisdiction("cy")
///     .with_identifier(IdentifierKind::RegistrationNumber, "HE123456")
///     .sanctioned();
///
/// assert!(entity.is_sanctioned());
/// assert_eq!(entity.identifier(IdentifierKind::RegistrationNumber), Some("HE123456"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Stable key, unique within its source dataset.
    pub entity_id: String,

    /// Record classification.
    pub kind: EntityKind,

    /// Human-readable caption. May be empty.
    #[serde(default)]
    pub display_name: String,

    /// Primary names as listed by the source.
    #[serde(default)]
    pub names: Vec<String>,

    /// Alternative spellings and transliterations.
    #[serde(default)]
    pub aliases: Vec<String>,

    /// Associated country codes.
    #[serde(default)]
    pub countries: BTreeSet<String>,

    /// Registration jurisdiction code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jurisdiction: Option<String>,

    /// Structured identifiers. A `None` value means the column was present
    /// but empty.
    #[serde(default)]
    pub identifiers: BTreeMap<IdentifierKind, Option<String>>,

    #[serde(default)]
    is_sanctioned: bool,

    /// Source datasets this record came from.
    #[serde(default)]
    pub source_lists: BTreeSet<String>,
}

impl Entity {
    /// Creates an unsanctioned entity with no names or identifiers.
    #[must_use]
    pub fn new(entity_id: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            entity_id: entity_id.into(),
            kind,
            display_name: String::new(),
            names: Vec::new(),
            aliases: Vec::new(),
            countries: BTreeSet::new(),
            jurisdiction: None,
            identifiers: BTreeMap::new(),
            is_sanctioned: false,
            source_lists: BTreeSet::new(),
        }
    }

    /// Sets the display caption.
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    /// Adds a primary name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.names.push(name.into());
        self
    }

    /// Adds an alias.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Adds an associated country code.
    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.countries.insert(country.into());
        self
    }

    /// Sets the registration jurisdiction.
    #[must_use]
    pub fn with_jurisdiction(mut self, jurisdiction: impl Into<String>) -> Self {
        self.jurisdiction = Some(jurisdiction.into());
        self
    }

    /// Sets an identifier value.
    #[must_use]
    pub fn with_identifier(mut self, kind: IdentifierKind, value: impl Into<String>) -> Self {
        self.identifiers.insert(kind, Some(value.into()));
        self
    }

    /// Adds a source dataset tag.
    #[must_use]
    pub fn with_source_list(mut self, list: impl Into<String>) -> Self {
        self.source_lists.insert(list.into());
        self
    }

    /// Marks the entity as sanctioned. Only available at construction time.
    #[must_use]
    pub fn sanctioned(mut self) -> Self {
        self.is_sanctioned = true;
        self
    }

    /// Returns true if the entity appears on a sanctions list.
    #[must_use]
    pub const fn is_sanctioned(&self) -> bool {
        self.is_sanctioned
    }

    /// Returns the trimmed identifier value, if present and non-empty.
    #[must_use]
    pub fn identifier(&self, kind: IdentifierKind) -> Option<&str> {
        self.identifiers
            .get(&kind)
            .and_then(Option::as_deref)
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// Returns the trimmed jurisdiction code, if present and non-empty.
    #[must_use]
    pub fn jurisdiction_code(&self) -> Option<&str> {
        self.jurisdiction
            .as_deref()
            .map(str::trim)
            .filter(|j| !j.is_empty())
    }

    /// Key of the company in its registry, `"{jurisdiction}_{registration_number}"`.
    ///
    /// `None` unless both parts are present. The jurisdiction is lowercased.
    #[must_use]
    pub fn corporate_key(&self) -> Option<String> {
        corporate_key(self.jurisdiction_code(), self.identifier(IdentifierKind::RegistrationNumber))
    }

    /// Names to compare during fuzzy matching.
    ///
    /// Names then aliases, first occurrence kept. Falls back to the display
    /// name when the entity carries neither.
    #[must_use]
    pub fn candidate_names(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::with_capacity(self.names.len() + self.aliases.len());
        for name in self.names.iter().chain(self.aliases.iter()) {
            let name = name.as_str();
            if !name.trim().is_empty() && !out.contains(&name) {
                out.push(name);
            }
        }
        if out.is_empty() && !self.display_name.trim().is_empty() {
            out.push(self.display_name.as_str());
        }
        out
    }

    /// Caption to display: the display name, else the first name, else the id.
    #[must_use]
    pub fn caption(&self) -> &str {
        if !self.display_name.is_empty() {
            return &self.display_name;
        }
        self.names
            .first()
            .map_or(self.entity_id.as_str(), String::as_str)
    }
}

/// Builds a registry key from a jurisdiction and a registration number.
///
/// Both parts are trimmed; `None` if either is missing or blank.
#[must_use]
pub fn corporate_key(jurisdiction: Option<&str>, registration_number: Option<&str>) -> Option<String> {
    let jurisdiction = jurisdiction.map(str::trim).filter(|j| !j.is_empty())?;
    let number = registration_number.map(str::trim).filter(|n| !n.is_empty())?;
    Some(format!("{}_{number}", jurisdiction.to_ascii_lowercase()))
}
