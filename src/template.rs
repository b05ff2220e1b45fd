//! Template identifier normalization
//!
//! Clients address contract templates either as a compact colon string
//! (`package:module:entity` or `module:entity`) or as a structured
//! object with `moduleName`/`entityName` and an optional `packageId`.
//! Both forms are resolved at the boundary by [`TemplateRef::normalize`];
//! everything past that point operates on the canonical [`TemplateId`].

use serde::{Deserialize, Serialize};

use crate::types::{LedgerError, Result};

/// Template reference as it arrives on the wire
///
/// Untagged: a JSON string deserializes as `Compact`, an object as
/// `Structured`. Anything else is rejected by serde before we see it.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TemplateRef {
    /// Colon-delimited compact form, e.g. `"Arche:ReceivableAsset"`
    Compact(String),
    /// Structured form with explicit fields
    Structured {
        #[serde(rename = "packageId")]
        package_id: Option<String>,
        #[serde(rename = "moduleName")]
        module_name: Option<String>,
        #[serde(rename = "entityName")]
        entity_name: Option<String>,
    },
    /// Anything else on the wire (number, bool, array, null); always
    /// fails normalization rather than failing the body parse
    Other(serde_json::Value),
}

/// Canonical template identifier
///
/// `package_id` is optional; when absent the template resolves by
/// (module, entity) alone. Module and entity are non-empty and trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateId {
    #[serde(rename = "packageId", skip_serializing_if = "Option::is_none")]
    pub package_id: Option<String>,
    #[serde(rename = "moduleName")]
    pub module_name: String,
    #[serde(rename = "entityName")]
    pub entity_name: String,
}

impl TemplateRef {
    /// Normalize to the canonical form, or fail with `InvalidTemplate`
    ///
    /// Compact strings must have exactly 2 or 3 non-empty trimmed
    /// segments; structured objects must carry a non-empty trimmed
    /// `moduleName` and `entityName`. No silent defaults.
    pub fn normalize(&self) -> Result<TemplateId> {
        match self {
            TemplateRef::Compact(raw) => {
                let parts: Vec<&str> = raw
                    .split(':')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .collect();
                match parts.as_slice() {
                    [package, module, entity] => Ok(TemplateId {
                        package_id: Some((*package).to_string()),
                        module_name: (*module).to_string(),
                        entity_name: (*entity).to_string(),
                    }),
                    [module, entity] => Ok(TemplateId {
                        package_id: None,
                        module_name: (*module).to_string(),
                        entity_name: (*entity).to_string(),
                    }),
                    _ => Err(LedgerError::InvalidTemplate),
                }
            }
            TemplateRef::Structured {
                package_id,
                module_name,
                entity_name,
            } => {
                let module = module_name.as_deref().map(str::trim).unwrap_or("");
                let entity = entity_name.as_deref().map(str::trim).unwrap_or("");
                if module.is_empty() || entity.is_empty() {
                    return Err(LedgerError::InvalidTemplate);
                }
                let package = package_id
                    .as_deref()
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string);
                Ok(TemplateId {
                    package_id: package,
                    module_name: module.to_string(),
                    entity_name: entity.to_string(),
                })
            }
            TemplateRef::Other(_) => Err(LedgerError::InvalidTemplate),
        }
    }
}

/// The four modeled contract templates
///
/// Each kind owns one ordered sequence in the store. Sequence routing
/// keys on the entity name alone; `packageId` and `moduleName` are
/// normalized and echoed but do not participate in lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    ReceivableAsset,
    ConfirmedReceivable,
    FinancingAgreement,
    SettlementRecord,
}

impl EntityKind {
    /// All kinds, in lifecycle order
    pub const ALL: [EntityKind; 4] = [
        EntityKind::ReceivableAsset,
        EntityKind::ConfirmedReceivable,
        EntityKind::FinancingAgreement,
        EntityKind::SettlementRecord,
    ];

    /// Resolve an entity name; unknown names yield `None`
    ///
    /// The Query handler treats `None` as an empty sequence rather
    /// than an error so client polling never hard-fails on templates
    /// the mock does not model.
    pub fn from_entity_name(name: &str) -> Option<EntityKind> {
        match name {
            "ReceivableAsset" => Some(EntityKind::ReceivableAsset),
            "ConfirmedReceivable" => Some(EntityKind::ConfirmedReceivable),
            "FinancingAgreement" => Some(EntityKind::FinancingAgreement),
            "SettlementRecord" => Some(EntityKind::SettlementRecord),
            _ => None,
        }
    }

    /// Canonical entity name
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::ReceivableAsset => "ReceivableAsset",
            EntityKind::ConfirmedReceivable => "ConfirmedReceivable",
            EntityKind::FinancingAgreement => "FinancingAgreement",
            EntityKind::SettlementRecord => "SettlementRecord",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_three_segments() {
        let id = TemplateRef::Compact("pkg123:Arche:ReceivableAsset".to_string())
            .normalize()
            .unwrap();
        assert_eq!(id.package_id.as_deref(), Some("pkg123"));
        assert_eq!(id.module_name, "Arche");
        assert_eq!(id.entity_name, "ReceivableAsset");
    }

    #[test]
    fn test_compact_two_segments() {
        let id = TemplateRef::Compact("Arche:ConfirmedReceivable".to_string())
            .normalize()
            .unwrap();
        assert_eq!(id.package_id, None);
        assert_eq!(id.module_name, "Arche");
        assert_eq!(id.entity_name, "ConfirmedReceivable");
    }

    #[test]
    fn test_compact_segments_are_trimmed() {
        let id = TemplateRef::Compact("  Arche : ReceivableAsset ".to_string())
            .normalize()
            .unwrap();
        assert_eq!(id.module_name, "Arche");
        assert_eq!(id.entity_name, "ReceivableAsset");
    }

    #[test]
    fn test_compact_wrong_segment_counts_fail() {
        for raw in ["ReceivableAsset", "a:b:c:d", "", ":", "::", " : "] {
            let err = TemplateRef::Compact(raw.to_string())
                .normalize()
                .unwrap_err();
            assert_eq!(err, LedgerError::InvalidTemplate, "input {raw:?}");
        }
    }

    #[test]
    fn test_structured_requires_module_and_entity() {
        let err = TemplateRef::Structured {
            package_id: None,
            module_name: Some("Arche".to_string()),
            entity_name: Some("   ".to_string()),
        }
        .normalize()
        .unwrap_err();
        assert_eq!(err, LedgerError::InvalidTemplate);

        let err = TemplateRef::Structured {
            package_id: Some("pkg".to_string()),
            module_name: None,
            entity_name: Some("ReceivableAsset".to_string()),
        }
        .normalize()
        .unwrap_err();
        assert_eq!(err, LedgerError::InvalidTemplate);
    }

    #[test]
    fn test_structured_blank_package_is_dropped() {
        let id = TemplateRef::Structured {
            package_id: Some("   ".to_string()),
            module_name: Some("Arche".to_string()),
            entity_name: Some("SettlementRecord".to_string()),
        }
        .normalize()
        .unwrap();
        assert_eq!(id.package_id, None);
    }

    #[test]
    fn test_wire_forms_deserialize() {
        let compact: TemplateRef = serde_json::from_str(r#""Arche:ReceivableAsset""#).unwrap();
        assert!(matches!(compact, TemplateRef::Compact(_)));

        let structured: TemplateRef = serde_json::from_str(
            r#"{"packageId":"pkg","moduleName":"Arche","entityName":"ReceivableAsset"}"#,
        )
        .unwrap();
        let id = structured.normalize().unwrap();
        assert_eq!(id.package_id.as_deref(), Some("pkg"));
    }

    #[test]
    fn test_non_string_non_object_forms_fail() {
        for raw in ["42", "null", "[\"Arche\",\"ReceivableAsset\"]", "true"] {
            let parsed: TemplateRef = serde_json::from_str(raw).unwrap();
            assert_eq!(
                parsed.normalize().unwrap_err(),
                LedgerError::InvalidTemplate,
                "input {raw}"
            );
        }
    }

    #[test]
    fn test_entity_kind_lookup() {
        assert_eq!(
            EntityKind::from_entity_name("ReceivableAsset"),
            Some(EntityKind::ReceivableAsset)
        );
        assert_eq!(EntityKind::from_entity_name("PledgeRegistry"), None);
    }
}
