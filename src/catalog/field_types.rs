//! Field Type Registry (`C2`): resolves the declarative, possibly-partial
//! `FieldTypeSpec` table into a fully inherited, immutable registry.
//!
//! Mirrors the teacher's build-time `gen_lookups`/`type_helpers` inheritance
//! walk, but runs at runtime over the generated static table so that base
//! resolution and range computation stay a single, auditable code path
//! rather than being baked twice (once in the generator, once implicitly
//! by whatever consumes its output).
use std::collections::BTreeMap;

use crate::core::{FieldKind, FieldTypeSpec, PhysicalQuantity, Signedness};
use crate::error::CatalogError;

/// Fully resolved field type: every inheritable attribute has percolated
/// down from its base chain, and the numeric range is computed.
#[derive(Debug, Clone)]
pub struct ResolvedFieldType {
    pub name: &'static str,
    pub kind: FieldKind,
    pub bits: Option<u32>,
    pub resolution: f64,
    pub offset: i64,
    pub unit: Option<&'static str>,
    pub signed: bool,
    pub range_min: f64,
    pub range_max: f64,
}

/// Immutable, `Sync` registry of resolved field types, keyed by name.
#[derive(Debug)]
pub struct FieldTypeRegistry {
    types: BTreeMap<&'static str, ResolvedFieldType>,
}

impl FieldTypeRegistry {
    pub fn get(&self, name: &str) -> Option<&ResolvedFieldType> {
        self.types.get(name)
    }

    /// Build the registry from the declared (possibly partial) table,
    /// performing phases 1-5 of spec S4.2 in order.
    pub fn build(
        raw: &'static [FieldTypeSpec],
        physical: &'static [PhysicalQuantity],
    ) -> Result<Self, CatalogError> {
        let mut resolved: BTreeMap<&'static str, ResolvedFieldType> = BTreeMap::new();

        for spec in raw {
            if resolved.contains_key(spec.name) {
                return Err(CatalogError::DuplicateFieldType { name: spec.name });
            }

            // Phase 2: physical-quantity unit inheritance.
            let mut unit = spec.unit;
            if let Some(physical_name) = spec.physical_quantity {
                let pq = physical
                    .iter()
                    .find(|p| p.name == physical_name)
                    .ok_or(CatalogError::UnknownPhysicalQuantity {
                        name: spec.name,
                        physical: physical_name,
                    })?;
                if unit.is_none() {
                    unit = Some(pq.abbreviation);
                }
            }

            // Phase 3: base-type inheritance. The base must already be resolved,
            // i.e. it must have appeared earlier in the authoring order.
            let mut bits = spec.bits;
            let mut resolution = spec.resolution;
            let mut offset = spec.offset;
            let mut signed = spec.signed;

            if let Some(base_name) = spec.base {
                let base = resolved.get(base_name).ok_or(CatalogError::UnresolvedBase {
                    name: spec.name,
                    base: base_name,
                })?;

                if unit.is_none() {
                    unit = base.unit;
                }
                if bits.is_none() {
                    bits = base.bits;
                }
                if let Some(declared) = resolution {
                    if base.resolution != 0.0 && (declared - base.resolution).abs() > f64::EPSILON
                    {
                        return Err(CatalogError::ConflictingResolution {
                            name: spec.name,
                            declared,
                            inherited: base.resolution,
                        });
                    }
                } else {
                    resolution = Some(base.resolution);
                }
                if offset == 0 {
                    offset = base.offset;
                }
                if matches!(signed, Signedness::Inherit) {
                    signed = if base.signed {
                        Signedness::Signed
                    } else {
                        Signedness::Unsigned
                    };
                }
            }

            let resolution = resolution.unwrap_or(1.0);
            let signed_bool = matches!(signed, Signedness::Signed);

            // Phase 5: range computation, when fully determined.
            let (range_min, range_max) = match bits {
                Some(size) if size > 0 => {
                    let high_bit = if signed_bool && offset == 0 {
                        size - 1
                    } else {
                        size
                    };
                    let special_values: i64 = if size >= 4 {
                        2
                    } else if size >= 2 {
                        1
                    } else {
                        0
                    };
                    let ceiling = (1i64 << high_bit.min(62)) - 1 - special_values;
                    let max = (ceiling + offset) as f64 * resolution;
                    let min = if !signed_bool || offset != 0 {
                        offset as f64 * resolution
                    } else {
                        -((1i64 << high_bit.min(62)) - 1) as f64 * resolution
                    };
                    (min, max)
                }
                _ => (0.0, 0.0),
            };

            resolved.insert(
                spec.name,
                ResolvedFieldType {
                    name: spec.name,
                    kind: spec.kind,
                    bits,
                    resolution,
                    offset,
                    unit,
                    signed: signed_bool,
                    range_min,
                    range_max,
                },
            );
        }

        Ok(Self { types: resolved })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHYSICAL: &[PhysicalQuantity] = &[PhysicalQuantity {
        name: "TEMPERATURE",
        abbreviation: "K",
        unit: "Kelvin",
        url: "",
    }];

    #[test]
    fn base_inherits_unit_and_size() {
        static TYPES: &[FieldTypeSpec] = &[
            FieldTypeSpec {
                name: "NUMBER",
                description: "",
                kind: FieldKind::Number,
                bits: None,
                resolution: None,
                offset: 0,
                unit: None,
                signed: Signedness::Unsigned,
                physical_quantity: None,
                base: None,
            },
            FieldTypeSpec {
                name: "TEMPERATURE_UINT16",
                description: "",
                kind: FieldKind::Number,
                bits: Some(16),
                resolution: Some(0.01),
                offset: 0,
                unit: None,
                signed: Signedness::Inherit,
                physical_quantity: Some("TEMPERATURE"),
                base: Some("NUMBER"),
            },
        ];

        let reg = FieldTypeRegistry::build(TYPES, PHYSICAL).unwrap();
        let t = reg.get("TEMPERATURE_UINT16").unwrap();
        assert_eq!(t.unit, Some("K"));
        assert_eq!(t.bits, Some(16));
        assert!(!t.signed);
    }

    #[test]
    fn unresolved_base_is_rejected() {
        static TYPES: &[FieldTypeSpec] = &[FieldTypeSpec {
            name: "DERIVED",
            description: "",
            kind: FieldKind::Number,
            bits: None,
            resolution: None,
            offset: 0,
            unit: None,
            signed: Signedness::Inherit,
            physical_quantity: None,
            base: Some("MISSING"),
        }];
        let err = FieldTypeRegistry::build(TYPES, &[]).unwrap_err();
        assert!(matches!(err, CatalogError::UnresolvedBase { .. }));
    }
}
