//! Catalog model and field-type inheritance (`C2`/`C3`): ties the
//! build-time-generated static tables together into one immutable,
//! process-wide, `Sync` catalog.
pub mod field_types;
pub mod matcher;

use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::core::{LookupTable, PgnSpec};
use crate::error::CatalogError;
pub use field_types::{FieldTypeRegistry, ResolvedFieldType};

/// Unit-rendering mode selected at catalog init (spec S1 ambient configuration,
/// S4.3). `AsCataloged` applies no conversion and is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitSystem {
    #[default]
    AsCataloged,
    Si,
    NonSi,
}

/// The fully resolved, read-only catalog: field types, physical quantities
/// (folded into the field types at build time), lookup tables, and the PGN
/// list. Safe to share across decoder sessions without synchronization.
pub struct Catalog {
    pub field_types: FieldTypeRegistry,
    pub lookups: BTreeMap<&'static str, &'static LookupTable>,
    pub pgns: &'static [PgnSpec],
    pub unit_system: UnitSystem,
}

impl Catalog {
    /// All catalog entries for a given PGN id (may be more than one when
    /// disambiguated by match-fields, spec S4.8).
    pub fn entries_for(&self, pgn: u32) -> impl Iterator<Item = &'static PgnSpec> {
        self.pgns.iter().filter(move |p| p.pgn == pgn)
    }

    pub fn lookup(&self, name: &str) -> Option<&'static LookupTable> {
        self.lookups.get(name).copied()
    }
}

/// Build the catalog from the generated static tables, performing the C3
/// validation pass (spec S4.3): every field's `field_type` must resolve,
/// every repeating group must have both a start and (when declared) a count
/// in range.
pub fn build(
    raw_field_types: &'static [crate::core::FieldTypeSpec],
    physical: &'static [crate::core::PhysicalQuantity],
    lookup_tables: &'static [LookupTable],
    pgns: &'static [PgnSpec],
    unit_system: UnitSystem,
) -> Result<Catalog, CatalogError> {
    let field_types = FieldTypeRegistry::build(raw_field_types, physical)?;

    let mut lookups = BTreeMap::new();
    for table in lookup_tables {
        lookups.insert(table.name, table);
    }

    for pgn_spec in pgns {
        for field in pgn_spec.fields {
            if field_types.get(field.field_type).is_none() {
                return Err(CatalogError::UnknownFieldType {
                    pgn: pgn_spec.pgn,
                    field: field.id,
                    field_type: field.field_type,
                });
            }
        }

        for repeating in pgn_spec.repeating_1.iter().chain(pgn_spec.repeating_2.iter()) {
            if repeating.start_field_order == 0 {
                return Err(CatalogError::RepeatingGroupWithoutStart { pgn: pgn_spec.pgn });
            }
            let start_in_range = pgn_spec
                .fields
                .iter()
                .any(|f| f.order == repeating.start_field_order);
            if !start_in_range {
                return Err(CatalogError::RepeatingGroupOutOfRange {
                    pgn: pgn_spec.pgn,
                    order: repeating.start_field_order,
                });
            }
            if let Some(count_order) = repeating.count_field_order {
                let count_in_range = pgn_spec.fields.iter().any(|f| f.order == count_order);
                if !count_in_range {
                    return Err(CatalogError::RepeatingGroupOutOfRange {
                        pgn: pgn_spec.pgn,
                        order: count_order,
                    });
                }
            }
        }
    }

    Ok(Catalog {
        field_types,
        lookups,
        pgns,
        unit_system,
    })
}

static CATALOG: OnceLock<Catalog> = OnceLock::new();

/// Lazily build and return the process-wide catalog using the tables
/// generated by `build.rs` at `AsCataloged` unit rendering. Catalog errors
/// are fatal at startup per spec S7: this panics rather than propagating,
/// since a malformed generated catalog indicates a broken build, not a
/// recoverable runtime condition.
pub fn catalog() -> &'static Catalog {
    CATALOG.get_or_init(|| {
        build(
            crate::catalog::generated::FIELD_TYPES,
            crate::catalog::generated::PHYSICAL_QUANTITIES,
            crate::catalog::generated::LOOKUP_TABLES,
            crate::catalog::generated::PGN_TABLE,
            UnitSystem::AsCataloged,
        )
        .expect("generated PGN catalog failed validation - this indicates a build.rs/canboat.json mismatch")
    })
}

/// Generated catalog data, produced by `build.rs` from `canboat.json`.
pub mod generated {
    include!(concat!(env!("OUT_DIR"), "/catalog_data.rs"));
}
