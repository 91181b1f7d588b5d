//! Paths and constants used during build-time code generation.
//==================================================================================CONF
/// Manifest containing the list of PGNs to generate.
pub(crate) const PGN_MANIFEST_PATH: &str = "build_core/var/pgn_manifest.json";
/// Complete CANboat database (PGNs + metadata).
pub(crate) const CANBOAT_DOC_PATH: &str = "build_core/var/canboat.json";
/// Generated catalog data file name (written to `OUT_DIR`), `include!`d by
/// `src/catalog/mod.rs`.
pub(crate) const OUT_DIR_CATALOG_FILE_NAME: &str = "catalog_data.rs";
pub(crate) const _FORBIDEN_PGN: &[u32] = &[126208];
//==========================================TESTS
// pub(crate) const CANBOAT_DOC_PATH: &str = "_doc/technique/canboat_corrupted.json";
