//! Normalized catalog export.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::info;

use crate::error::{CatalogError, CatalogResult};
use crate::normalizer::NormalizedCatalog;

const INDENT: &[u8] = b"    ";

/// Render the catalog as JSON indented by four spaces, keys in catalog order.
pub fn to_pretty_json(catalog: &NormalizedCatalog) -> CatalogResult<String> {
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    catalog.serialize(&mut serializer)?;

    String::from_utf8(buf).map_err(|e| CatalogError::Json(serde::ser::Error::custom(e)))
}

/// Write the catalog to `path`, replacing any previous file.
pub fn write_catalog(catalog: &NormalizedCatalog, path: impl AsRef<Path>) -> CatalogResult<()> {
    let path = path.as_ref();
    let json = to_pretty_json(catalog)?;

    let write_failure = |source| CatalogError::WriteFailure {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_failure)?;
    }
    fs::write(path, json).map_err(write_failure)?;

    info!("Templates saved to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::normalize;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_pretty_json_layout() {
        let catalog = normalize(&[json!({
            "name": "R1", "template_id": "t1", "builtin": true,
            "template_type": "dynamips", "symbol": "router"
        })]);

        let expected = r#"{
    "R1": {
        "compute_id": "local",
        "node_type": "dynamips",
        "symbol": "router",
        "template_id": "t1"
    }
}"#;
        assert_eq!(to_pretty_json(&catalog).unwrap(), expected);
    }

    #[test]
    fn test_keys_keep_insertion_order() {
        let catalog = normalize(&[
            json!({"name": "zeta", "template_id": "1", "builtin": true}),
            json!({"name": "alpha", "template_id": "2", "builtin": true}),
        ]);
        let json = to_pretty_json(&catalog).unwrap();
        assert!(json.find("zeta").unwrap() < json.find("alpha").unwrap());
    }

    #[test]
    fn test_empty_catalog() {
        assert_eq!(to_pretty_json(&NormalizedCatalog::new()).unwrap(), "{}");
    }

    #[test]
    fn test_write_overwrites() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("gns3_templates.json");
        fs::write(&path, "previous contents that are much longer than the new ones").unwrap();

        write_catalog(&NormalizedCatalog::new(), &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }
}
