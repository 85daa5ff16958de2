pub mod check_id;
pub mod dashboard;
pub mod pdvs;
pub mod usuarios;

use std::io::Read;

use serde_json::Value;

/// JSON patch from `--data`, or from stdin when the flag is absent
pub(crate) fn read_patch(data: Option<String>) -> anyhow::Result<Value> {
    let raw = match data {
        Some(raw) => raw,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    serde_json::from_str(&raw).map_err(|e| anyhow::anyhow!("Invalid JSON patch: {}", e))
}
