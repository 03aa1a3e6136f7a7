use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Serialize;
use sponsored_op_types::UserOperation;

pub(crate) fn read_operation(path: &Path) -> Result<UserOperation> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed reading {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("failed parsing user operation JSON in {}", path.display()))
}

/// Write `value` as pretty JSON to `out`, or to stdout when no path is given.
pub(crate) fn emit_json<T: Serialize>(value: &T, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => {
            write_json_atomic(path, value)?;
            tracing::info!("wrote {}", path.display());
        }
        None => {
            let serialised =
                serde_json::to_string_pretty(value).context("failed serialising JSON")?;
            println!("{serialised}");
        }
    }
    Ok(())
}

pub(crate) fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if !parent.exists() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating directory {}", parent.display()))?;
    }

    let serialised = serde_json::to_string_pretty(value).context("failed serialising JSON")?;
    let tmp_path = tmp_path_for(path);
    fs::write(&tmp_path, serialised.as_bytes())
        .with_context(|| format!("failed writing temp file {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("failed replacing {}", path.display()))?;
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, Bytes, U256};

    fn op() -> UserOperation {
        UserOperation {
            sender: address!("4444444444444444444444444444444444444444"),
            nonce: U256::from(3u64),
            call_data: Bytes::from(vec![0xb6, 0x1d, 0x27, 0xf6]),
            ..Default::default()
        }
    }

    #[test]
    fn test_write_then_read_operation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("op.json");
        write_json_atomic(&path, &op()).unwrap();
        assert!(!tmp_path_for(&path).exists());
        assert_eq!(read_operation(&path).unwrap(), op());
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("op.json");
        fs::write(&path, "stale").unwrap();
        write_json_atomic(&path, &op()).unwrap();
        assert_eq!(read_operation(&path).unwrap(), op());
    }

    #[test]
    fn test_read_rejects_incomplete_operation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("op.json");
        fs::write(&path, r#"{"sender":"0x4444444444444444444444444444444444444444"}"#).unwrap();
        assert!(read_operation(&path).is_err());
    }
}
