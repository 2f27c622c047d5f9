use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use ethers::{abi::Abi, types::Bytes};
use serde::Deserialize;

use crate::utils::decode_hex;

const BUILD_INFO_DIR: &str = "build-info";
const DBG_SUFFIX: &str = ".dbg.json";

/// A compiled contract as written by `npx hardhat compile`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub contract_name: String,
    pub source_name: String,
    pub abi: Abi,
    bytecode: String,

    #[serde(skip)]
    path: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DebugFile {
    build_info: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuildInfo {
    solc_version: String,
}

impl Artifact {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read artifact {}", path.display()))?;
        let mut artifact: Self = serde_json::from_str(&content)
            .with_context(|| format!("invalid artifact {}", path.display()))?;
        artifact.path = path.to_path_buf();
        Ok(artifact)
    }

    /// Find the artifact for `name` under `dir`. `name` is either a bare
    /// contract name or a fully qualified `contracts/File.sol:Name`.
    pub fn find(dir: &Path, name: &str) -> Result<Self> {
        let (source, contract) = match name.rsplit_once(':') {
            Some((source, contract)) => (Some(source), contract),
            None => (None, name),
        };

        if !dir.is_dir() {
            bail!(
                "artifacts directory {} does not exist, compile the contracts first",
                dir.display()
            );
        }

        let mut files = Vec::new();
        collect_json_files(dir, &mut files)
            .with_context(|| format!("failed to read artifacts directory {}", dir.display()))?;

        let mut matches = Vec::new();
        for file in files {
            if file.file_stem().and_then(|s| s.to_str()) != Some(contract) {
                continue;
            }
            let artifact = Self::load(&file)?;
            if artifact.contract_name == contract
                && source.map_or(true, |s| s == artifact.source_name)
            {
                matches.push(artifact);
            }
        }

        match matches.len() {
            0 => Err(anyhow!(
                "artifact for contract `{name}` not found in {}, compile the contracts first",
                dir.display()
            )),
            1 => Ok(matches.remove(0)),
            _ => {
                let names = matches
                    .iter()
                    .map(|a| format!("{}:{}", a.source_name, a.contract_name))
                    .collect::<Vec<_>>();
                Err(anyhow!(
                    "contract name `{name}` is ambiguous, use one of: {}",
                    names.join(", ")
                ))
            }
        }
    }

    /// Creation bytecode.
    pub fn bytecode(&self) -> Result<Bytes> {
        if self.bytecode.contains("__$") {
            bail!(
                "{} has unlinked library references",
                self.contract_name
            );
        }
        let code = decode_hex(&self.bytecode)
            .with_context(|| format!("invalid bytecode in {}", self.path.display()))?;
        if code.is_empty() {
            bail!(
                "{} has no bytecode, abstract contracts and interfaces cannot be deployed",
                self.contract_name
            );
        }
        Ok(code.into())
    }

    /// Compiler version from the build-info referenced by the debug file
    /// next to the artifact, if hardhat wrote one.
    pub fn solc_version(&self) -> Option<String> {
        let file_name = format!("{}{DBG_SUFFIX}", self.contract_name);
        let dbg_path = self.path.with_file_name(file_name);
        let dbg: DebugFile = serde_json::from_str(&std::fs::read_to_string(&dbg_path).ok()?).ok()?;

        let build_info_path = dbg_path.parent()?.join(dbg.build_info);
        let build_info: BuildInfo =
            serde_json::from_str(&std::fs::read_to_string(build_info_path).ok()?).ok()?;
        Some(build_info.solc_version)
    }
}

fn collect_json_files(dir: &Path, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            if path.file_name().and_then(|s| s.to_str()) != Some(BUILD_INFO_DIR) {
                collect_json_files(&path, files)?;
            }
        } else if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
            if name.ends_with(".json") && !name.ends_with(DBG_SUFFIX) {
                files.push(path);
            }
        }
    }
    Ok(())
}
