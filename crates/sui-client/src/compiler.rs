//! Move compiler collaborator.
//!
//! Compilation is delegated to the `sui` CLI, which turns a package
//! directory into base64 module bytecode plus a dependency manifest. The
//! client treats the toolchain as an external collaborator and only parses
//! its output.

use std::path::Path;
use sui_client_types::{ClientError, ClientResult, ObjectId};
use tracing::debug;

/// A compiled Move package, ready to publish.
#[derive(Debug, Clone)]
pub struct PackageArtifact {
    /// Compiled module bytecode.
    pub modules: Vec<Vec<u8>>,
    /// Package ids of transitive dependencies.
    pub dependencies: Vec<ObjectId>,
}

#[derive(Debug, serde::Deserialize)]
struct BuildOutput {
    modules: Vec<String>,
    dependencies: Vec<String>,
}

impl PackageArtifact {
    /// Parses the compiler's `--dump-bytecode-as-base64` JSON output.
    ///
    /// # Errors
    /// Returns [`ClientError::Compile`] if the output is not the expected
    /// shape or a module fails to decode.
    pub fn from_build_output(output: &str) -> ClientResult<Self> {
        let parsed: BuildOutput = serde_json::from_str(output).map_err(|e| {
            ClientError::Compile {
                diagnostics: format!("unexpected compiler output: {e}"),
            }
        })?;

        let modules = parsed
            .modules
            .iter()
            .map(|encoded| {
                base64::decode(encoded).map_err(|e| ClientError::Compile {
                    diagnostics: format!("malformed module bytecode: {e}"),
                })
            })
            .collect::<ClientResult<Vec<_>>>()?;

        let dependencies = parsed
            .dependencies
            .iter()
            .map(|id| ObjectId::from_hex(id))
            .collect::<ClientResult<Vec<_>>>()?;

        Ok(Self {
            modules,
            dependencies,
        })
    }
}

/// Compiles the Move package at `path` with the external `sui` CLI.
///
/// # Errors
///
/// Returns [`ClientError::Compile`] when the directory is not a Move
/// package or the compiler reports diagnostics, and
/// [`ClientError::Config`] when the CLI cannot be invoked at all.
pub async fn compile_package(path: &Path) -> ClientResult<PackageArtifact> {
    if !path.join("Move.toml").exists() {
        return Err(ClientError::Compile {
            diagnostics: format!("no Move.toml found in {}", path.display()),
        });
    }

    debug!(path = %path.display(), "compiling Move package");
    let output = tokio::process::Command::new("sui")
        .args(["move", "build", "--dump-bytecode-as-base64", "--path"])
        .arg(path)
        .output()
        .await
        .map_err(|e| ClientError::Config(format!("failed to invoke the move compiler: {e}")))?;

    if !output.status.success() {
        return Err(ClientError::Compile {
            diagnostics: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    PackageArtifact::from_build_output(&String::from_utf8_lossy(&output.stdout))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build_output() {
        let output = format!(
            "{{\"modules\":[\"{}\"],\"dependencies\":[\"0x1\",\"0x2\"],\"digest\":[1,2,3]}}",
            base64::encode([0xa1u8, 0x1c, 0xeb, 0x0b])
        );
        let artifact = PackageArtifact::from_build_output(&output).unwrap();
        assert_eq!(artifact.modules, vec![vec![0xa1, 0x1c, 0xeb, 0x0b]]);
        assert_eq!(
            artifact.dependencies,
            vec![
                ObjectId::from_hex("0x1").unwrap(),
                ObjectId::from_hex("0x2").unwrap()
            ]
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(PackageArtifact::from_build_output("error[E01001]: …").is_err());
        assert!(
            PackageArtifact::from_build_output("{\"modules\":[\"not base64!\"],\"dependencies\":[]}")
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_missing_move_toml() {
        let err = compile_package(Path::new("/definitely/not/a/package"))
            .await
            .unwrap_err();
        match err {
            ClientError::Compile { diagnostics } => {
                assert!(diagnostics.contains("Move.toml"));
            }
            other => panic!("expected compile error, got {other:?}"),
        }
    }
}
