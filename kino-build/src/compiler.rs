//! The external asset compiler.
//!
//! The build only consumes the bytes of the compiled bundle; how assets
//! get compiled is up to the [`AssetCompiler`] implementation.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CompileError;

/// Platform a bundle is compiled for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildTarget {
    #[default]
    StandaloneWindows64,
    StandaloneLinux64,
    StandaloneOSX,
}

impl BuildTarget {
    pub const ALL: [BuildTarget; 3] = [
        BuildTarget::StandaloneWindows64,
        BuildTarget::StandaloneLinux64,
        BuildTarget::StandaloneOSX,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BuildTarget::StandaloneWindows64 => "StandaloneWindows64",
            BuildTarget::StandaloneLinux64 => "StandaloneLinux64",
            BuildTarget::StandaloneOSX => "StandaloneOSX",
        }
    }
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standalonewindows64" | "windows" | "win64" => Ok(BuildTarget::StandaloneWindows64),
            "standalonelinux64" | "linux" => Ok(BuildTarget::StandaloneLinux64),
            "standaloneosx" | "osx" | "macos" => Ok(BuildTarget::StandaloneOSX),
            other => Err(format!("unknown build target '{other}'")),
        }
    }
}

/// One bundle to compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
    pub bundle_name: String,
    /// Project-relative source asset paths.
    pub assets: BTreeSet<PathBuf>,
    /// Project-relative staging folder the bundle is expected in.
    pub staging_folder: PathBuf,
    pub target: BuildTarget,
    pub project_root: PathBuf,
}

impl CompileRequest {
    /// Where the compiled bundle is expected once compilation succeeds.
    pub fn output_path(&self) -> PathBuf {
        self.project_root
            .join(&self.staging_folder)
            .join(&self.bundle_name)
    }
}

/// Compiles a set of source assets into one bundle at
/// [`CompileRequest::output_path`].
pub trait AssetCompiler {
    fn compile(&self, request: &CompileRequest) -> Result<(), CompileError>;
}

/// Runs an external program:
///
/// ```text
/// <program> <args..> --bundle <name> --target <target> --staging <dir> --assets <list-file>
/// ```
///
/// The list file holds one project-relative asset path per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandCompiler {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandCompiler {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn failed(request: &CompileRequest, message: impl Into<String>) -> CompileError {
        CompileError::Failed {
            bundle: request.bundle_name.clone(),
            message: message.into(),
        }
    }
}

impl AssetCompiler for CommandCompiler {
    fn compile(&self, request: &CompileRequest) -> Result<(), CompileError> {
        let staging = request.project_root.join(&request.staging_folder);
        fs::create_dir_all(&staging)
            .map_err(|e| Self::failed(request, format!("unable to create {}: {e}", staging.display())))?;

        let list_path = staging.join(format!("{}.assets", request.bundle_name));
        let list: String = request
            .assets
            .iter()
            .map(|p| format!("{}\n", p.to_string_lossy().replace('\\', "/")))
            .collect();
        fs::write(&list_path, list)
            .map_err(|e| Self::failed(request, format!("unable to write asset list: {e}")))?;

        debug!(
            program = %self.program.display(),
            bundle = %request.bundle_name,
            assets = request.assets.len(),
            "Running asset compiler"
        );

        let output = Command::new(&self.program)
            .current_dir(&request.project_root)
            .args(&self.args)
            .arg("--bundle")
            .arg(&request.bundle_name)
            .arg("--target")
            .arg(request.target.as_str())
            .arg("--staging")
            .arg(&staging)
            .arg("--assets")
            .arg(&list_path)
            .output();

        let _ = fs::remove_file(&list_path);

        let output = output.map_err(|source| CompileError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Self::failed(
                request,
                format!("{}: {}", output.status, stderr.trim()),
            ));
        }

        if !request.output_path().is_file() {
            return Err(Self::failed(
                request,
                format!("no bundle at {}", request.output_path().display()),
            ));
        }

        Ok(())
    }
}

/// Compiles nothing; every request fails. Used where no compiler is
/// configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCompiler;

impl AssetCompiler for NoCompiler {
    fn compile(&self, request: &CompileRequest) -> Result<(), CompileError> {
        Err(CommandCompiler::failed(request, "no asset compiler configured"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn request(root: &Path) -> CompileRequest {
        CompileRequest {
            bundle_name: "wheels".into(),
            assets: BTreeSet::from([PathBuf::from("Content/a.prefab")]),
            staging_folder: "Build/CarParts".into(),
            target: BuildTarget::StandaloneLinux64,
            project_root: root.to_path_buf(),
        }
    }

    #[test]
    fn target_parsing() {
        assert_eq!("linux".parse::<BuildTarget>(), Ok(BuildTarget::StandaloneLinux64));
        assert_eq!(
            "StandaloneWindows64".parse::<BuildTarget>(),
            Ok(BuildTarget::StandaloneWindows64)
        );
        assert!("ps5".parse::<BuildTarget>().is_err());
        for target in BuildTarget::ALL {
            assert_eq!(target.to_string().parse::<BuildTarget>(), Ok(target));
        }
    }

    #[test]
    fn output_path_is_inside_staging() {
        let req = request(Path::new("/proj"));
        assert_eq!(req.output_path(), PathBuf::from("/proj/Build/CarParts/wheels"));
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = CommandCompiler::new(dir.path().join("no-such-bundler"), vec![]);
        let err = compiler.compile(&request(dir.path())).unwrap_err();
        assert!(matches!(err, CompileError::Spawn { .. }));
        assert!(!dir.path().join("Build/CarParts/wheels.assets").exists());
    }

    #[test]
    fn no_compiler_always_fails() {
        let err = NoCompiler.compile(&request(Path::new("."))).unwrap_err();
        assert!(matches!(err, CompileError::Failed { bundle, .. } if bundle == "wheels"));
    }

    #[cfg(unix)]
    #[test]
    fn failing_program_reports_status() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = CommandCompiler::new("false", vec![]);
        let err = compiler.compile(&request(dir.path())).unwrap_err();
        assert!(matches!(err, CompileError::Failed { .. }));
    }
}
