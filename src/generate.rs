//! @ai:module:intent Turn outline files on disk into stub and test artifacts
//! @ai:module:layer application
//! @ai:module:public_api generate_file, parse_file, discover_outlines, module_name, Artifact, Generation
//! @ai:module:depends_on parser, writer, config, error
//!
//! Everything here sits around the core: it reads outline files, feeds the
//! parser, asks the configured writer for text and decides where that text
//! goes. Nothing is written unless the caller asks an [`Artifact`] to.

use crate::config::Config;
use crate::diagnostic::Diagnostic;
use crate::error::{Error, Result};
use crate::model::Function;
use crate::parser::{parse_source, ParseOutput, ParserConfig};
use crate::writer::create_writer;
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Required suffix of an outline file name.
pub const OUTLINE_SUFFIX: &str = ".oln.py";

/// @ai:intent A generated file: where it goes and what it holds
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    #[serde(skip)]
    pub contents: String,
}

impl Artifact {
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// @ai:intent Persist the contents, replacing any existing file
    /// @ai:effects fs:write
    pub fn write(&self) -> Result<()> {
        std::fs::write(&self.path, &self.contents)?;
        tracing::info!(path = %self.path.display(), "wrote artifact");
        Ok(())
    }
}

/// @ai:intent Outcome of processing one outline file
#[derive(Debug, Clone, Serialize)]
pub struct Generation {
    pub source: PathBuf,
    pub module: String,
    pub stub: Artifact,
    pub tests: Artifact,
    pub functions: Vec<Function>,
    pub diagnostics: Vec<Diagnostic>,
}

/// @ai:intent Derive the module name from an outline path
/// @ai:post Err(InvalidOutlinePath) unless the file name ends in ".oln.py" with a non-empty stem
/// @ai:example ("inputs/funcs.oln.py") -> "funcs"
/// @ai:effects pure
pub fn module_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_suffix(OUTLINE_SUFFIX))
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
        .ok_or_else(|| Error::InvalidOutlinePath(path.to_path_buf()))
}

/// @ai:intent Pick the directory generated files go to
/// @ai:post an explicit directory that does not exist falls back to "."
/// @ai:effects fs:read
pub fn output_dir(outline: &Path, explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(dir) if dir.is_dir() => dir.to_path_buf(),
        Some(dir) => {
            tracing::warn!(
                dir = %dir.display(),
                "output directory does not exist, using the current directory"
            );
            PathBuf::from(".")
        }
        None => match outline.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        },
    }
}

/// @ai:intent Read an outline file and run it through the parser
/// @ai:post Err(Aborted) when the outline raised a critical diagnostic
/// @ai:effects fs:read
pub fn parse_file(path: &Path, config: &ParserConfig) -> Result<ParseOutput> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), lines = content.lines().count(), "parsing outline");
    parse_source(&content, config)
}

/// @ai:intent Parse an outline and render its stub and test artifacts without writing them
/// @ai:pre path names an ".oln.py" file
/// @ai:post no artifact is produced when parsing aborted
/// @ai:effects fs:read
pub fn generate_file(path: &Path, config: &Config, explicit_dir: Option<&Path>) -> Result<Generation> {
    let module = module_name(path)?;
    let writer = create_writer(&config.output.backend, &config.template)?;
    let parsed = parse_file(path, &config.parser)?;

    let dir = output_dir(path, explicit_dir);
    let stub = Artifact {
        path: dir.join(format!("{}{}", module, writer.stub_suffix())),
        contents: writer.render_stub(&parsed.functions),
    };
    let tests = Artifact {
        path: dir.join(format!("{}{}", module, writer.tests_suffix())),
        contents: writer.render_tests(&parsed.functions, &module),
    };

    tracing::info!(
        outline = %path.display(),
        functions = parsed.functions.len(),
        diagnostics = parsed.diagnostics.len(),
        language = writer.language(),
        "outline processed"
    );

    Ok(Generation {
        source: path.to_path_buf(),
        module,
        stub,
        tests,
        functions: parsed.functions,
        diagnostics: parsed.diagnostics,
    })
}

/// @ai:intent Find every outline file under a directory, sorted by path
/// @ai:effects fs:read
pub fn discover_outlines(dir: &Path) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.file_name().to_string_lossy().ends_with(OUTLINE_SUFFIX))
        .map(|e| e.into_path())
        .collect();
    found.sort();
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const OUTLINE: &str = r#""""
CONTRACT | double : int -> int
PURPOSE  | Doubles `n`.
EXAMPLE  | 2 -> 4
"""
# multiply by two
"#;

    #[test]
    fn test_module_name() {
        assert_eq!(module_name(Path::new("inputs/funcs.oln.py")).unwrap(), "funcs");
        assert!(matches!(
            module_name(Path::new("funcs.py")),
            Err(Error::InvalidOutlinePath(_))
        ));
        assert!(module_name(Path::new(".oln.py")).is_err());
    }

    #[test]
    fn test_output_dir_defaults_to_outline_parent() {
        assert_eq!(output_dir(Path::new("a/b/f.oln.py"), None), PathBuf::from("a/b"));
        assert_eq!(output_dir(Path::new("f.oln.py"), None), PathBuf::from("."));
        assert_eq!(
            output_dir(Path::new("f.oln.py"), Some(Path::new("/nonexistent/out"))),
            PathBuf::from(".")
        );
    }

    #[test]
    fn test_generate_file_renders_both_artifacts() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("math.oln.py");
        fs::write(&path, OUTLINE).unwrap();

        let generation = generate_file(&path, &Config::default(), None).unwrap();
        assert_eq!(generation.module, "math");
        assert_eq!(generation.stub.path, dir.path().join("math.py"));
        assert_eq!(generation.tests.path, dir.path().join("math_tests.py"));
        assert!(generation.stub.contents.contains("def double(n):"));
        assert!(generation
            .tests
            .contents
            .contains("self.assertEqual(double(2), 4)"));
        assert!(!generation.stub.exists());

        generation.stub.write().unwrap();
        assert!(generation.stub.exists());
        assert_eq!(fs::read_to_string(&generation.stub.path).unwrap(), generation.stub.contents);
    }

    #[test]
    fn test_generate_file_aborts_without_artifacts() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.oln.py");
        fs::write(&path, "\"\"\"\nCONTRACT | foo : int int\n\"\"\"\n").unwrap();

        let result = generate_file(&path, &Config::default(), None);
        assert!(matches!(result, Err(Error::Aborted { .. })));
        assert!(!dir.path().join("broken.py").exists());
        assert!(!dir.path().join("broken_tests.py").exists());
    }

    #[test]
    fn test_parse_file_missing() {
        let result = parse_file(Path::new("/nonexistent/x.oln.py"), &ParserConfig::default());
        assert!(matches!(result, Err(Error::FileRead { .. })));
    }

    #[test]
    fn test_discover_outlines() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.oln.py"), OUTLINE).unwrap();
        fs::write(dir.path().join("nested/a.oln.py"), OUTLINE).unwrap();
        fs::write(dir.path().join("plain.py"), "x = 1\n").unwrap();

        let found = discover_outlines(dir.path());
        assert_eq!(
            found,
            vec![dir.path().join("b.oln.py"), dir.path().join("nested/a.oln.py")]
        );
    }
}
