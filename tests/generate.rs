use drcop_parser::{
    generate_file, parse_source, Config, Error, ParserConfig, Severity, SideEffect, Value,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const FIXTURE: &str = include_str!("fixtures/funcs.oln.py");

fn fixture_in(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("funcs.oln.py");
    fs::write(&path, FIXTURE).unwrap();
    path
}

#[test]
fn test_fixture_parses_every_function() {
    let parsed = parse_source(FIXTURE, &ParserConfig::default()).unwrap();

    let names: Vec<&str> = parsed.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "poundsToKG",
            "getMassObject",
            "getVelocitySkater",
            "determineVelocityMessage",
            "isHeavy",
            "getFuel"
        ]
    );

    let skater = &parsed.functions[2];
    assert_eq!(
        skater.parameter_names(),
        vec!["skaters_mass", "objects_mass", "objects_velocity"]
    );
    assert_eq!(skater.return_name.as_deref(), Some("skaters_velocity"));

    let fuel = &parsed.functions[5];
    assert_eq!(fuel.arity(), 0);
    assert_eq!(fuel.side_effects, vec![SideEffect::Console]);
    let levels: Vec<usize> = fuel.outline.iter().map(|o| o.level).collect();
    assert_eq!(levels, vec![0, 0, 1]);

    // Only the unrecognized output tag of getFuel is reported.
    assert_eq!(parsed.diagnostics.len(), 1);
    assert_eq!(parsed.diagnostics[0].severity, Severity::Ignorable);
    assert!(parsed.functions.iter().all(|f| f.is_complete()));
}

#[test]
fn test_example_count_matches_arrow_lines() {
    let parsed = parse_source(FIXTURE, &ParserConfig::default()).unwrap();
    let counts: Vec<usize> = parsed.functions.iter().map(|f| f.examples.len()).collect();
    assert_eq!(counts, vec![3, 3, 2, 3, 2, 0]);

    let mass = &parsed.functions[1].examples[0];
    assert_eq!(mass.args, vec![Value::Str("x".to_string())]);
    assert_eq!(mass.expected, Value::Float(0.0));
    assert_eq!(mass.explanation.as_deref(), Some("# error case ... defaults to 0.0"));
}

#[test]
fn test_stub_reproduces_recipe_blocks() {
    let dir = TempDir::new().unwrap();
    let path = fixture_in(&dir);
    let generation = generate_file(&path, &Config::default(), None).unwrap();
    let stub = &generation.stub.contents;

    let expected_function = r#"def poundsToKG(pounds):
    """
    CONTRACT | poundsToKG : float -> float
    -------: | :-------------------------------------------------------------------
    PURPOSE  | Converts weight in pounds to equivalent mass in kilograms.
    IN/OUTS  | None/None
    EXAMPLE  | 0.0 -> 0.0
             | 1.0 -> 0.453592
             | 5.5 -> 2.494756
    """
    pass    # delete "pass" once you have real code for this function!

    # calculate the result with given formula


"#;
    assert!(stub.contains(expected_function));
    assert!(stub.contains("def getFuel():\n"));
    assert!(stub.contains("        # and return the mass of the object\n"));

    for line in FIXTURE.lines().filter(|l| l.starts_with("CONTRACT")) {
        assert!(stub.contains(&format!("    {}\n", line)));
    }
    // Backticks survive in outline comments, not in purpose lines.
    assert!(stub.contains("    # prompt user for `fuel` value\n"));
    assert!(!stub.lines().any(|l| l.contains("PURPOSE") && l.contains('`')));
}

#[test]
fn test_test_suite_uses_typed_assertions() {
    let dir = TempDir::new().unwrap();
    let path = fixture_in(&dir);
    let generation = generate_file(&path, &Config::default(), None).unwrap();
    let tests = &generation.tests.contents;

    assert!(tests.starts_with("import unittest\nfrom funcs import *\n"));
    assert!(tests.contains(
        "    def test_getMassObject_1(self):\n        # error case ... defaults to 0.0\n        self.assertAlmostEqual(getMassObject('x'), 0.0)\n"
    ));
    assert!(tests.contains(
        "self.assertEqual(determineVelocityMessage(0.05), 'My grandmother skates faster than you!')"
    ));
    assert!(tests.contains("self.assertEqual(determineVelocityMessage(0.2), None)"));
    assert!(tests.contains("self.assertTrue(isHeavy(10.0))"));
    assert!(tests.contains("self.assertFalse(isHeavy(0.5))"));
    assert!(tests.contains("self.assertAlmostEqual(getVelocitySkater(54.43104, 5.3, 7.3782789321), 0.7184297478)"));
    assert!(!tests.contains("test_getFuel"));
    assert_eq!(tests.matches("    def test_").count(), 13);
}

#[test]
fn test_artifacts_are_written_next_to_outline() {
    let dir = TempDir::new().unwrap();
    let path = fixture_in(&dir);
    let generation = generate_file(&path, &Config::default(), None).unwrap();

    generation.stub.write().unwrap();
    generation.tests.write().unwrap();

    assert!(dir.path().join("funcs.py").exists());
    assert!(dir.path().join("funcs_tests.py").exists());
}

#[test]
fn test_custom_template_and_indent() {
    let config: Config = toml::from_str(
        r#"
[parser]
indent_size = 2

[template]
project = "2 - Moonlander"
student = "Mike Ryu"
imports = []
"#,
    )
    .unwrap();

    let dir = TempDir::new().unwrap();
    let path = fixture_in(&dir);
    let generation = generate_file(&path, &config, None).unwrap();

    assert!(generation
        .stub
        .contents
        .starts_with("\"\"\"\nProject 2 - Moonlander\n\nName: Mike Ryu\n"));
    assert!(!generation.stub.contents.contains("from math import sqrt"));

    // Four columns at two per level is two levels deep.
    let fuel = generation.functions.iter().find(|f| f.name == "getFuel").unwrap();
    assert_eq!(fuel.outline[2].level, 2);
}

#[test]
fn test_critical_error_produces_no_output() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.oln.py");
    let broken = FIXTURE.replace(
        "CONTRACT | isHeavy : float -> bool",
        "CONTRACT | isHeavy : float bool",
    );
    fs::write(&path, broken).unwrap();

    match generate_file(&path, &Config::default(), None) {
        Err(Error::Aborted {
            critical,
            diagnostics,
        }) => {
            assert_eq!(critical.severity, Severity::Critical);
            assert_eq!(critical.message, "Arrow (->) is expected in CONTRACT");
            assert!(critical.source.starts_with("CONTRACT | isHeavy"));
            assert!(diagnostics.iter().all(|d| d.severity == Severity::Ignorable));
        }
        other => panic!("expected abort, got {:?}", other.map(|g| g.module)),
    }
    assert!(!Path::new(&dir.path().join("broken.py")).exists());
}
