//! Command-line parsing

use clap::Parser;
use tabregress::cli::{Cli, Commands, OutputFormat, ToleranceArgs};
use tabregress::{RegressionError, ToleranceSpec};

use crate::common::TestFixture;

#[test]
fn test_check_command_parses_flags() {
    let cli = Cli::try_parse_from([
        "tabregress",
        "--verbose",
        "check",
        "out.csv",
        "--snapshot",
        "data/values.csv",
        "--atol",
        "0.01",
        "--regen-all",
        "--json",
    ])
    .unwrap();

    assert!(cli.verbose);
    let settings = cli.command.settings();
    assert!(settings.regen_all);
    assert!(!settings.force_regen);

    match cli.command {
        Commands::Check {
            snapshot,
            tolerance,
            json,
            ..
        } => {
            assert_eq!(snapshot.to_string_lossy(), "data/values.csv");
            assert_eq!(tolerance.atol, Some(0.01));
            assert!(json);
        }
        _ => panic!("expected check command"),
    }
}

#[test]
fn test_check_requires_snapshot() {
    assert!(Cli::try_parse_from(["tabregress", "check", "out.csv"]).is_err());
}

#[test]
fn test_show_defaults_to_pretty() {
    let cli = Cli::try_parse_from(["tabregress", "show", "values.csv"]).unwrap();
    match cli.command {
        Commands::Show { format, .. } => {
            assert!(matches!(OutputFormat::parse(&format), Ok(OutputFormat::Pretty)))
        }
        _ => panic!("expected show command"),
    }
}

#[test]
fn test_compare_settings_never_regenerate() {
    let cli = Cli::try_parse_from(["tabregress", "compare", "a.csv", "b.csv"]).unwrap();
    let settings = cli.command.settings();
    assert!(!settings.force_regen);
    assert!(!settings.regen_all);
}

#[test]
fn test_tolerance_file_feeds_check_options() {
    let fixture = TestFixture::new().unwrap();
    let path = fixture.root().join("tolerances.json");
    std::fs::write(
        &path,
        r#"{"default": {"atol": 0.2}, "columns": {"x": {"rtol": 0.1}}}"#,
    )
    .unwrap();

    let args = ToleranceArgs {
        tolerances: Some(path.clone()),
        ..ToleranceArgs::default()
    };
    let options = args.to_check_options().unwrap();
    assert_eq!(options.default_tolerance, Some(ToleranceSpec::closeness(0.2, 0.0)));
    assert_eq!(options.tolerances["x"], ToleranceSpec::closeness(0.0, 0.1));

    let args = ToleranceArgs {
        tolerances: Some(path),
        rtol: Some(0.3),
        ..ToleranceArgs::default()
    };
    let options = args.to_check_options().unwrap();
    assert_eq!(options.default_tolerance, Some(ToleranceSpec::closeness(0.0, 0.3)));
}

#[test]
fn test_invalid_operator_flag_fails_when_resolved() {
    let args = ToleranceArgs {
        compare_operator: Some("<".to_string()),
        ..ToleranceArgs::default()
    };
    let options = args.to_check_options().unwrap();
    assert!(matches!(
        options.tolerance_config(),
        Err(RegressionError::InvalidPolicy { .. })
    ));
}
