use pretty_assertions::assert_eq;
use teamkit_audit::Outcome;
use teamkit_cli::{command, load_config, run};
use teamkit_test_utils::{RecipeDir, CLINIC_TEAM, LAW_FIRM_TEAM};

fn teamkit(args: &[&str]) -> (anyhow::Result<Outcome>, String) {
    let matches = command()
        .try_get_matches_from(std::iter::once("teamkit").chain(args.iter().copied()))
        .unwrap();
    let mut out = Vec::new();
    let result = run(&matches, &mut out);
    (result, String::from_utf8(out).unwrap())
}

fn dir_arg(dir: &RecipeDir) -> String {
    dir.path().display().to_string()
}

#[test]
fn check_clean_directory() {
    let dir = RecipeDir::new().with_recipe("clinic-team.md", CLINIC_TEAM);
    let (result, out) = teamkit(&["check", "--recipe-dir", dir_arg(&dir).as_str()]);

    assert_eq!(result.unwrap(), Outcome::Clean);
    assert_eq!(out, "OK: no missing per-role templates found\n");
}

#[test]
fn check_reports_problems() {
    let dir = RecipeDir::with_fixtures();
    let (result, out) = teamkit(&["--recipe-dir", dir_arg(&dir).as_str(), "check"]);

    let outcome = result.unwrap();
    assert_eq!(outcome, Outcome::ProblemsFound);
    assert_eq!(outcome.exit_code(), 2);
    assert!(out.contains("law-firm-team.md\n  - role=lead: missing templates.lead.tools\n"));
    assert!(out.ends_with("Total missing templates: 2\n"));
}

#[test]
fn check_json() {
    let dir = RecipeDir::with_fixtures();
    let (result, out) = teamkit(&["check", "--format", "json", "--recipe-dir", dir_arg(&dir).as_str()]);

    assert_eq!(result.unwrap(), Outcome::ProblemsFound);
    assert!(out.contains("\"outcome\": \"problems_found\""));
    assert!(out.contains("\"missing_key\": \"paralegal.tools\""));
    assert!(out.contains("\"recipe\": \"broken-team.md\""));
}

#[test]
fn patch_then_patch_again() {
    let dir = RecipeDir::new()
        .with_recipe("law-firm-team.md", LAW_FIRM_TEAM)
        .with_recipe("clinic-team.md", CLINIC_TEAM);

    let (first, out) = teamkit(&["patch", "--recipe-dir", dir_arg(&dir).as_str()]);
    assert_eq!(first.unwrap(), Outcome::Changed);
    assert!(out.contains("patched: law-firm-team.md\n"));
    assert!(out.contains("skip: clinic-team.md\n"));
    assert!(out.contains("skip: business-team.md\n"));

    let (second, out) = teamkit(&["patch", "--recipe-dir", dir_arg(&dir).as_str()]);
    assert_eq!(second.unwrap(), Outcome::Unchanged);
    assert!(!out.contains("patched:"));
}

#[test]
fn patch_dry_run() {
    let dir = RecipeDir::new().with_recipe("law-firm-team.md", LAW_FIRM_TEAM);
    let (result, out) = teamkit(&["patch", "--dry-run", "--recipe-dir", dir_arg(&dir).as_str()]);

    assert_eq!(result.unwrap(), Outcome::Changed);
    assert!(out.contains("would patch: law-firm-team.md"));
    assert_eq!(dir.read("law-firm-team.md"), LAW_FIRM_TEAM);
}

#[test]
fn missing_recipe_dir_is_an_error() {
    let (result, _) = teamkit(&["check", "--recipe-dir", "/nonexistent/teamkit/recipes"]);
    let err = result.unwrap_err();
    assert!(err.to_string().contains("cannot read recipe directory"));
}

#[test]
fn config_file_is_applied_and_flags_override() {
    let dir = RecipeDir::new()
        .with_recipe("teamkit.toml", "recipe_dir = \"elsewhere\"\ntargets = [\"law-firm-team.md\"]\n");
    let config_path = dir.file("teamkit.toml").display().to_string();

    let matches = command()
        .try_get_matches_from(["teamkit", "--config", config_path.as_str(), "check"])
        .unwrap();
    let config = load_config(&matches).unwrap();
    assert_eq!(config.recipe_dir, std::path::PathBuf::from("elsewhere"));
    assert_eq!(config.targets, vec!["law-firm-team.md".to_string()]);

    let matches = command()
        .try_get_matches_from([
            "teamkit",
            "--config",
            config_path.as_str(),
            "check",
            "--recipe-dir",
            "here",
            "--parallel",
        ])
        .unwrap();
    let config = load_config(&matches).unwrap();
    assert_eq!(config.recipe_dir, std::path::PathBuf::from("here"));
    assert!(config.parallel);
}

#[test]
fn subcommand_is_required() {
    assert!(command().try_get_matches_from(["teamkit"]).is_err());
}
