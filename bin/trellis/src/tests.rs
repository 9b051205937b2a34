use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use trellis_registry::ProfileSet;

use super::*;
use crate::commands::{Outcome, capacity, check, resolve};

const MANIFEST: &str = r#"
active = ["interactive"]

[[binding]]
contract = "Clipboard"
implementation = "SystemClipboard"

[[binding]]
contract = "Clipboard"
implementation = "MemoryClipboard"
profiles = ["headless"]

[[binding]]
contract = "Notifier"
implementation = "LogNotifier"
profiles = ["headless"]
"#;

fn unique_temp_dir(prefix: &str) -> PathBuf {
	let nanos = std::time::SystemTime::now()
		.duration_since(std::time::UNIX_EPOCH)
		.expect("system time should be after unix epoch")
		.as_nanos();
	let dir = std::env::temp_dir().join(format!("trellis-cli-{prefix}-{}-{nanos}", std::process::id()));
	std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
	dir
}

fn write_manifest(dir: &Path) -> PathBuf {
	let path = dir.join("bindings.toml");
	std::fs::write(&path, MANIFEST).expect("manifest should be writable");
	path
}

fn parse(argv: &[&str]) -> Command {
	Args::try_parse_from(std::iter::once("trellis").chain(argv.iter().copied()))
		.expect("arguments should parse")
		.command
}

fn resolve_args(manifest: &Path, extra: &[&str]) -> resolve::ResolveArgs {
	let path = manifest.to_str().expect("temp path should be utf-8");
	let argv: Vec<&str> = ["resolve", "-m", path].into_iter().chain(extra.iter().copied()).collect();
	match parse(&argv) {
		Command::Resolve(args) => args,
		other => panic!("expected resolve, got {other:?}"),
	}
}

fn check_args(manifest: &Path, extra: &[&str]) -> check::CheckArgs {
	let path = manifest.to_str().expect("temp path should be utf-8");
	let argv: Vec<&str> = ["check", "-m", path].into_iter().chain(extra.iter().copied()).collect();
	match parse(&argv) {
		Command::Check(args) => args,
		other => panic!("expected check, got {other:?}"),
	}
}

#[test]
fn load_defaults_to_manifest_active_profiles() {
	let dir = unique_temp_dir("active");
	let args = resolve_args(&write_manifest(&dir), &["Clipboard"]);

	let loaded = args.source.load().unwrap();
	assert_eq!(loaded.active, ProfileSet::INTERACTIVE);
	assert!(loaded.registry.is_locked());
	assert_eq!(loaded.registry.len(), 3);
	let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn command_line_profiles_replace_active_list_and_mask_is_ored() {
	let dir = unique_temp_dir("profiles");
	let args = resolve_args(&write_manifest(&dir), &["-p", "headless", "--mask", "16", "Clipboard"]);

	let loaded = args.source.load().unwrap();
	assert_eq!(loaded.active, ProfileSet::HEADLESS | ProfileSet::from_mask(16));
	let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn missing_manifest_is_an_error_naming_the_path() {
	let dir = unique_temp_dir("missing");
	let args = resolve_args(&dir.join("absent.toml"), &["Clipboard"]);

	let err = resolve::run(&args).unwrap_err();
	assert!(format!("{err:#}").contains("absent.toml"), "{err:#}");
	let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn unknown_command_line_profile_is_an_error() {
	let dir = unique_temp_dir("unknown");
	let args = check_args(&write_manifest(&dir), &["-p", "desktop"]);

	let err = check::run(&args).unwrap_err();
	assert!(err.to_string().contains("desktop"), "{err}");
	let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn resolve_outcomes() {
	let dir = unique_temp_dir("resolve");
	let manifest = write_manifest(&dir);

	let unique = resolve_args(&manifest, &["Clipboard"]);
	assert_eq!(resolve::run(&unique).unwrap(), Outcome::Success);

	let ambiguous = resolve_args(&manifest, &["-p", "headless", "Clipboard"]);
	assert_eq!(resolve::run(&ambiguous).unwrap(), Outcome::Failure);

	let unbound = resolve_args(&manifest, &["Notifier"]);
	assert_eq!(resolve::run(&unbound).unwrap(), Outcome::Failure);

	let unknown = resolve_args(&manifest, &["Scheduler"]);
	assert_eq!(resolve::run(&unknown).unwrap(), Outcome::Failure);
	let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn check_fails_only_when_something_is_ambiguous() {
	let dir = unique_temp_dir("check");
	let manifest = write_manifest(&dir);

	assert_eq!(check::run(&check_args(&manifest, &[])).unwrap(), Outcome::Success);
	assert_eq!(
		check::run(&check_args(&manifest, &["-p", "headless"])).unwrap(),
		Outcome::Failure
	);
	let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn capacity_parses_policy_names() {
	let Command::Capacity(args) = parse(&["capacity", "-p", "five-percent", "100", "1024"]) else {
		panic!("expected capacity");
	};
	assert_eq!(args.policy, Some(trellis_primitives::CapacityPolicy::FIVE_PERCENT_FOR_GROWTH));
	assert_eq!(args.lengths, vec![100, 1024]);
	assert_eq!(capacity::run(&args).unwrap(), Outcome::Success);

	assert!(Args::try_parse_from(["trellis", "capacity", "-p", "huge", "1"]).is_err());
	assert!(Args::try_parse_from(["trellis", "capacity"]).is_err());
}

#[test]
fn outcome_maps_to_exit_code() {
	assert_eq!(
		format!("{:?}", ExitCode::from(Outcome::Success)),
		format!("{:?}", ExitCode::SUCCESS)
	);
	assert_eq!(
		format!("{:?}", ExitCode::from(Outcome::Failure)),
		format!("{:?}", ExitCode::FAILURE)
	);
}
