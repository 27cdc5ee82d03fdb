use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::OnceLock;

use nifdoc::nif::objects::{NiNode, NiStringExtraData};
use nifdoc::nif::{NiVersion, NifFile, SaveOptions};
use nifdoc_testkit::{scratch_path as shared_scratch_path, target_dir as workspace_target_dir};

static NIFDOC_BIN: OnceLock<PathBuf> = OnceLock::new();

pub(crate) fn scratch_path(name: &str) -> PathBuf {
	shared_scratch_path(name)
}

pub(crate) fn arg(path: &Path) -> String {
	path.to_string_lossy().into_owned()
}

/// Skyrim SE scene: root (0) with child `Arm` (1) and extra data `Prn` (3); `Loose` (2) is orphaned.
pub(crate) fn write_scene(name: &str) -> PathBuf {
	let mut file = NifFile::create(NiVersion::skyrim_se(), "BSFadeNode", "Scene Root").expect("fresh file");
	let arm = file.add_block(Box::new(NiNode::new("Arm"))).expect("add Arm");
	file.add_block(Box::new(NiNode::new("Loose"))).expect("add Loose");
	let extra = file.add_block(Box::new(NiStringExtraData::new("Prn", "SHIELD"))).expect("add extra");
	let root = file.get_mut::<NiNode>(0).expect("root");
	root.children.push(arm);
	root.av.net.extra_data.push(extra);

	let path = scratch_path(name);
	file.save(&path, SaveOptions::default()).expect("write scene");
	path
}

pub(crate) fn run_nifdoc(args: &[&str]) -> Output {
	Command::new(nifdoc_bin()).args(args).output().expect("nifdoc command executes")
}

pub(crate) fn run_nifdoc_json(args: &[&str]) -> serde_json::Value {
	let output = run_nifdoc(args);
	assert!(
		output.status.success(),
		"nifdoc command failed with status={}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	serde_json::from_slice(&output.stdout).expect("stdout should be valid json")
}

fn nifdoc_bin() -> &'static PathBuf {
	NIFDOC_BIN.get_or_init(resolve_nifdoc_bin)
}

fn resolve_nifdoc_bin() -> PathBuf {
	if let Some(path) = option_env!("CARGO_BIN_EXE_nifdoc") {
		return PathBuf::from(path);
	}
	if let Ok(path) = std::env::var("CARGO_BIN_EXE_nifdoc") {
		return PathBuf::from(path);
	}

	let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
	let target_dir = workspace_target_dir();

	let mut bin = target_dir.join("debug");
	bin.push(if cfg!(windows) { "nifdoc.exe" } else { "nifdoc" });

	let status = Command::new("cargo")
		.current_dir(&manifest_dir)
		.args(["build", "--quiet", "--bin", "nifdoc"])
		.status()
		.expect("cargo build executes");
	assert!(status.success(), "failed to build nifdoc binary at {}", bin.display());

	bin
}
