use nifdoc::nif::NifFile;

use crate::cmd::test_support::{arg, run_nifdoc_json, scratch_path, write_scene};

#[test]
fn prune_drops_orphans() {
	let scene = write_scene("optimize-prune-in.nif");
	let out = scratch_path("optimize-prune-out.nif");
	let json = run_nifdoc_json(&["optimize", &arg(&scene), "--out", &arg(&out), "--prune", "--json"]);

	assert_eq!(json["blocks_before"], 4);
	assert_eq!(json["blocks_after"], 3);
	assert_eq!(json["pruned"], true);
	assert_eq!(json["sorted"], false);

	let file = NifFile::open(&out).expect("optimized file loads");
	assert_eq!(file.block_count(), 3);
	assert_eq!(file.find_block_by_name("Loose"), None);
}

#[test]
fn no_flags_runs_every_pass() {
	let scene = write_scene("optimize-all-in.nif");
	let out = scratch_path("optimize-all-out.nif");
	let json = run_nifdoc_json(&["optimize", &arg(&scene), "--out", &arg(&out), "--json"]);

	assert_eq!(json["pruned"], true);
	assert_eq!(json["sorted"], true);
	assert_eq!(json["bounds_updated"], true);

	let file = NifFile::open(&out).expect("optimized file loads");
	assert_eq!(file.find_block_by_name("Arm"), Some(1));
	assert_eq!(file.block_type_name(2), Some("NiStringExtraData"));
}
