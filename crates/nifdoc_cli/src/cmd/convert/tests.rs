use nifdoc::nif::NifFile;

use crate::cmd::test_support::{arg, run_nifdoc, run_nifdoc_json, scratch_path, write_scene};

#[test]
fn convert_retargets_the_header() {
	let scene = write_scene("convert-in.nif");
	let out = scratch_path("convert-fo4.nif");
	let json = run_nifdoc_json(&["convert", &arg(&scene), "--out", &arg(&out), "--target", "fo4", "--json"]);

	assert_eq!(json["from_stream"], 100);
	assert_eq!(json["to_stream"], 130);
	assert_eq!(json["skinned_shapes"], 0);

	let file = NifFile::open(&out).expect("converted file loads");
	assert!(file.version().is_fo4_or_later());
	assert_eq!(file.block_count(), 4);
	assert_eq!(file.find_block_by_name("Arm"), Some(1));
}

#[test]
fn unknown_target_is_rejected() {
	let scene = write_scene("convert-bad-target.nif");
	let out = scratch_path("convert-bad-target-out.nif");
	let output = run_nifdoc(&["convert", &arg(&scene), "--out", &arg(&out), "--target", "morrowind"]);
	assert!(!output.status.success());
}
