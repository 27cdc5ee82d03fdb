use crate::cmd::test_support::{arg, run_nifdoc, run_nifdoc_json, write_scene};

#[test]
fn info_json_reports_versions_and_histogram() {
	let scene = write_scene("info-json.nif");
	let json = run_nifdoc_json(&["info", &arg(&scene), "--json"]);

	assert_eq!(json["version"], "20.2.0.7");
	assert_eq!(json["user_version"], 12);
	assert_eq!(json["stream_version"], 100);
	assert_eq!(json["engine"], "skyrim_se");
	assert_eq!(json["endianness"], "little");
	assert_eq!(json["block_count"], 4);
	assert_eq!(json["roots"], serde_json::json!([0]));
	assert_eq!(json["has_unknown_blocks"], false);

	let types = json["block_types"].as_array().expect("block type histogram");
	assert_eq!(types[0]["name"], "NiNode");
	assert_eq!(types[0]["count"], 2);
	assert_eq!(types.len(), 3);
}

#[test]
fn info_text_lists_counts() {
	let scene = write_scene("info-text.nif");
	let output = run_nifdoc(&["info", &arg(&scene)]);
	assert!(output.status.success());

	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(stdout.contains("block_count: 4"));
	assert!(stdout.contains("  NiNode: 2"));
}

#[test]
fn missing_file_reports_an_error() {
	let output = run_nifdoc(&["info", "definitely-missing.nif"]);
	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).contains("error: "));
}
