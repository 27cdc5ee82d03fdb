use crate::cmd::test_support::{arg, run_nifdoc, run_nifdoc_json, write_scene};

#[test]
fn blocks_json_lists_types_names_and_links() {
	let scene = write_scene("blocks-json.nif");
	let json = run_nifdoc_json(&["blocks", &arg(&scene), "--json"]);

	let rows = json.as_array().expect("block rows");
	assert_eq!(rows.len(), 4);
	assert_eq!(rows[0]["type"], "BSFadeNode");
	assert_eq!(rows[0]["name"], "Scene Root");
	assert_eq!(rows[0]["strong"], serde_json::json!([3, 1]));
	assert_eq!(rows[2]["name"], "Loose");
	assert_eq!(rows[3]["type"], "NiStringExtraData");
	assert!(rows.iter().all(|row| row["size"].as_u64().is_some_and(|size| size > 0)));
}

#[test]
fn blocks_text_has_one_line_per_block() {
	let scene = write_scene("blocks-text.nif");
	let output = run_nifdoc(&["blocks", &arg(&scene)]);
	assert!(output.status.success());

	let stdout = String::from_utf8_lossy(&output.stdout);
	assert_eq!(stdout.lines().count(), 4);
	assert!(stdout.lines().next().is_some_and(|line| line.contains("BSFadeNode name=Scene Root")));
}
