#![allow(missing_docs)]

use nifdoc::nif::objects::{BhkCollisionObject, NiNode, NiStringExtraData};
use nifdoc::nif::{LoadOptions, NiFileVersion, NiVersion, NifError, NifFile, Ptr, Ref, SaveOptions, registry};

fn presets() -> Vec<(&'static str, NiVersion)> {
	vec![
		("morrowind", NiVersion::morrowind()),
		("oblivion", NiVersion::oblivion()),
		("fallout3", NiVersion::fallout3()),
		("skyrim", NiVersion::skyrim()),
		("skyrim_se", NiVersion::skyrim_se()),
		("fallout4", NiVersion::fallout4()),
		("fallout76", NiVersion::fallout76()),
	]
}

/// Root (0) with children `A` (1) and `B` (2); `B` owns extra data (3); `A` owns a collision object (4)
/// wherever the version has a collision layout.
fn scene(version: NiVersion) -> NifFile {
	let mut file = NifFile::create(version, "NiNode", "Scene Root").expect("fresh file");
	let a = file.add_block(Box::new(NiNode::new("A"))).expect("add A");
	let mut b = NiNode::new("B");
	if version.file >= NiFileVersion::V10_0_1_0 {
		b.av.net.extra_data.push(3);
	} else {
		b.av.net.legacy_extra_data = Ref::new(3);
	}
	let b = file.add_block(Box::new(b)).expect("add B");
	file.add_block(Box::new(NiStringExtraData::new("Prn", "WEAPON"))).expect("add extra");
	if registry::supports("bhkCollisionObject", &version) {
		let collision = file
			.add_block(Box::new(BhkCollisionObject {
				target: Ptr::new(a),
				..BhkCollisionObject::default()
			}))
			.expect("add collision");
		file.get_mut::<NiNode>(a).expect("A").av.collision_object = Ref::new(collision);
	}
	let root = file.get_mut::<NiNode>(0).expect("root");
	root.children.push(a);
	root.children.push(b);
	file
}

#[test]
fn unmodified_files_round_trip_for_every_preset() {
	for (label, version) in presets() {
		let mut source = scene(version);
		let bytes = source.to_bytes(SaveOptions::default()).unwrap_or_else(|err| panic!("{label}: save failed: {err}"));
		let mut file = NifFile::from_bytes(&bytes, LoadOptions::default()).unwrap_or_else(|err| panic!("{label}: load failed: {err}"));
		assert_eq!(file.block_count(), source.block_count(), "{label}");
		assert_eq!(file.find_block_by_name("B"), Some(2), "{label}");
		let again = file.to_bytes(SaveOptions::default()).unwrap_or_else(|err| panic!("{label}: resave failed: {err}"));
		assert_eq!(again, bytes, "{label}: bytes changed");
	}
}

#[test]
fn removal_renumbers_every_remaining_reference() {
	let mut file = scene(NiVersion::skyrim_se());
	file.remove_block(2).expect("remove B");

	assert_eq!(file.block_count(), 4);
	assert_eq!(file.child_indices(0), vec![1]);
	let collision = file.get::<BhkCollisionObject>(3).expect("collision moved down");
	assert_eq!(collision.target.index(), Some(1));
	assert_eq!(file.get::<NiNode>(1).expect("A").av.collision_object.index(), Some(3));
	assert_eq!(file.block_type_name(2), Some("NiStringExtraData"));
	assert_eq!(file.root_index(), Some(0));
}

#[test]
fn removed_target_clears_references_to_it() {
	let mut file = scene(NiVersion::skyrim_se());
	file.remove_block(1).expect("remove A");

	assert_eq!(file.child_indices(0), vec![1]);
	let collision = file.get::<BhkCollisionObject>(3).expect("collision moved down");
	assert!(collision.target.is_none());
}

#[test]
fn converted_files_round_trip() {
	for (label, version) in presets().into_iter().skip(1) {
		let mut file = scene(NiVersion::skyrim_se());
		file.set_version(version).unwrap_or_else(|err| panic!("{label}: convert failed: {err}"));
		let bytes = file.to_bytes(SaveOptions::default()).unwrap_or_else(|err| panic!("{label}: save failed: {err}"));
		let mut reloaded = NifFile::from_bytes(&bytes, LoadOptions::default()).unwrap_or_else(|err| panic!("{label}: load failed: {err}"));
		assert_eq!(*reloaded.version(), version, "{label}");
		assert_eq!(reloaded.to_bytes(SaveOptions::default()).unwrap_or_else(|err| panic!("{label}: resave failed: {err}")), bytes, "{label}");
	}
}

#[test]
fn conversion_refuses_blocks_the_target_cannot_hold() {
	let mut file = scene(NiVersion::skyrim_se());
	let err = file.set_version(NiVersion::morrowind()).expect_err("collision has no morrowind layout");
	assert!(
		matches!(err, NifError::UnsupportedBlockForVersion { index: 4, ref name, .. } if name == "bhkCollisionObject"),
		"{err}"
	);
	assert!(file.version().is_skyrim_se());
	assert_eq!(file.block_count(), 5);
}
