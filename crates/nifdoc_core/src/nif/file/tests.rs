use glam::Vec3;
use half::f16;
use nifdoc_testkit::ByteBuilder;

use crate::nif::objects::{BhkCollisionObject, BhkRigidBody, BsTriShape, BsVertex, DEFAULT_AV_FLAGS, NiGeometry, NiNode, NiStringExtraData, VertexFlags};
use crate::nif::{LoadOptions, NiFileVersion, NiUnknown, NiVersion, NifError, NifFile, Ptr, Ref, SaveOptions};

const IDENTITY: [f32; 9] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

fn sse_header(types: &[&str], type_indices: &[u16], sizes: &[u32], strings: &[&str]) -> ByteBuilder {
	let mut builder = ByteBuilder::new()
		.line("Gamebryo File Format, Version 20.2.0.7")
		.u32(0x1402_0007)
		.u8(1)
		.u32(12)
		.u32(type_indices.len() as u32)
		.u32(100)
		.export_str("")
		.export_str("")
		.export_str("")
		.u16(types.len() as u16);
	for name in types {
		builder = builder.sized_str(name);
	}
	for &index in type_indices {
		builder = builder.u16(index);
	}
	for &size in sizes {
		builder = builder.u32(size);
	}
	builder = builder.u32(strings.len() as u32).u32(strings.iter().map(|text| text.len()).max().unwrap_or(0) as u32);
	for text in strings {
		builder = builder.sized_str(text);
	}
	builder.u32(0)
}

fn sse_node(builder: ByteBuilder, name: u32, extra_data: &[i32], children: &[i32]) -> ByteBuilder {
	let mut builder = builder.u32(name).u32(extra_data.len() as u32);
	for &link in extra_data {
		builder = builder.i32(link);
	}
	builder = builder.i32(-1).u32(DEFAULT_AV_FLAGS).f32s(&[0.0; 3]).f32s(&IDENTITY).f32(1.0).i32(-1).u32(children.len() as u32);
	for &link in children {
		builder = builder.i32(link);
	}
	builder.u32(0)
}

fn scene_root_bytes(name_index: u32) -> Vec<u8> {
	let builder = sse_header(&["NiNode"], &[0], &[80], &["Scene Root"]);
	sse_node(builder, name_index, &[], &[]).u32(1).i32(0).build()
}

fn scene() -> NifFile {
	let mut file = NifFile::create(NiVersion::skyrim_se(), "BSFadeNode", "Scene Root").expect("fresh file");
	let a = file.add_block(Box::new(NiNode::new("A"))).expect("add A");
	let b = file.add_block(Box::new(NiNode::new("B"))).expect("add B");
	let c = file.add_block(Box::new(NiNode::new("C"))).expect("add C");
	let collision = BhkCollisionObject {
		target: Ptr::new(c),
		..BhkCollisionObject::default()
	};
	let collision = file.add_block(Box::new(collision)).expect("add collision");
	let root = file.get_mut::<NiNode>(0).expect("root node");
	for child in [a, b, c] {
		root.children.push(child);
	}
	file.get_mut::<NiNode>(c).expect("node C").av.collision_object.set(Some(collision));
	file
}

fn reload(file: &mut NifFile) -> NifFile {
	let bytes = file.to_bytes(SaveOptions::default()).expect("save");
	NifFile::from_bytes(&bytes, LoadOptions::default()).expect("reload")
}

mod create_and_save {
	use super::*;

	#[test]
	fn fresh_skyrim_se_scene_root_matches_reference_bytes() {
		let mut file = NifFile::create(NiVersion::skyrim_se(), "NiNode", "Scene Root").expect("fresh file");
		let bytes = file.to_bytes(SaveOptions::default()).expect("save");
		assert_eq!(bytes, scene_root_bytes(0));
		assert_eq!(file.header().block_sizes(), &[80]);
		assert_eq!(file.header().max_string_len(), 10);
	}

	#[test]
	fn reference_bytes_load_and_round_trip() {
		let bytes = scene_root_bytes(0);
		let mut file = NifFile::from_bytes(&bytes, LoadOptions::default()).expect("load");
		assert_eq!(*file.version(), NiVersion::skyrim_se());
		assert_eq!(file.block_count(), 1);
		assert_eq!(file.root_index(), Some(0));
		let root = file.root_node().expect("root is a node");
		assert_eq!(root.av.net.name.text().as_bytes(), b"Scene Root");
		assert_eq!(file.to_bytes(SaveOptions::default()).expect("save"), bytes);
	}

	#[test]
	fn oblivion_file_round_trips_with_inline_strings() {
		let mut file = NifFile::create(NiVersion::oblivion(), "NiNode", "Scene Root").expect("fresh file");
		file.add_block(Box::new(NiNode::new("Bip01"))).expect("add");
		file.get_mut::<NiNode>(0).expect("root").children.push(1);
		let bytes = file.to_bytes(SaveOptions::default()).expect("save");
		assert!(file.header().strings().is_empty());

		let mut loaded = NifFile::from_bytes(&bytes, LoadOptions::default()).expect("load");
		assert_eq!(loaded.find_block_by_name("Bip01"), Some(1));
		assert_eq!(loaded.child_indices(0), vec![1]);
		assert_eq!(loaded.to_bytes(SaveOptions::default()).expect("save"), bytes);
	}

	#[test]
	fn trailing_bytes_survive() {
		let mut bytes = scene_root_bytes(0);
		bytes.extend_from_slice(b"tail");
		let mut file = NifFile::from_bytes(&bytes, LoadOptions::default()).expect("load");
		assert_eq!(file.trailing(), b"tail");
		assert_eq!(file.to_bytes(SaveOptions::default()).expect("save"), bytes);
	}

	#[test]
	fn pre_3_1_files_frame_blocks_with_markers() {
		let mut file = NifFile::create(NiVersion::new(NiFileVersion::V3_0, 0, 0), "NiNode", "Root").expect("fresh file");
		let child = file.add_block(Box::new(NiNode::new("Child"))).expect("add child");
		file.get_mut::<NiNode>(0).expect("root").children.push(child);
		let bytes = file.to_bytes(SaveOptions::default()).expect("save");
		let contains = |needle: &[u8]| bytes.windows(needle.len()).any(|window| window == needle);
		assert!(bytes.starts_with(b"NetImmerse File Format, Version 3.0\n"));
		assert!(contains(b"Top Level Object"));
		assert!(bytes.ends_with(b"End Of File"));

		let mut loaded = NifFile::from_bytes(&bytes, LoadOptions::default()).expect("load");
		assert_eq!(loaded.root_index(), Some(0));
		assert_eq!(loaded.child_indices(0), vec![1]);
		assert_eq!(loaded.to_bytes(SaveOptions::default()).expect("save again"), bytes);
	}
}

mod legacy {
	use super::*;

	fn version_3_0() -> NiVersion {
		NiVersion::new(NiFileVersion::V3_0, 0, 0)
	}

	#[test]
	fn links_are_stored_as_block_ids_before_3_3_0_13() {
		let mut file = NifFile::create(version_3_0(), "NiNode", "Root").expect("fresh file");
		let child = file.add_block(Box::new(NiNode::new("Child"))).expect("add child");
		file.get_mut::<NiNode>(0).expect("root").children.push(child);
		assert_eq!(file.legacy_ids, vec![1, 2]);

		let bytes = file.to_bytes(SaveOptions::default()).expect("save");
		// children: count 1, then the child's id
		assert!(bytes.windows(8).any(|window| window == [1, 0, 0, 0, 2, 0, 0, 0]));
		assert_eq!(file.child_indices(0), vec![1]);
		assert!(file.root_node().expect("root").av.net.controller.is_none());
	}

	#[test]
	fn links_resolve_through_the_stored_block_ids() {
		let mut file = NifFile::create(version_3_0(), "NiNode", "Root").expect("fresh file");
		let child = file.add_block(Box::new(NiNode::new("Child"))).expect("add child");
		file.get_mut::<NiNode>(0).expect("root").children.push(child);
		file.legacy_ids[1] = 7;
		let bytes = file.to_bytes(SaveOptions::default()).expect("save");
		let loaded = NifFile::from_bytes(&bytes, LoadOptions::default()).expect("load");
		assert_eq!(loaded.legacy_ids, vec![1, 7]);
		assert_eq!(loaded.child_indices(0), vec![1]);

		let mut dangling = bytes.clone();
		let at = dangling.windows(8).position(|window| window == [1, 0, 0, 0, 7, 0, 0, 0]).expect("child link") + 4;
		dangling[at] = 9;
		let loaded = NifFile::from_bytes(&dangling, LoadOptions::default()).expect("load");
		assert!(loaded.child_indices(0).is_empty());
	}

	#[test]
	fn morrowind_extra_data_hangs_off_the_object() {
		let mut file = NifFile::create(NiVersion::morrowind(), "NiNode", "Scene Root").expect("fresh file");
		let extra = file.add_block(Box::new(NiStringExtraData::new("", "WEAPON"))).expect("add extra");
		file.get_mut::<NiNode>(0).expect("root").av.net.legacy_extra_data = Ref::new(extra);
		let bytes = file.to_bytes(SaveOptions::default()).expect("save");
		assert!(bytes.starts_with(b"NetImmerse File Format, Version 4.0.0.2\n"));

		let mut loaded = NifFile::from_bytes(&bytes, LoadOptions::default()).expect("load");
		assert_eq!(loaded.root_node().expect("root").av.net.legacy_extra_data.index(), Some(1));
		assert_eq!(loaded.get::<NiStringExtraData>(1).expect("extra data").data.text().to_string(), "WEAPON");
		assert_eq!(loaded.incoming_counts(), vec![1, 1]);
		assert_eq!(loaded.to_bytes(SaveOptions::default()).expect("save again"), bytes);
	}

	#[test]
	fn blocks_without_a_legacy_layout_are_not_written() {
		let mut file = NifFile::create(NiVersion::morrowind(), "NiNode", "Scene Root").expect("fresh file");
		file.add_block(Box::new(NiGeometry::with_type("NiTriShape", "Body"))).expect("add shape");
		let err = file.to_bytes(SaveOptions::default()).expect_err("no 4.0.0.2 shape layout");
		assert!(matches!(err, NifError::UnsupportedBlockForVersion { index: 1, ref name, .. } if name == "NiTriShape"));
	}
}

mod conversion {
	use super::*;

	#[test]
	fn unsupported_target_leaves_the_file_untouched() {
		let mut file = scene();
		let body = file.add_block(Box::new(BhkRigidBody::with_type("bhkRigidBody"))).expect("add body");
		let err = file.set_version(NiVersion::oblivion()).expect_err("no oblivion rigid body layout");
		assert!(matches!(err, NifError::UnsupportedBlockForVersion { index, ref name, .. } if index == body && name == "bhkRigidBody"));
		assert_eq!(*file.version(), NiVersion::skyrim_se());
		assert!(file.to_bytes(SaveOptions::default()).is_ok());
	}

	#[test]
	fn opaque_blocks_need_a_size_table() {
		let mut file = scene();
		file.add_block(Box::new(NiUnknown::new("BSBehaviorGraphExtraData", vec![0; 12]))).expect("add opaque");
		assert!(file.set_version(NiVersion::fallout4()).is_ok());
		let err = file.set_version(NiVersion::oblivion()).expect_err("oblivion has no size table");
		assert!(matches!(err, NifError::UnsupportedBlockForVersion { index: 5, .. }));
	}

	#[test]
	fn sixteen_bit_flags_keep_the_low_half() {
		let mut file = scene();
		assert_eq!(file.root_node().expect("root").av.flags, DEFAULT_AV_FLAGS);
		file.set_version(NiVersion::oblivion()).expect("convert");
		let bytes = file.to_bytes(SaveOptions::default()).expect("save");
		assert_eq!(file.root_node().expect("root").av.flags, DEFAULT_AV_FLAGS & 0xFFFF);

		let mut loaded = NifFile::from_bytes(&bytes, LoadOptions::default()).expect("load");
		assert_eq!(loaded.root_node().expect("root").av.flags, 0x000E);
		assert_eq!(loaded.get::<BhkCollisionObject>(4).expect("collision").target.index(), Some(3));
		assert_eq!(loaded.to_bytes(SaveOptions::default()).expect("save again"), bytes);
	}
}

mod loading {
	use super::*;

	#[test]
	fn unknown_block_with_size_table_round_trips_verbatim() {
		let payload = [7_u8, 0, 0, 0, 1, 2, 3, 4, 5, 6, 7, 8];
		let builder = sse_header(&["NiNode", "BSBehaviorGraphExtraData"], &[0, 1], &[84, 12], &["Scene Root"]);
		let bytes = sse_node(builder, 0, &[1], &[]).raw(&payload).u32(1).i32(0).build();

		let mut file = NifFile::from_bytes(&bytes, LoadOptions::default()).expect("load");
		assert!(file.has_unknown_blocks());
		let unknown = file.block(1).expect("second block");
		assert!(unknown.is_opaque());
		assert_eq!(unknown.block_name(), "BSBehaviorGraphExtraData");
		assert_eq!(file.root_node().expect("root").av.net.extra_data.indices().collect::<Vec<_>>(), vec![1]);
		assert_eq!(file.to_bytes(SaveOptions::default()).expect("save"), bytes);
	}

	#[test]
	fn known_block_that_misparses_is_kept_raw() {
		let builder = sse_header(&["NiNode"], &[0], &[81], &["Scene Root"]);
		let bytes = sse_node(builder, 0, &[], &[]).u8(0xAB).u32(1).i32(0).build();
		let mut file = NifFile::from_bytes(&bytes, LoadOptions::default()).expect("load");
		assert!(file.block(0).expect("block").is_opaque());
		assert!(file.root_node().is_none());
		assert_eq!(file.to_bytes(SaveOptions::default()).expect("save"), bytes);
	}

	#[test]
	fn string_index_past_the_table_is_corrected_and_renumbered() {
		let bytes = scene_root_bytes(1);
		let mut file = NifFile::from_bytes(&bytes, LoadOptions::default()).expect("load");
		let root = file.root_node().expect("root");
		assert_eq!(root.av.net.name.text().as_bytes(), b"Scene Root");
		assert_eq!(root.av.net.name.index(), Some(1));
		assert_eq!(file.to_bytes(SaveOptions::default()).expect("save"), scene_root_bytes(0));
	}

	#[test]
	fn failed_load_leaves_an_empty_document() {
		let mut file = scene();
		let err = file.load(b"Not A Nif File\n", LoadOptions::default()).expect_err("bad magic");
		assert!(matches!(err, NifError::InvalidMagic { .. }));
		assert_eq!(file.block_count(), 0);
		assert!(file.roots().is_empty());
	}

	#[test]
	fn truncated_file_reports_eof() {
		let bytes = scene_root_bytes(0);
		let err = NifFile::from_bytes(&bytes[..100], LoadOptions::default()).expect_err("truncated");
		assert!(matches!(err, NifError::UnexpectedEof { .. }));
	}

	#[test]
	fn newer_versions_are_rejected() {
		let bytes = ByteBuilder::new().line("Gamebryo File Format, Version 30.0.0.2").build();
		let err = NifFile::from_bytes(&bytes, LoadOptions::default()).expect_err("too new");
		assert!(matches!(err, NifError::UnsupportedVersion { .. }));
	}
}

mod editing {
	use super::*;

	#[test]
	fn removal_shifts_later_references_down() {
		let mut file = scene();
		file.remove_block(2).expect("remove B");
		assert_eq!(file.block_count(), 4);
		assert_eq!(file.header().block_count(), 4);
		assert_eq!(file.child_indices(0), vec![1, 2]);
		assert_eq!(file.get::<NiNode>(2).expect("C moved").av.collision_object.index(), Some(3));
		assert_eq!(file.get::<BhkCollisionObject>(3).expect("collision moved").target.index(), Some(2));
	}

	#[test]
	fn removal_clears_standalone_references_to_the_block() {
		let mut file = scene();
		file.remove_block(3).expect("remove C");
		assert_eq!(file.child_indices(0), vec![1, 2]);
		assert!(file.get::<BhkCollisionObject>(3).expect("collision moved").target.is_none());
	}

	#[test]
	fn removing_the_last_block_of_a_type_drops_the_type() {
		let mut file = scene();
		file.remove_block(4).expect("remove collision");
		let types: Vec<String> = file.header().block_types().iter().map(ToString::to_string).collect();
		assert_eq!(types, vec!["BSFadeNode", "NiNode"]);
		assert!(file.get::<NiNode>(3).expect("C").av.collision_object.is_none());
	}

	#[test]
	fn removing_the_root_empties_the_footer() {
		let mut file = scene();
		file.remove_block(0).expect("remove root");
		assert!(file.roots().is_empty());
		assert_eq!(file.get::<BhkCollisionObject>(3).expect("collision").target.index(), Some(2));
	}

	#[test]
	fn out_of_range_removal_fails() {
		let mut file = scene();
		let err = file.remove_block(99).expect_err("no such block");
		assert!(matches!(err, NifError::BlockIndexOutOfRange { index: 99, count: 5 }));
	}

	#[test]
	fn replacement_keeps_incoming_references() {
		let mut file = scene();
		let old = file.replace_block(1, Box::new(BsTriShape::new("A"))).expect("replace");
		assert_eq!(old.block_name(), "NiNode");
		assert_eq!(file.block_type_name(1), Some("BSTriShape"));
		assert_eq!(file.header().block_type_name(1).map(ToString::to_string), Some("BSTriShape".to_owned()));
		assert_eq!(file.child_indices(0), vec![1, 2, 3]);
		assert_eq!(file.shapes(), vec![1]);
	}

	#[test]
	fn duplicate_keeps_the_original_references() {
		let mut file = scene();
		let copy = file.duplicate_block(3).expect("duplicate C");
		assert_eq!(copy, 5);
		let node = file.get::<NiNode>(copy).expect("copy is a node");
		assert_eq!(node.av.net.name.text().as_bytes(), b"C");
		assert_eq!(node.av.collision_object.index(), Some(4));
		assert_eq!(file.header().block_count(), 6);
	}

	#[test]
	fn remove_all_blocks_of_a_type() {
		let mut file = scene();
		assert_eq!(file.remove_blocks_of_type("NiNode").expect("remove"), 3);
		assert_eq!(file.block_count(), 2);
		assert!(file.child_indices(0).is_empty());
		assert!(file.get::<BhkCollisionObject>(1).expect("collision").target.is_none());
	}

	#[test]
	fn navigation_helpers() {
		let file = scene();
		assert_eq!(file.find_block_by_name("B"), Some(2));
		assert_eq!(file.find_block_by_name("missing"), None);
		assert_eq!(file.parent_node(2), Some(0));
		assert_eq!(file.parent_node(0), None);
		assert_eq!(file.root_node().map(|root| root.children.len()), Some(3));
		assert!(file.get::<BsTriShape>(1).is_none());
		assert!(file.shapes().is_empty());
	}
}

mod strings {
	use super::*;

	#[test]
	fn new_names_are_appended_in_first_use_order() {
		let mut file = scene();
		file.to_bytes(SaveOptions::default()).expect("save");
		let strings: Vec<String> = file.header().strings().iter().map(ToString::to_string).collect();
		assert_eq!(strings, vec!["Scene Root", "A", "B", "C"]);
		assert_eq!(file.get::<NiNode>(3).expect("C").av.net.name.index(), Some(3));
	}

	#[test]
	fn renaming_rebuilds_the_table_without_stale_entries() {
		let mut file = reload(&mut scene());
		file.get_mut::<NiNode>(1).expect("A").av.net.name.set_text("Scene Root");
		file.to_bytes(SaveOptions::default()).expect("save");
		let strings: Vec<String> = file.header().strings().iter().map(ToString::to_string).collect();
		assert_eq!(strings, vec!["Scene Root", "B", "C"]);
		assert_eq!(file.get::<NiNode>(1).expect("A").av.net.name.index(), Some(0));
	}

	#[test]
	fn empty_names_take_no_entry() {
		let mut file = NifFile::create(NiVersion::skyrim_se(), "NiNode", "Scene Root").expect("fresh file");
		let child = file.add_block(Box::new(NiNode::new(""))).expect("add");
		file.get_mut::<NiNode>(0).expect("root").children.push(child);
		file.to_bytes(SaveOptions::default()).expect("save");
		assert_eq!(file.header().strings().len(), 1);
		assert_eq!(file.get::<NiNode>(child).expect("child").av.net.name.index(), None);
	}

	#[test]
	fn consistent_loaded_table_keeps_its_order() {
		let builder = sse_header(&["NiNode"], &[0, 0], &[84, 80], &["Child", "Scene Root"]);
		let builder = sse_node(builder, 1, &[], &[1]);
		let bytes = sse_node(builder, 0, &[], &[]).u32(1).i32(0).build();

		let mut file = NifFile::from_bytes(&bytes, LoadOptions::default()).expect("load");
		file.update_string_table();
		let strings: Vec<String> = file.header().strings().iter().map(ToString::to_string).collect();
		assert_eq!(strings, vec!["Child", "Scene Root"]);
		assert_eq!(file.to_bytes(SaveOptions::default()).expect("save"), bytes);
	}

	#[test]
	fn second_save_is_stable() {
		let mut file = scene();
		let first = file.to_bytes(SaveOptions::default()).expect("save");
		let mut loaded = NifFile::from_bytes(&first, LoadOptions::default()).expect("load");
		assert_eq!(loaded.to_bytes(SaveOptions::default()).expect("save"), first);
	}

	#[test]
	fn extra_data_strings_share_the_table() {
		let mut file = NifFile::create(NiVersion::skyrim(), "BSFadeNode", "Scene Root").expect("fresh file");
		let extra = file.add_block(Box::new(NiStringExtraData::new("Prn", "Scene Root"))).expect("add");
		file.get_mut::<NiNode>(0).expect("root").av.net.extra_data.push(extra);
		let mut loaded = reload(&mut file);
		let strings: Vec<String> = loaded.header().strings().iter().map(ToString::to_string).collect();
		assert_eq!(strings, vec!["Scene Root", "Prn"]);
		let data = loaded.get::<NiStringExtraData>(extra).expect("extra data");
		assert_eq!(data.data.index(), Some(0));
		assert!(loaded.to_bytes(SaveOptions::default()).is_ok());
	}
}

mod options {
	use super::*;

	fn plane_vertex(x: f32, y: f32) -> BsVertex {
		BsVertex {
			position: Vec3::new(x, y, 0.0),
			uv: [f16::from_f32(x), f16::from_f32(y)],
			..BsVertex::default()
		}
	}

	fn fallout4_plane() -> NifFile {
		let mut file = NifFile::create(NiVersion::fallout4(), "NiNode", "Terrain").expect("fresh file");
		let mut shape = BsTriShape::new("Plane");
		shape.set_geometry(vec![plane_vertex(0.0, 0.0), plane_vertex(1.0, 0.0), plane_vertex(0.0, 1.0)], vec![[0, 1, 2]]);
		let shape = file.add_block(Box::new(shape)).expect("add shape");
		file.get_mut::<NiNode>(0).expect("root").children.push(shape);
		file
	}

	#[test]
	fn terrain_meshes_are_saved_full_precision() {
		let bytes = fallout4_plane().to_bytes(SaveOptions::default()).expect("save");
		let mut terrain = NifFile::from_bytes(&bytes, LoadOptions { is_terrain: true }).expect("load");
		assert!(terrain.is_terrain());
		let saved = terrain.to_bytes(SaveOptions::default()).expect("save terrain");
		let reloaded = NifFile::from_bytes(&saved, LoadOptions::default()).expect("reload");
		let shape = reloaded.get::<BsTriShape>(1).expect("shape");
		assert!(shape.vertex_desc.flags().contains(VertexFlags::FULLPREC));
		assert_eq!(shape.data_size, shape.vertex_desc.vertex_size() * 3 + 6);
		assert_eq!(shape.vertices[1].position, Vec3::new(1.0, 0.0, 0.0));
	}

	#[test]
	fn regular_meshes_keep_their_precision() {
		let bytes = fallout4_plane().to_bytes(SaveOptions::default()).expect("save");
		let mut file = NifFile::from_bytes(&bytes, LoadOptions::default()).expect("load");
		assert_eq!(file.to_bytes(SaveOptions::default()).expect("save"), bytes);
		assert!(!file.get::<BsTriShape>(1).expect("shape").vertex_desc.flags().contains(VertexFlags::FULLPREC));
	}

	#[test]
	fn optimized_save_prunes_and_refits() {
		let mut file = fallout4_plane();
		file.add_block(Box::new(NiNode::new("Orphan"))).expect("add orphan");
		let bytes = file.to_bytes(SaveOptions::optimized()).expect("save");
		let loaded = NifFile::from_bytes(&bytes, LoadOptions::default()).expect("load");
		assert_eq!(loaded.block_count(), 2);
		assert!(loaded.find_block_by_name("Orphan").is_none());
		let shape = loaded.get::<BsTriShape>(1).expect("shape");
		assert_eq!(shape.bound.center, Vec3::new(0.5, 0.5, 0.0));
	}
}
