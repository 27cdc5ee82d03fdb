use std::collections::BTreeMap;
use std::path::PathBuf;

use nifdoc::nif::{NifFile, Result, TargetEngine};

use crate::cmd::util::{emit_json, load};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
}

/// Print header versions, counts, and the block type histogram.
pub fn run(args: Args) -> Result<()> {
	let Args { path, json } = args;

	let file = load(&path, false)?;
	let version = *file.version();
	let header = file.header();
	let types = type_histogram(&file);
	let roots: Vec<usize> = file.roots().iter().filter_map(|root| root.index()).collect();

	if json {
		let payload = InfoJson {
			path: path.display().to_string(),
			version: version.file.to_string(),
			user_version: version.user,
			stream_version: version.stream,
			endianness: file.endianness().as_str(),
			engine: engine_label(version.target_engine()),
			creator: header.creator().to_string(),
			block_count: file.block_count(),
			string_count: header.strings().len(),
			roots,
			has_unknown_blocks: file.has_unknown_blocks(),
			trailing_bytes: file.trailing().len(),
			block_types: types.iter().map(|(name, count)| TypeCountJson { name: name.clone(), count: *count }).collect(),
		};
		emit_json(&payload);
		return Ok(());
	}

	println!("path: {}", path.display());
	println!("version: {}", version.file);
	println!("user_version: {}", version.user);
	println!("stream_version: {}", version.stream);
	println!("endianness: {}", file.endianness().as_str());
	println!("engine: {}", engine_label(version.target_engine()));
	println!("creator: {}", header.creator());
	println!("block_count: {}", file.block_count());
	println!("string_count: {}", header.strings().len());
	println!("roots: {roots:?}");
	println!("has_unknown_blocks: {}", file.has_unknown_blocks());
	println!("trailing_bytes: {}", file.trailing().len());
	println!("block_types:");
	for (name, count) in types {
		println!("  {name}: {count}");
	}

	Ok(())
}

/// Block type counts, most common first, ties by name.
fn type_histogram(file: &NifFile) -> Vec<(String, usize)> {
	let mut counts: BTreeMap<String, usize> = BTreeMap::new();
	for index in 0..file.block_count() {
		if let Some(name) = file.block_type_name(index) {
			*counts.entry(name.to_owned()).or_default() += 1;
		}
	}
	let mut entries: Vec<_> = counts.into_iter().collect();
	entries.sort_by(|left, right| right.1.cmp(&left.1).then_with(|| left.0.cmp(&right.0)));
	entries
}

fn engine_label(engine: TargetEngine) -> &'static str {
	match engine {
		TargetEngine::Oblivion => "oblivion",
		TargetEngine::SkyrimSe => "skyrim_se",
		TargetEngine::Other => "other",
	}
}

#[derive(serde::Serialize)]
struct InfoJson {
	path: String,
	version: String,
	user_version: u32,
	stream_version: u32,
	endianness: &'static str,
	engine: &'static str,
	creator: String,
	block_count: usize,
	string_count: usize,
	roots: Vec<usize>,
	has_unknown_blocks: bool,
	trailing_bytes: usize,
	block_types: Vec<TypeCountJson>,
}

#[derive(serde::Serialize)]
struct TypeCountJson {
	name: String,
	count: usize,
}

#[cfg(test)]
mod tests;
