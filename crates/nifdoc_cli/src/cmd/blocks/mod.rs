use std::path::PathBuf;

use nifdoc::nif::{NiFileVersion, NiObject, Result};

use crate::cmd::util::{emit_json, load, or_dash};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
}

/// List every block with its type, name, recorded size, and outgoing links.
pub fn run(args: Args) -> Result<()> {
	let Args { path, json } = args;

	let mut file = load(&path, false)?;
	let sizes = if file.version().file >= NiFileVersion::V20_2_0_5 { file.header().block_sizes().to_vec() } else { Vec::new() };
	let mut rows = Vec::with_capacity(file.block_count());
	for index in 0..file.block_count() {
		let Some(block) = file.block_mut(index) else {
			continue;
		};
		let links = block.links();
		rows.push(BlockJson {
			index,
			type_name: block.block_name().to_owned(),
			name: block.name().filter(|name| !name.is_empty()).map(|name| name.to_string()),
			size: sizes.get(index).copied(),
			strong: links.iter().filter(|(strong, _)| *strong).map(|&(_, target)| target).collect(),
			weak: links.iter().filter(|(strong, _)| !*strong).map(|&(_, target)| target).collect(),
		});
	}

	if json {
		emit_json(&rows);
		return Ok(());
	}

	for row in &rows {
		println!(
			"{:>5} {} name={} size={} strong={:?} weak={:?}",
			row.index,
			row.type_name,
			or_dash(row.name.as_deref()),
			or_dash(row.size),
			row.strong,
			row.weak
		);
	}

	Ok(())
}

#[derive(serde::Serialize)]
struct BlockJson {
	index: usize,
	#[serde(rename = "type")]
	type_name: String,
	name: Option<String>,
	size: Option<u32>,
	strong: Vec<usize>,
	weak: Vec<usize>,
}

#[cfg(test)]
mod tests;
