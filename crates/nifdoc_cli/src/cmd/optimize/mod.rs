use std::path::PathBuf;

use nifdoc::nif::{Result, SaveOptions};

use crate::cmd::util::{emit_json, load};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub out: PathBuf,
	/// Delete blocks nothing references.
	#[arg(long)]
	pub prune: bool,
	/// Reorder blocks into the canonical layout.
	#[arg(long)]
	pub sort: bool,
	/// Refit geometry bounding spheres.
	#[arg(long)]
	pub bounds: bool,
	/// Keep terrain vertex positions at full precision.
	#[arg(long)]
	pub terrain: bool,
	#[arg(long)]
	pub json: bool,
}

/// Rewrite a file with the selected cleanup passes; with none selected, all of them run.
pub fn run(args: Args) -> Result<()> {
	let Args {
		path,
		out,
		prune,
		sort,
		bounds,
		terrain,
		json,
	} = args;

	let options = if prune || sort || bounds {
		SaveOptions {
			remove_unreferenced: prune,
			sort_blocks: sort,
			update_bounds: bounds,
		}
	} else {
		SaveOptions::optimized()
	};

	let mut file = load(&path, terrain)?;
	let blocks_before = file.block_count();
	file.save(&out, options)?;
	let blocks_after = file.block_count();

	if json {
		emit_json(&OptimizeJson {
			out: out.display().to_string(),
			blocks_before,
			blocks_after,
			pruned: options.remove_unreferenced,
			sorted: options.sort_blocks,
			bounds_updated: options.update_bounds,
		});
		return Ok(());
	}

	println!("out: {}", out.display());
	println!("blocks: {blocks_before} -> {blocks_after}");
	Ok(())
}

#[derive(serde::Serialize)]
struct OptimizeJson {
	out: String,
	blocks_before: usize,
	blocks_after: usize,
	pruned: bool,
	sorted: bool,
	bounds_updated: bool,
}

#[cfg(test)]
mod tests;
