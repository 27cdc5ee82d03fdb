use std::path::PathBuf;

use nifdoc::nif::{NiVersion, Result, SaveOptions};

use crate::cmd::util::{emit_json, load};

/// Game layouts a file can be re-targeted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Target {
	Oblivion,
	Fallout3,
	Skyrim,
	Sse,
	Fo4,
	Fo76,
}

impl Target {
	fn version(self) -> NiVersion {
		match self {
			Self::Oblivion => NiVersion::oblivion(),
			Self::Fallout3 => NiVersion::fallout3(),
			Self::Skyrim => NiVersion::skyrim(),
			Self::Sse => NiVersion::skyrim_se(),
			Self::Fo4 => NiVersion::fallout4(),
			Self::Fo76 => NiVersion::fallout76(),
		}
	}
}

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub out: PathBuf,
	#[arg(long, value_enum)]
	pub target: Target,
	#[arg(long)]
	pub json: bool,
}

/// Re-target a file and rebuild skin partitions for the new engine.
pub fn run(args: Args) -> Result<()> {
	let Args { path, out, target, json } = args;

	let mut file = load(&path, false)?;
	let from = *file.version();
	let to = target.version();
	let skinned_shapes = file.set_version(to)?;
	file.save(&out, SaveOptions::default())?;

	if json {
		emit_json(&ConvertJson {
			out: out.display().to_string(),
			from_version: from.file.to_string(),
			from_stream: from.stream,
			to_version: to.file.to_string(),
			to_stream: to.stream,
			skinned_shapes,
		});
		return Ok(());
	}

	println!("out: {}", out.display());
	println!("version: {} (stream {}) -> {} (stream {})", from.file, from.stream, to.file, to.stream);
	println!("skinned_shapes: {skinned_shapes}");
	Ok(())
}

#[derive(serde::Serialize)]
struct ConvertJson {
	out: String,
	from_version: String,
	from_stream: u32,
	to_version: String,
	to_stream: u32,
	skinned_shapes: usize,
}

#[cfg(test)]
mod tests;
