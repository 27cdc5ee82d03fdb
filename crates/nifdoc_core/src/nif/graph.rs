use tracing::{debug, warn};

use crate::nif::{NiObject, NifFile, Result};

impl NifFile {
	/// Incoming reference count of every block, strong and weak, footer roots included.
	pub fn incoming_counts(&mut self) -> Vec<usize> {
		let mut counts = vec![0; self.blocks.len()];
		for block in &mut self.blocks {
			for (_, target) in block.links() {
				if let Some(count) = counts.get_mut(target) {
					*count += 1;
				}
			}
		}
		for root in &self.roots {
			if let Some(count) = root.index().and_then(|index| counts.get_mut(index)) {
				*count += 1;
			}
		}
		counts
	}

	/// Delete every block nothing references, keeping the first root; returns how many went.
	pub fn delete_unreferenced_blocks(&mut self) -> Result<usize> {
		let root = match self.root_index() {
			Some(root) => root,
			None if self.blocks.is_empty() => return Ok(0),
			None => 0,
		};
		self.delete_unreferenced_blocks_matching(root, |_| true)
	}

	/// Repeatedly delete unreferenced blocks accepted by `filter`, never `root`.
	///
	/// Each deletion can orphan further blocks, so the scan restarts until nothing changes.
	/// Files holding opaque blocks are left alone since their edges are unknown.
	pub fn delete_unreferenced_blocks_matching<F>(&mut self, root: usize, filter: F) -> Result<usize>
	where
		F: Fn(&(dyn NiObject + 'static)) -> bool,
	{
		if self.has_unknown {
			warn!("opaque blocks present, unreferenced blocks kept");
			return Ok(0);
		}
		let mut root = root;
		let mut removed = 0;
		loop {
			let counts = self.incoming_counts();
			let doomed = (0..self.blocks.len()).find(|&index| index != root && counts[index] == 0 && filter(&*self.blocks[index]));
			let Some(index) = doomed else {
				break;
			};
			self.remove_block(index)?;
			if root > index {
				root -= 1;
			}
			removed += 1;
		}
		debug!(removed, "deleted unreferenced blocks");
		Ok(removed)
	}
}
