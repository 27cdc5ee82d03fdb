use tracing::debug;

use crate::nif::{BlockRole, NifFile, RawRef, Result};

struct Layout {
	links: Vec<Vec<(bool, usize)>>,
	roles: Vec<BlockRole>,
	emitted: Vec<bool>,
	order: Vec<usize>,
}

impl Layout {
	fn claim(&mut self, index: usize) -> bool {
		match self.emitted.get_mut(index) {
			Some(done) if !*done => {
				*done = true;
				self.order.push(index);
				true
			}
			_ => false,
		}
	}

	fn is_emitted(&self, index: usize) -> bool {
		self.emitted.get(index).copied().unwrap_or(true)
	}

	fn role(&self, index: usize) -> BlockRole {
		self.roles.get(index).copied().unwrap_or(BlockRole::Other)
	}

	fn strong(&self, index: usize) -> Vec<usize> {
		self.links.get(index).map(|links| links.iter().filter_map(|&(strong, target)| strong.then_some(target)).collect()).unwrap_or_default()
	}

	fn weak(&self, index: usize) -> Vec<usize> {
		self.links.get(index).map(|links| links.iter().filter_map(|&(strong, target)| (!strong).then_some(target)).collect()).unwrap_or_default()
	}

	/// Node tree, depth first: child nodes before child shapes.
	fn walk_nodes(&mut self, index: usize) {
		if !self.claim(index) || self.role(index) != BlockRole::Node {
			return;
		}
		let children = self.strong(index);
		for &child in &children {
			if self.role(child) == BlockRole::Node {
				self.walk_nodes(child);
			}
		}
		for &child in &children {
			if self.role(child) == BlockRole::Shape {
				self.claim(child);
			}
		}
	}

	/// Block and everything it owns; physics entities a constraint points at come first.
	fn emit_tree(&mut self, index: usize) {
		if self.is_emitted(index) {
			return;
		}
		if matches!(self.role(index), BlockRole::Constraint | BlockRole::ConstraintChain) {
			for entity in self.weak(index) {
				if self.role(entity) == BlockRole::PhysicsEntity {
					self.emit_tree(entity);
				}
			}
		}
		if !self.claim(index) {
			return;
		}
		for child in self.strong(index) {
			self.emit_tree(child);
		}
	}
}

impl NifFile {
	/// Reorder blocks into the canonical layout.
	///
	/// The node tree comes first (depth first, child nodes before child shapes), then geometry
	/// data of those shapes, then whatever else they own, then unreached blocks in file order.
	pub fn pretty_sort_blocks(&mut self) -> Result<()> {
		let count = self.blocks.len();
		if count == 0 {
			return Ok(());
		}
		let mut layout = Layout {
			links: self.blocks.iter_mut().map(|block| block.links()).collect(),
			roles: self.blocks.iter().map(|block| block.role()).collect(),
			emitted: vec![false; count],
			order: Vec::with_capacity(count),
		};

		let roots: Vec<usize> = self.roots.iter().filter_map(|root| root.index()).filter(|&index| index < count).collect();
		for &root in &roots {
			layout.walk_nodes(root);
		}
		let spine = layout.order.clone();
		for &index in &spine {
			if layout.role(index) == BlockRole::Shape {
				for target in layout.strong(index) {
					if layout.role(target) == BlockRole::Data {
						layout.emit_tree(target);
					}
				}
			}
		}
		for &index in &spine {
			for target in layout.strong(index) {
				layout.emit_tree(target);
			}
		}
		for index in 0..count {
			layout.emit_tree(index);
		}

		self.set_block_order(&layout.order)?;
		debug!(blocks = count, "sorted blocks");
		Ok(())
	}

	/// Reorder blocks so that new block `i` is old block `order[i]`, renumbering every reference.
	pub fn set_block_order(&mut self, order: &[usize]) -> Result<()> {
		let count = self.blocks.len();
		self.header.set_block_order(order)?;

		let mut renumbered = vec![0; count];
		for (new, &old) in order.iter().enumerate() {
			renumbered[old] = new;
		}
		let mut slots: Vec<_> = std::mem::take(&mut self.blocks).into_iter().map(Some).collect();
		self.blocks = order.iter().filter_map(|&old| slots[old].take()).collect();
		if self.legacy_ids.len() == count {
			self.legacy_ids = order.iter().map(|&old| self.legacy_ids[old]).collect();
		}

		let mut remap = |raw: &mut RawRef| {
			if let Some(&new) = raw.index().and_then(|old| renumbered.get(old)) {
				raw.set(Some(new));
			}
		};
		for block in &mut self.blocks {
			block.remap_refs(&mut remap);
		}
		for root in &mut self.roots {
			remap(root);
		}
		Ok(())
	}
}
