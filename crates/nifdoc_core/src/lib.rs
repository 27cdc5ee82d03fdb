//! Public library API for loading, editing, and saving NetImmerse/Gamebryo `.nif` files.

/// Nif codec, header tables, block graph editing, and skin partitioning.
pub mod nif;
