/// Block listing command.
pub mod blocks;
/// Version re-targeting command.
pub mod convert;
/// File-level information command.
pub mod info;
/// Prune, sort, and bounds refit command.
pub mod optimize;

#[cfg(test)]
pub(crate) mod test_support;
pub(crate) mod util;
