/// Structural validation command.
pub mod check;
/// Header and transaction log summary command.
pub mod info;
/// File node dump command.
pub mod nodes;

#[cfg(test)]
pub(crate) mod test_support;
pub(crate) mod util;
