/// Cataloger adapters for discovering installed software
mod lockfile_cataloger;

pub use lockfile_cataloger::LockfileCataloger;
