mod format_registry;
mod presenter_factory;

pub use format_registry::{
    Encoder, FormatRegistry, CYCLONEDX_FORMAT, SPDX_FORMAT, SYFT_FORMAT,
};
pub use presenter_factory::{PresenterFactory, PresenterType};
