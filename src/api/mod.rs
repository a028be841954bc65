//! Purpose: Define the public Rust API boundary for widget-unpack.
//! Exports: Configuration, the unpack entry points, and the run summary model.
//! Role: Additive-only surface used by the CLI and integration tests.

pub use crate::core::actions::action_config;
pub use crate::core::collect::{CollectRequest, collect};
#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::extract::{ReadmeMode, UnpackConfig, Unpacker, unpack};
pub use crate::core::layout::OutputLayout;
pub use crate::core::model::{
    Action, ActionConfig, ActionType, BundleInfo, Descriptor, Resource, ResourceType,
    WidgetDefinition,
};
pub use crate::core::normalize::normalize;
pub use crate::core::readme::NO_IMAGE_LINE;
pub use crate::core::report::{Failure, FailureStage, Summary};
