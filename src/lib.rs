pub mod app;
pub mod field;
pub mod mask;
pub mod registry;
pub mod terminal;
pub mod text_edit;

pub use field::{FieldUpdate, MaskedField};
pub use mask::presets;
pub use mask::{CurrencyFormat, Formatted, Mask, MaskParseError, PatternSet, format, unmask};
pub use registry::{AttachedForm, ConfigError, FieldDescriptor, MaskRegistry};
