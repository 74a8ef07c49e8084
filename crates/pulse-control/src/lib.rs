pub mod config;
pub mod controller;
pub mod editor;
pub mod registry;
pub mod store;
pub mod timer;

pub use config::ControllerConfig;
pub use controller::{stored_mode, stored_overrides, Mode, ModeController, ParamsSource, UnknownMode, MODE_KEY};
pub use editor::SettingsEditor;
pub use registry::FieldInfo;
pub use store::{JsonFileStore, Listener, ListenerId, MemoryStore, SettingsStore, StoreError};
pub use timer::RepeatingTask;
