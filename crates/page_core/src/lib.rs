//! Sans-IO page controller: page events in, render commands out, timers on
//! a virtual clock.

pub mod config;
pub mod context;
pub mod controller;
pub mod modal;
pub mod nav_menu;
pub mod notification;
pub mod orchestration;
pub mod page;
pub mod registry;
pub mod scheduler;
pub mod submission;
pub mod validation;

pub use config::{ControllerConfig, MessageCatalog};
pub use controller::{BehaviorHandle, FormInstance, PageController};
pub use nav_menu::MenuState;
pub use orchestration::Behavior;
pub use page::{PageStructure, StructureError};
pub use submission::SubmissionState;
