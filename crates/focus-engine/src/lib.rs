//! dockfocus focus engine
//!
//! Keeps "which window looks active" and "which window the OS considers
//! focused" consistent for a host window that docks child-process windows:
//! - [`FocusCoordinator`]: the state machine, sole owner of [`FocusState`]
//! - [`ChildSessionRegistry`]: which embedded windows report focus
//! - [`ActivationGateway`], [`SessionTab`], [`EmbeddedWindow`]: the host's
//!   tab model as seen by the coordinator
//!
//! Everything here is single-threaded and runs on the host's UI thread.
//! Platform message translation lives in `host-adapter`.

mod coordinator;
mod error;
mod gateway;
mod registry;
pub mod sim;
mod state;

pub use coordinator::{Activation, FocusCoordinator};
pub use error::{Error, Result};
pub use gateway::{ActivationGateway, EmbeddedWindow, SessionTab, WindowId};
pub use registry::{ChildFocusEvent, ChildSession, ChildSessionRegistry, SessionId};
pub use state::{ActivationGuards, FocusState, GuardCell};
