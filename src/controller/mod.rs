// CONTROLLER: Input, game logic, and update loop
pub mod input;
pub mod physics;
pub mod camera_controller;
pub mod game;
pub mod frame_loop;

pub use input::{GameAction, InputEvent, InputState, InputProcessor, KeyBindings};
pub use physics::{FixedStepper, PhysicsBackend, RapierWorld};
pub use camera_controller::CameraController;
pub use game::{GameSession, ThrowRequest};
pub use frame_loop::{FrameClock, FrameLoop, FrameReport, FrameView, SceneRenderer};
