pub mod cli;

pub use cli::{
    CliDriver, CliDriverError, DriverFlow, DriverResult, PointerInput, PressTarget, pointer_input,
    press_target,
};
