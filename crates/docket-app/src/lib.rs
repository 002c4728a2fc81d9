// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod backend;
pub mod controller;
pub mod forms;
pub mod ids;
pub mod model;
pub mod resolve;
pub mod session;
pub mod store;
pub mod validation;

pub use backend::*;
pub use controller::*;
pub use forms::*;
pub use ids::*;
pub use model::*;
pub use resolve::*;
pub use session::*;
pub use store::*;
pub use validation::{ValidationError, ValidationResult};
