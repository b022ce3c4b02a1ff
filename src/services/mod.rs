// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod portfolio;
pub mod session;

pub use portfolio::{Loaded, PortfolioRepository, Source};
pub use session::{Session, SignInOutcome};
