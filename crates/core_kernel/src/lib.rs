//! Core Kernel - Foundational types for the expense approval system
//!
//! This crate provides the building blocks shared by every domain crate:
//! - Money with precise decimal arithmetic and runtime currency codes
//! - Strongly-typed identifiers
//! - Roles and the acting principal
//! - Port error types and health checks for adapters
//! - Observable background tasks and duplicate-operation guards

pub mod money;
pub mod identifiers;
pub mod role;
pub mod ports;
pub mod task;
pub mod error;

pub use money::{Money, Currency, MoneyError, MONEY_SCALE};
pub use identifiers::{ClaimId, ActivityId, UserId, SignupRequestId, FlowId};
pub use role::{Role, Actor};
pub use ports::{PortError, DomainPort, AdapterHealth, HealthCheckResult, HealthCheckable};
pub use task::{PendingTask, TaskState, SingleFlight, FlightGuard};
pub use error::CoreError;
