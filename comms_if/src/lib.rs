//! # Communications interface crate.
//!
//! Provides all common communications interfaces for the software: the ROS message definitions
//! used to command the robot and the message bus abstraction they are published over.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// ROS message definitions for the topics the robot accepts
pub mod msg;

/// Network module
pub mod net;
