// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! herald-core: report, status and card types for the herald run notifier

pub mod macros;

pub mod card;
pub mod context;
pub mod report;
pub mod status;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use card::{
    build_card, build_column, build_project_card, Attachment, BodyContentType, CardDocument,
    CardError, CardItem, Color, Column, ColumnSet, Container, ContainerStyle, Mention,
    MessageBody, Payload, Size, Spacing, TextBlock, Weight,
};
pub use context::{NotifyTarget, RunContext, RunContextBuilder};
pub use report::{ReportField, RunReport, StepProgress, StepResult};
pub use status::{RunStatus, StatusLabel};
