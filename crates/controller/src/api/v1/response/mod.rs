// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Response types for REST APIv1
//!
//! Successful responses are plain JSON bodies, failures are converted into an [`ApiError`].
mod error;

pub use error::{json_error_handler, path_error_handler, ApiError, AuthenticationError};

/// Error codes of field level validation errors
pub const CODE_INVALID_EMAIL: &str = "invalid_email";
pub const CODE_INVALID_URL: &str = "invalid_url";
pub const CODE_INVALID_LENGTH: &str = "invalid_length";
pub const CODE_OUT_OF_RANGE: &str = "out_of_range";
pub const CODE_VALUE_REQUIRED: &str = "value_required";
pub const CODE_MISSING_VALUE: &str = "missing_value";
pub const CODE_INVALID_VALUE: &str = "invalid_value";
