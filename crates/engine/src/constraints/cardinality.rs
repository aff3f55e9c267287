// SPDX-FileCopyrightText: 2024 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::{ConstraintKind, ViolationDraft};

/// Checks the number of values of a property.
/// Both bounds are inclusive.
#[must_use]
pub fn validate(count: usize, min: Option<usize>, max: Option<usize>) -> Vec<ViolationDraft> {
    let mut drafts = Vec::new();
    if let Some(min) = min {
        if count < min {
            drafts.push(ViolationDraft::new(
                ConstraintKind::MinCount,
                format!("Expected at least {min} value(s), found {count}"),
            ));
        }
    }
    if let Some(max) = max {
        if count > max {
            drafts.push(ViolationDraft::new(
                ConstraintKind::MaxCount,
                format!("Expected at most {max} value(s), found {count}"),
            ));
        }
    }
    drafts
}
