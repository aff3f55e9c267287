// SPDX-FileCopyrightText: 2024 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use oxrdf::Term;

use super::{ConstraintKind, ViolationDraft};

/// Every value has to be one of `allowed`.
/// Terms are compared structurally: `"1"` and `1` differ.
#[must_use]
pub fn validate_in(values: &[Term], allowed: &[Term]) -> Vec<ViolationDraft> {
    values
        .iter()
        .filter(|value| !allowed.contains(value))
        .map(|value| {
            ViolationDraft::new(
                ConstraintKind::In,
                format!("Value {value} is not one of the {} allowed values", allowed.len()),
            )
            .with_value(value.clone())
        })
        .collect()
}

/// At least one of the values has to be `required`.
#[must_use]
pub fn validate_has_value(values: &[Term], required: &Term) -> Vec<ViolationDraft> {
    if values.contains(required) {
        Vec::new()
    } else {
        vec![ViolationDraft::new(
            ConstraintKind::HasValue,
            format!("Missing the required value {required}"),
        )]
    }
}
